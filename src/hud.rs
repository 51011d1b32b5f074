//! Score, lives and message display
//!
//! The simulation never renders text itself; it pushes strings into whatever
//! text elements the host bound for the current scene. Unbound elements make
//! the corresponding update a no-op.

use std::cell::RefCell;
use std::rc::Rc;

/// A text element the host can render
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);

    /// Make the element visible (message overlays start hidden)
    fn show(&mut self) {}
}

/// Shared string buffer, handy for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct SharedText(Rc<RefCell<String>>);

impl SharedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.0.borrow().clone()
    }
}

impl TextDisplay for SharedText {
    fn set_text(&mut self, text: &str) {
        let mut buf = self.0.borrow_mut();
        buf.clear();
        buf.push_str(text);
    }
}

/// Text element that only logs
#[derive(Debug, Clone)]
pub struct LogText(pub &'static str);

impl TextDisplay for LogText {
    fn set_text(&mut self, text: &str) {
        log::debug!("[{}] {}", self.0, text);
    }

    fn show(&mut self) {
        log::debug!("[{}] shown", self.0);
    }
}

/// Display elements bound for the current scene
#[derive(Default)]
pub struct Hud {
    pub score_text: Option<Box<dyn TextDisplay>>,
    pub lives_text: Option<Box<dyn TextDisplay>>,
    /// Optional overlay for transient messages
    pub message_text: Option<Box<dyn TextDisplay>>,
}

impl std::fmt::Debug for Hud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hud")
            .field("score_text", &self.score_text.is_some())
            .field("lives_text", &self.lives_text.is_some())
            .field("message_text", &self.message_text.is_some())
            .finish()
    }
}

impl Hud {
    /// No bound elements (menus, victory and defeat screens)
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, display: impl TextDisplay + 'static) -> Self {
        self.score_text = Some(Box::new(display));
        self
    }

    pub fn with_lives(mut self, display: impl TextDisplay + 'static) -> Self {
        self.lives_text = Some(Box::new(display));
        self
    }

    pub fn with_message(mut self, display: impl TextDisplay + 'static) -> Self {
        self.message_text = Some(Box::new(display));
        self
    }

    /// Warn about the bindings a playable scene is expected to provide
    pub fn warn_missing(&self) {
        if self.score_text.is_none() {
            log::warn!("ScoreText not bound for this scene - score display disabled");
        }
        if self.lives_text.is_none() {
            log::warn!("LivesText not bound for this scene - lives display disabled");
        }
    }

    /// Refresh score and lives
    pub fn update(&mut self, score: u64, lives: u32) {
        if let Some(text) = &mut self.score_text {
            text.set_text(&format!("Score: {score}"));
        }
        if let Some(text) = &mut self.lives_text {
            text.set_text(&format!("Lives: {lives}"));
        }
    }

    /// Show a message if a message element is bound. Returns whether it was shown.
    pub fn show_message(&mut self, message: &str) -> bool {
        match &mut self.message_text {
            Some(text) => {
                text.set_text(message);
                text.show();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_writes_bound_elements() {
        let score = SharedText::new();
        let lives = SharedText::new();
        let mut hud = Hud::unbound()
            .with_score(score.clone())
            .with_lives(lives.clone());

        hud.update(1200, 2);
        assert_eq!(score.text(), "Score: 1200");
        assert_eq!(lives.text(), "Lives: 2");
    }

    #[test]
    fn test_unbound_is_noop() {
        let mut hud = Hud::unbound();
        hud.update(5, 1);
        assert!(!hud.show_message("LEVEL COMPLETE!"));
    }

    #[test]
    fn test_show_message() {
        let message = SharedText::new();
        let mut hud = Hud::unbound().with_message(message.clone());
        assert!(hud.show_message("LEVEL COMPLETE!"));
        assert_eq!(message.text(), "LEVEL COMPLETE!");
    }
}
