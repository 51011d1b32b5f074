//! Score, lives and level progression
//!
//! The session outlives every scene: it is created once by the host, mutated
//! by bricks, the boundary trigger and menus, and told about each scene load.
//! Two latches guard the transitions:
//! - `level_completed`: set once the brick census reaches zero
//! - `game_ended`: set when the last life is lost or the last level is cleared
//!
//! Both stay set until the next scene load, so stale events arriving in the
//! same tick cannot schedule a second transition.

use std::fmt;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use super::game::Timer;
use super::scheduler::Scheduler;
use crate::hud::Hud;
use crate::settings::ProgressionSettings;

pub const LEVEL_COMPLETE_MESSAGE: &str = "LEVEL COMPLETE!";

/// A loadable scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneId {
    MainMenu,
    /// Playable level, numbered from 1
    Level(u32),
    Victory,
    Defeat,
}

impl SceneId {
    /// Whether the scene is expected to contain bricks
    pub fn is_game_level(&self) -> bool {
        matches!(self, SceneId::Level(_))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "MainMenu" => Some(SceneId::MainMenu),
            "Victory" => Some(SceneId::Victory),
            "Defeat" => Some(SceneId::Defeat),
            _ => name
                .strip_prefix("Level_")
                .and_then(|n| n.parse().ok())
                .map(SceneId::Level),
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneId::MainMenu => write!(f, "MainMenu"),
            SceneId::Level(n) => write!(f, "Level_{n}"),
            SceneId::Victory => write!(f, "Victory"),
            SceneId::Defeat => write!(f, "Defeat"),
        }
    }
}

/// Scene-loading service
pub trait SceneLoader {
    fn load_scene(&mut self, scene: SceneId);
}

/// Queue scene requests for the host's main loop
impl SceneLoader for mpsc::Sender<SceneId> {
    fn load_scene(&mut self, scene: SceneId) {
        if self.send(scene).is_err() {
            log::warn!("Scene loader disconnected, dropping request for {scene}");
        }
    }
}

/// Coarse progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Menu, victory or defeat screen
    OutOfPlay,
    InLevel,
    /// Level cleared, next level load pending
    LevelCompleted,
    /// Last level cleared, victory load pending or shown
    Victory,
    /// Out of lives
    Defeat,
}

/// Debug dump of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u64,
    pub lives: u32,
    pub bricks_remaining: usize,
    pub level_completed: bool,
    pub game_ended: bool,
    pub scene: SceneId,
    pub last_level: u32,
}

/// Long-lived progression state
#[derive(Debug)]
pub struct GameSession {
    settings: ProgressionSettings,
    score: u64,
    lives: u32,
    bricks_remaining: usize,
    level_completed: bool,
    game_ended: bool,
    scene: SceneId,
    hud: Hud,
}

impl GameSession {
    pub fn new(settings: ProgressionSettings) -> Self {
        let lives = settings.starting_lives;
        Self {
            settings,
            score: 0,
            lives,
            bricks_remaining: 0,
            level_completed: false,
            game_ended: false,
            scene: SceneId::MainMenu,
            hud: Hud::unbound(),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks_remaining
    }

    pub fn level_completed(&self) -> bool {
        self.level_completed
    }

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        if self.game_ended {
            if self.lives == 0 {
                Phase::Defeat
            } else {
                Phase::Victory
            }
        } else if self.level_completed {
            Phase::LevelCompleted
        } else if self.scene.is_game_level() {
            Phase::InLevel
        } else {
            Phase::OutOfPlay
        }
    }

    pub fn add_score(&mut self, value: u32) {
        self.score += u64::from(value);
        self.update_ui();
        log::debug!("Score updated: {}", self.score);
    }

    /// Ball fell past the paddle
    pub fn lose_life(&mut self, scheduler: &mut Scheduler<Timer>) {
        if self.game_ended {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.update_ui();
        log::info!("Life lost, {} remaining", self.lives);

        if self.lives == 0 {
            self.game_ended = true;
            log::info!(
                "Game over, loading {} in {}s",
                SceneId::Defeat,
                self.settings.defeat_delay
            );
            scheduler.schedule_once(self.settings.defeat_delay, Timer::LoadScene(SceneId::Defeat));
        }
    }

    /// A breakable brick was destroyed
    ///
    /// The internal counter is decremented now and re-derived from the live
    /// census on the next step (`Timer::VerifyBrickCount`), once the destroyed
    /// brick has left the level.
    pub fn brick_destroyed(&mut self, scheduler: &mut Scheduler<Timer>) {
        if self.level_completed || self.game_ended {
            return;
        }

        self.bricks_remaining = self.bricks_remaining.saturating_sub(1);
        log::debug!("Brick destroyed, {} remaining", self.bricks_remaining);
        scheduler.next_step(Timer::VerifyBrickCount);
    }

    /// Adopt the authoritative census and complete the level if it is empty
    pub fn verify_brick_count(&mut self, live_bricks: usize, scheduler: &mut Scheduler<Timer>) {
        log::debug!(
            "Brick census: counted {}, live {}",
            self.bricks_remaining,
            live_bricks
        );
        self.bricks_remaining = live_bricks;

        if self.bricks_remaining == 0 && !self.level_completed {
            self.level_completed = true;
            log::info!("Level {} complete", self.scene);
            self.on_level_completed(scheduler);
        }
    }

    /// Census for a freshly loaded scene (`Timer::CountBricks`)
    pub fn count_bricks(&mut self, live_bricks: usize) {
        self.bricks_remaining = live_bricks;
        log::debug!("Bricks in {}: {}", self.scene, live_bricks);

        if live_bricks == 0 && self.scene.is_game_level() {
            log::error!("No bricks found in playable scene {} - it cannot be completed", self.scene);
        }
    }

    /// Recount immediately, completing an empty playable level
    pub fn force_count_bricks(&mut self, live_bricks: usize, scheduler: &mut Scheduler<Timer>) {
        self.bricks_remaining = live_bricks;
        log::debug!("Forced brick count: {}", live_bricks);

        if live_bricks == 0 && self.scene.is_game_level() && !self.level_completed {
            log::info!("Forcing level transition from {}", self.scene);
            self.level_completed = true;
            self.on_level_completed(scheduler);
        }
    }

    fn on_level_completed(&mut self, scheduler: &mut Scheduler<Timer>) {
        if self.game_ended {
            return;
        }

        if self.settings.show_level_complete_message {
            self.hud.show_message(LEVEL_COMPLETE_MESSAGE);
        }

        let delay = self.settings.level_transition_delay;
        match self.scene {
            SceneId::Level(n) if n < self.settings.level_count => {
                let next = SceneId::Level(n + 1);
                log::info!("Loading {next} in {delay}s");
                scheduler.schedule_once(delay, Timer::LoadScene(next));
            }
            _ => {
                self.game_ended = true;
                log::info!("All levels complete, loading {} in {delay}s", SceneId::Victory);
                scheduler.schedule_once(delay, Timer::LoadScene(SceneId::Victory));
            }
        }
    }

    /// A new scene is live
    ///
    /// Clears both latches, binds the scene's display elements and schedules
    /// the brick census for the next step, after scene construction settles.
    pub fn on_scene_loaded(&mut self, scene: SceneId, hud: Hud, scheduler: &mut Scheduler<Timer>) {
        log::info!("Scene loaded: {scene}");
        self.scene = scene;
        self.level_completed = false;
        self.game_ended = false;

        if scene.is_game_level() {
            hud.warn_missing();
        }
        self.hud = hud;
        self.update_ui();

        scheduler.next_step(Timer::CountBricks);
    }

    /// Fresh run: score 0, full lives, latches cleared
    pub fn reset_game(&mut self) {
        log::info!("Resetting game");
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.level_completed = false;
        self.game_ended = false;
        self.update_ui();
    }

    /// Text for the victory/defeat screens
    pub fn final_score_text(&self) -> String {
        format!("Final Score: {}", self.score)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            lives: self.lives,
            bricks_remaining: self.bricks_remaining,
            level_completed: self.level_completed,
            game_ended: self.game_ended,
            scene: self.scene,
            last_level: self.settings.level_count,
        }
    }

    fn update_ui(&mut self) {
        self.hud.update(self.score, self.lives);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::SharedText;

    fn loads(scheduler: &Scheduler<Timer>) -> Vec<SceneId> {
        scheduler
            .pending_actions()
            .filter_map(|t| match t {
                Timer::LoadScene(scene) => Some(*scene),
                _ => None,
            })
            .collect()
    }

    fn in_level(n: u32, bricks: usize) -> (GameSession, Scheduler<Timer>) {
        let mut session = GameSession::new(ProgressionSettings::default());
        let mut scheduler = Scheduler::new();
        session.on_scene_loaded(SceneId::Level(n), Hud::unbound(), &mut scheduler);
        assert_eq!(scheduler.advance(0.02), vec![Timer::CountBricks]);
        session.count_bricks(bricks);
        (session, scheduler)
    }

    #[test]
    fn test_scene_names() {
        assert_eq!(SceneId::Level(2).to_string(), "Level_2");
        assert_eq!(SceneId::from_name("Level_7"), Some(SceneId::Level(7)));
        assert_eq!(SceneId::from_name("Defeat"), Some(SceneId::Defeat));
        assert_eq!(SceneId::from_name("Level_x"), None);
        assert!(SceneId::Level(1).is_game_level());
        assert!(!SceneId::Victory.is_game_level());
    }

    #[test]
    fn test_add_score_updates_display() {
        let score = SharedText::new();
        let mut session = GameSession::new(ProgressionSettings::default());
        let mut scheduler = Scheduler::new();
        session.on_scene_loaded(
            SceneId::Level(1),
            Hud::unbound().with_score(score.clone()),
            &mut scheduler,
        );
        assert_eq!(score.text(), "Score: 0");
        session.add_score(100);
        session.add_score(250);
        assert_eq!(session.score(), 350);
        assert_eq!(score.text(), "Score: 350");
    }

    #[test]
    fn test_three_lives_lost_schedules_defeat_once() {
        let (mut session, mut scheduler) = in_level(1, 10);
        let lives = SharedText::new();
        session.hud = Hud::unbound().with_lives(lives.clone());

        session.lose_life(&mut scheduler);
        session.lose_life(&mut scheduler);
        assert!(!session.game_ended());
        assert_eq!(lives.text(), "Lives: 1");
        session.lose_life(&mut scheduler);

        assert_eq!(session.lives(), 0);
        assert!(session.game_ended());
        assert_eq!(session.phase(), Phase::Defeat);
        assert_eq!(loads(&scheduler), vec![SceneId::Defeat]);

        // Further events are no-ops
        session.lose_life(&mut scheduler);
        session.brick_destroyed(&mut scheduler);
        assert_eq!(session.lives(), 0);
        assert_eq!(scheduler.len(), 1);

        assert!(scheduler.advance(0.9).is_empty());
        assert_eq!(scheduler.advance(0.1), vec![Timer::LoadScene(SceneId::Defeat)]);
    }

    #[test]
    fn test_brick_destroyed_reverifies_next_step() {
        let (mut session, mut scheduler) = in_level(1, 3);
        session.brick_destroyed(&mut scheduler);
        assert_eq!(session.bricks_remaining(), 2);

        // Census disagrees (two bricks went in one hit) - census wins
        assert_eq!(scheduler.advance(0.02), vec![Timer::VerifyBrickCount]);
        session.verify_brick_count(1, &mut scheduler);
        assert_eq!(session.bricks_remaining(), 1);
        assert!(!session.level_completed());
    }

    #[test]
    fn test_fifty_bricks_complete_once() {
        let (mut session, mut scheduler) = in_level(1, 50);
        let mut live = 50;
        for _ in 0..50 {
            live -= 1;
            session.brick_destroyed(&mut scheduler);
            for timer in scheduler.advance(0.02) {
                assert_eq!(timer, Timer::VerifyBrickCount);
                session.verify_brick_count(live, &mut scheduler);
            }
        }
        assert!(session.level_completed());
        assert_eq!(session.phase(), Phase::LevelCompleted);
        assert_eq!(loads(&scheduler), vec![SceneId::Level(2)]);
    }

    #[test]
    fn test_same_tick_destructions_complete_once() {
        let (mut session, mut scheduler) = in_level(2, 4);
        for _ in 0..4 {
            session.brick_destroyed(&mut scheduler);
        }
        let timers = scheduler.advance(0.02);
        assert_eq!(timers.len(), 4);
        for _ in timers {
            session.verify_brick_count(0, &mut scheduler);
        }
        // Level 2 is the last level
        assert!(session.game_ended());
        assert_eq!(session.phase(), Phase::Victory);
        assert_eq!(loads(&scheduler), vec![SceneId::Victory]);
    }

    #[test]
    fn test_level_complete_message() {
        let message = SharedText::new();
        let mut session = GameSession::new(ProgressionSettings::default());
        let mut scheduler = Scheduler::new();
        session.on_scene_loaded(
            SceneId::Level(1),
            Hud::unbound().with_message(message.clone()),
            &mut scheduler,
        );
        scheduler.clear();
        session.brick_destroyed(&mut scheduler);
        scheduler.advance(0.02);
        session.verify_brick_count(0, &mut scheduler);
        assert_eq!(message.text(), LEVEL_COMPLETE_MESSAGE);
    }

    #[test]
    fn test_life_loss_after_completion_does_not_block_victory_latch() {
        let (mut session, mut scheduler) = in_level(2, 1);
        session.brick_destroyed(&mut scheduler);
        scheduler.advance(0.02);
        session.verify_brick_count(0, &mut scheduler);
        assert!(session.game_ended());

        // Ended: a late life loss is ignored
        session.lose_life(&mut scheduler);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn test_scene_load_clears_latches() {
        let (mut session, mut scheduler) = in_level(1, 1);
        for _ in 0..3 {
            session.lose_life(&mut scheduler);
        }
        assert!(session.game_ended());
        scheduler.clear();
        session.on_scene_loaded(SceneId::Defeat, Hud::unbound(), &mut scheduler);
        assert!(!session.game_ended());
        assert!(!session.level_completed());
        assert_eq!(session.phase(), Phase::OutOfPlay);
        assert_eq!(session.final_score_text(), "Final Score: 0");
    }

    #[test]
    fn test_reset_game() {
        let (mut session, mut scheduler) = in_level(1, 5);
        session.add_score(500);
        for _ in 0..3 {
            session.lose_life(&mut scheduler);
        }
        assert_eq!(session.score(), 500);
        assert_eq!(session.lives(), 0);

        session.reset_game();
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 3);
        assert!(!session.game_ended());
        assert!(!session.level_completed());
    }

    #[test]
    fn test_empty_level_does_not_crash() {
        let (session, _scheduler) = in_level(1, 0);
        assert_eq!(session.bricks_remaining(), 0);
        assert!(!session.level_completed());
    }

    #[test]
    fn test_force_count_completes_empty_level() {
        let (mut session, mut scheduler) = in_level(1, 0);
        session.force_count_bricks(0, &mut scheduler);
        assert!(session.level_completed());
        assert_eq!(loads(&scheduler), vec![SceneId::Level(2)]);

        // Latched: a second force does nothing
        session.force_count_bricks(0, &mut scheduler);
        assert_eq!(loads(&scheduler).len(), 1);
    }

    #[test]
    fn test_force_count_ignored_outside_levels() {
        let mut session = GameSession::new(ProgressionSettings::default());
        let mut scheduler = Scheduler::new();
        session.force_count_bricks(0, &mut scheduler);
        assert!(!session.level_completed());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let (session, _) = in_level(1, 50);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.bricks_remaining, 50);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"bricks_remaining\":50"));
    }

    #[test]
    fn test_sender_loader() {
        let (tx, rx) = mpsc::channel();
        let mut loader = tx;
        loader.load_scene(SceneId::Level(1));
        assert_eq!(rx.try_recv(), Ok(SceneId::Level(1)));
    }
}
