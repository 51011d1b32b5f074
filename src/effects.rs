//! Sound and visual-effect requests
//!
//! Fire-and-forget: the simulation says what happened and where, the host
//! decides how it sounds and looks.

use glam::Vec2;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball launched from the paddle
    Launch,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Ball hits a brick that survives
    BrickHit,
    /// Brick destroyed
    BrickBreak,
    /// Ball fell past the paddle
    LifeLost,
}

/// Visual effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualEffect {
    /// Debris burst where a brick was destroyed
    BrickDebris,
}

/// Audio/visual-effect service
pub trait EffectSink {
    fn play_sound(&mut self, sound: SoundEffect, at: Vec2);

    /// Spawn an effect that the host removes after `auto_destroy_after` seconds
    fn spawn_effect(&mut self, effect: VisualEffect, at: Vec2, auto_destroy_after: f32);
}

/// Discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn play_sound(&mut self, _sound: SoundEffect, _at: Vec2) {}

    fn spawn_effect(&mut self, _effect: VisualEffect, _at: Vec2, _auto_destroy_after: f32) {}
}

/// Logs every request at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEffects;

impl EffectSink for LogEffects {
    fn play_sound(&mut self, sound: SoundEffect, at: Vec2) {
        log::trace!("sound {:?} at ({:.2}, {:.2})", sound, at.x, at.y);
    }

    fn spawn_effect(&mut self, effect: VisualEffect, at: Vec2, auto_destroy_after: f32) {
        log::trace!(
            "effect {:?} at ({:.2}, {:.2}) for {}s",
            effect,
            at.x,
            at.y,
            auto_destroy_after
        );
    }
}

/// Records requests in order
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    pub sounds: Vec<(SoundEffect, Vec2)>,
    pub effects: Vec<(VisualEffect, Vec2, f32)>,
}

impl RecordingEffects {
    pub fn count(&self, sound: SoundEffect) -> usize {
        self.sounds.iter().filter(|(s, _)| *s == sound).count()
    }
}

impl EffectSink for RecordingEffects {
    fn play_sound(&mut self, sound: SoundEffect, at: Vec2) {
        self.sounds.push((sound, at));
    }

    fn spawn_effect(&mut self, effect: VisualEffect, at: Vec2, auto_destroy_after: f32) {
        self.effects.push((effect, at, auto_destroy_after));
    }
}
