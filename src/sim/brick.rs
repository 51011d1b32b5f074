//! Destructible bricks
//!
//! A breakable brick counts hits and is destroyed on the hit that reaches
//! `hits`. Unbreakable bricks only ever deflect the ball and never count
//! toward clearing the level.

use glam::{Vec2, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{Aabb, axis_aligned_reflect, with_length};
use super::game::Timer;
use super::scheduler::Scheduler;
use crate::consts::*;
use crate::effects::{EffectSink, SoundEffect, VisualEffect};
use crate::settings::BrickSettings;

pub type BrickId = u32;

/// Flash colour shown briefly after a hit
pub const FLASH_COLOR: Vec4 = Vec4::ONE;

/// Row palette used by the standard layout (blue, green, yellow, red, purple, grey)
pub const PALETTE: [Vec4; 6] = [
    Vec4::new(0.25, 0.55, 0.95, 1.0),
    Vec4::new(0.35, 0.8, 0.35, 1.0),
    Vec4::new(0.95, 0.85, 0.25, 1.0),
    Vec4::new(0.9, 0.25, 0.25, 1.0),
    Vec4::new(0.6, 0.35, 0.85, 1.0),
    Vec4::new(0.6, 0.6, 0.6, 1.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Breakable,
    /// Cannot be destroyed, doesn't count for level clear
    Unbreakable,
}

/// Outcome of a ball hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Brick is hidden or already gone
    Ignored,
    /// Unbreakable brick bounced the ball
    Deflected,
    /// Brick took damage and survives
    Damaged { current_hits: u32 },
    /// Brick is gone; award `points`
    Destroyed { points: u32 },
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    pub kind: BrickKind,
    /// Score awarded on destruction
    pub points: u32,
    /// Hits needed to destroy
    pub hits: u32,
    pub current_hits: u32,
    pub aabb: Aabb,
    /// Colours by damage, indexed by `current_hits - 1`
    pub damage_colors: Vec<Vec4>,
    /// Undamaged colour
    pub base_color: Vec4,
    /// Colour currently shown
    pub color: Vec4,
    pub visible: bool,
    pub collidable: bool,
    pub flashing: bool,
    pub flash_duration: f32,
    pub destroy_effect_lifetime: f32,
    destroyed: bool,
}

impl Brick {
    pub fn new(id: BrickId, center: Vec2, size: Vec2, color: Vec4, settings: &BrickSettings) -> Self {
        Self {
            id,
            kind: BrickKind::Breakable,
            points: settings.points,
            hits: 1,
            current_hits: 0,
            aabb: Aabb::new(center, size),
            damage_colors: Vec::new(),
            base_color: color,
            color,
            visible: true,
            collidable: true,
            flashing: false,
            flash_duration: settings.flash_duration,
            destroy_effect_lifetime: settings.destroy_effect_lifetime,
            destroyed: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.aabb.center
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        self.kind == BrickKind::Breakable && !self.destroyed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Reconfigure toughness and colours, clearing accumulated damage
    pub fn set_type(&mut self, hits: u32, colors: Option<Vec<Vec4>>, unbreakable: bool) {
        self.hits = hits.max(1);
        self.kind = if unbreakable {
            BrickKind::Unbreakable
        } else {
            BrickKind::Breakable
        };
        if let Some(colors) = colors.filter(|c| !c.is_empty()) {
            self.damage_colors = colors;
        }
        self.current_hits = 0;
        self.color = self.base_color;
    }

    /// Handle a ball contact
    ///
    /// `normal` is the contact normal pointing toward the ball. The ball is
    /// reflected and pushed clear of the brick; the caller awards points and
    /// removes the brick on [`BrickHit::Destroyed`].
    pub fn on_ball_hit(
        &mut self,
        ball: &mut Ball,
        normal: Vec2,
        rng: &mut impl Rng,
        scheduler: &mut Scheduler<Timer>,
        effects: &mut dyn EffectSink,
    ) -> BrickHit {
        if self.destroyed || !self.collidable {
            return BrickHit::Ignored;
        }

        if self.kind == BrickKind::Unbreakable {
            reflect_ball(ball, normal, rng);
            self.flash(scheduler);
            return BrickHit::Deflected;
        }

        self.current_hits += 1;
        self.update_visual_damage();
        reflect_ball(ball, normal, rng);
        effects.play_sound(SoundEffect::BrickHit, self.pos());

        if self.current_hits >= self.hits {
            self.destroyed = true;
            self.collidable = false;
            self.visible = false;
            effects.play_sound(SoundEffect::BrickBreak, self.pos());
            effects.spawn_effect(VisualEffect::BrickDebris, self.pos(), self.destroy_effect_lifetime);
            log::debug!("Brick {} destroyed (+{} points)", self.id, self.points);
            BrickHit::Destroyed { points: self.points }
        } else {
            self.flash(scheduler);
            BrickHit::Damaged {
                current_hits: self.current_hits,
            }
        }
    }

    /// Colour for the current damage level
    pub fn damage_color(&self) -> Vec4 {
        if self.hits <= 1 || self.current_hits == 0 || self.damage_colors.is_empty() {
            return self.base_color;
        }
        let index = (self.current_hits as usize - 1).min(self.damage_colors.len() - 1);
        self.damage_colors[index]
    }

    fn update_visual_damage(&mut self) {
        if !self.flashing {
            self.color = self.damage_color();
        }
    }

    /// Flash white, reverting after `flash_duration`
    pub fn flash(&mut self, scheduler: &mut Scheduler<Timer>) {
        self.color = FLASH_COLOR;
        self.flashing = true;
        scheduler.schedule_once(self.flash_duration, Timer::RestoreBrickColor(self.id));
    }

    /// Flash expired (fired by `Timer::RestoreBrickColor`)
    pub fn end_flash(&mut self) {
        self.flashing = false;
        if !self.destroyed {
            self.color = self.damage_color();
        }
    }

    /// Hide the brick and bring it back, undamaged, after `delay` seconds
    pub fn begin_regeneration(&mut self, delay: f32, scheduler: &mut Scheduler<Timer>) {
        if self.destroyed {
            return;
        }
        self.visible = false;
        self.collidable = false;
        scheduler.schedule_once(delay, Timer::RegenerateBrick(self.id));
    }

    /// Restore a hidden brick (fired by `Timer::RegenerateBrick`)
    pub fn regenerate(&mut self, scheduler: &mut Scheduler<Timer>) {
        if self.destroyed {
            return;
        }
        self.current_hits = 0;
        self.visible = true;
        self.collidable = true;
        self.flashing = false;
        self.color = self.base_color;
        self.flash(scheduler);
    }
}

/// Per-axis jitter in [-BRICK_JITTER, BRICK_JITTER]
pub fn reflection_jitter(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(-BRICK_JITTER..=BRICK_JITTER),
        rng.random_range(-BRICK_JITTER..=BRICK_JITTER),
    )
}

/// Axis-aligned bounce with jitter, keeping the ball's speed
fn reflect_ball(ball: &mut Ball, normal: Vec2, rng: &mut impl Rng) {
    let incoming = ball.vel;
    // Jitter avoids exact repeating trajectories
    let reflected = axis_aligned_reflect(incoming, normal) + reflection_jitter(rng);

    ball.vel = with_length(reflected, incoming.length());
    ball.last_velocity = ball.vel;
    ball.pos += normal * BRICK_SEPARATION;
}
