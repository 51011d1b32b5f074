//! Ball motion controller
//!
//! Collision handlers only decide a new direction. Two post-passes keep the
//! game feel stable regardless of what the handlers did:
//! - `maintain_speed`: clamp into [min_speed, max_speed] and snap back to the
//!   target speed when it drifts more than `SPEED_TOLERANCE`
//! - `correct_shallow_angles`: never let the ball travel within `min_angle`
//!   of horizontal, which would make it bounce between the side walls forever

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, CollisionEvent, PaddleBounds, reflect_velocity, with_length};
use super::game::Timer;
use super::paddle::Paddle;
use super::scheduler::{Scheduler, TimerHandle};
use crate::consts::*;
use crate::settings::BallSettings;
use crate::{angle_from_horizontal, direction_from_vertical};

/// Pending revert of a temporary speed change
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SpeedRevert {
    handle: TimerHandle,
    /// Speed before the first still-active temporary change
    baseline: f32,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Velocity the ball is integrated with, used as the incoming velocity for reflections
    pub last_velocity: Vec2,
    pub radius: f32,
    /// Free motion (false = resting on the paddle)
    pub launched: bool,
    /// Target speed
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Minimum angle from horizontal, degrees
    pub min_angle: f32,
    pub paddle_bounce_force: f32,
    pub wall_bounce_randomness: f32,
    /// Height above the paddle while resting
    pub rest_offset: f32,
    speed_revert: Option<SpeedRevert>,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(&BallSettings::default())
    }
}

impl Ball {
    pub fn new(settings: &BallSettings) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            last_velocity: Vec2::ZERO,
            radius: settings.radius,
            launched: false,
            speed: settings.speed.clamp(settings.min_speed, settings.max_speed),
            min_speed: settings.min_speed,
            max_speed: settings.max_speed,
            min_angle: settings.min_angle,
            paddle_bounce_force: settings.paddle_bounce_force,
            wall_bounce_randomness: settings.wall_bounce_randomness,
            rest_offset: settings.rest_offset,
            speed_revert: None,
        }
    }

    pub fn current_velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn current_speed(&self) -> f32 {
        self.vel.length()
    }

    /// Rest on top of the paddle (call every tick while unlaunched)
    pub fn follow(&mut self, paddle: &Paddle) {
        if !self.launched {
            self.pos = paddle.pos + Vec2::new(0.0, self.rest_offset);
        }
    }

    /// Leave the paddle heading up, within `LAUNCH_SPREAD` degrees of vertical
    ///
    /// Returns false if the ball was already in flight.
    pub fn launch(&mut self, rng: &mut impl Rng) -> bool {
        if self.launched {
            return false;
        }
        let angle = rng.random_range(-LAUNCH_SPREAD..=LAUNCH_SPREAD);
        self.vel = direction_from_vertical(angle) * self.speed;
        self.last_velocity = self.vel;
        self.launched = true;
        log::debug!("Ball launched at {:.1} degrees", angle);
        true
    }

    /// Per-physics-tick corrections (no-op while resting on the paddle)
    pub fn tick(&mut self) {
        if !self.launched {
            return;
        }
        self.maintain_speed();
        self.correct_shallow_angles();
        self.last_velocity = self.vel;
    }

    /// Clamp speed into bounds, then snap back to the target speed if it drifted
    pub fn maintain_speed(&mut self) {
        let current = self.vel.length();

        if current < self.min_speed {
            self.vel = with_length(self.vel, self.min_speed);
        } else if current > self.max_speed {
            self.vel = with_length(self.vel, self.max_speed);
        } else if (current - self.speed).abs() > SPEED_TOLERANCE {
            self.vel = with_length(self.vel, self.speed);
        }
    }

    /// Replace near-horizontal velocities with one at exactly `min_angle`
    ///
    /// Horizontal direction is kept; vertical direction is kept too, with a
    /// perfectly flat velocity sent downward.
    pub fn correct_shallow_angles(&mut self) {
        let angle = angle_from_horizontal(self.vel);
        if angle >= self.min_angle && angle <= 180.0 - self.min_angle {
            return;
        }

        let new_angle = if self.vel.y > 0.0 {
            self.min_angle
        } else {
            -self.min_angle
        };
        let direction = if self.vel.x > 0.0 { 1.0 } else { -1.0 };
        let rad = new_angle.to_radians();
        self.vel = Vec2::new(direction * rad.cos(), rad.sin()) * self.speed;
    }

    /// Respond to a contact
    ///
    /// Brick contacts normally go through [`Brick::on_ball_hit`](super::brick::Brick::on_ball_hit);
    /// the plain reflection here covers contacts with no live brick behind them.
    pub fn on_collision(&mut self, event: &CollisionEvent, rng: &mut impl Rng) {
        if !self.launched {
            return;
        }

        match event.other {
            Collider::Paddle(bounds) => self.bounce_off_paddle(event.point, bounds),
            Collider::Wall => self.bounce_off_wall(event.normal, rng),
            Collider::Brick(_) | Collider::Other => {
                let reflection = reflect_velocity(self.last_velocity, event.normal);
                self.vel = with_length(reflection, self.speed);
            }
            // Trigger region, handled by the boundary
            Collider::Boundary => return,
        }

        self.maintain_speed();
        // Later contacts in the same step reflect the new velocity
        self.last_velocity = self.vel;
    }

    fn bounce_off_paddle(&mut self, contact: Vec2, bounds: PaddleBounds) {
        let relative = paddle_relative_position(contact.x, bounds);
        let direction = paddle_bounce_direction(paddle_bounce_angle(relative));

        self.vel = direction * self.speed * self.paddle_bounce_force;
        // Lift so the ball clears the paddle on the next tick
        self.vel.y += PADDLE_LIFT_IMPULSE;
    }

    fn bounce_off_wall(&mut self, normal: Vec2, rng: &mut impl Rng) {
        let reflection = reflect_velocity(self.last_velocity, normal);
        // Noise breaks exact periodic bounce cycles
        let noise = wall_bounce_noise(rng, self.wall_bounce_randomness);
        self.vel = with_length(reflection + noise, self.speed);
    }

    /// Back to resting on the paddle. The next `follow` re-homes it.
    pub fn reset(&mut self) {
        self.launched = false;
        self.vel = Vec2::ZERO;
        self.last_velocity = Vec2::ZERO;
    }

    /// Change the target speed, clamped into bounds
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(self.min_speed, self.max_speed);
        if self.launched {
            self.vel = with_length(self.vel, self.speed);
        }
    }

    /// Scale the target speed, optionally for `duration` seconds only
    ///
    /// Temporary changes stack on the current speed. Only one revert is ever
    /// pending: each temporary call re-arms it, and it restores the speed from
    /// before the first temporary change that is still active. A permanent
    /// change made meanwhile also scales that baseline.
    pub fn apply_speed_multiplier(
        &mut self,
        multiplier: f32,
        duration: f32,
        scheduler: &mut Scheduler<Timer>,
    ) {
        let new_speed = (self.speed * multiplier).clamp(self.min_speed, self.max_speed);

        if duration > 0.0 {
            let baseline = match self.speed_revert.take() {
                Some(pending) => {
                    scheduler.cancel(pending.handle);
                    pending.baseline
                }
                None => self.speed,
            };
            self.set_speed(new_speed);
            let handle = scheduler.schedule_once(duration, Timer::RestoreBallSpeed);
            self.speed_revert = Some(SpeedRevert { handle, baseline });
        } else {
            if let Some(pending) = &mut self.speed_revert {
                pending.baseline = (pending.baseline * multiplier).clamp(self.min_speed, self.max_speed);
            }
            self.set_speed(new_speed);
        }
    }

    /// Undo the active temporary speed change (fired by `Timer::RestoreBallSpeed`)
    pub fn restore_speed(&mut self) {
        if let Some(pending) = self.speed_revert.take() {
            self.set_speed(pending.baseline);
        }
    }

    pub fn has_temporary_speed(&self) -> bool {
        self.speed_revert.is_some()
    }
}

/// Perturbation for a wall bounce: x in [-r, r], y in [-r/2, r/2]
pub fn wall_bounce_noise(rng: &mut impl Rng, randomness: f32) -> Vec2 {
    let r = randomness.max(0.0);
    Vec2::new(
        rng.random_range(-r..=r),
        rng.random_range(-r * 0.5..=r * 0.5),
    )
}

/// Horizontal contact offset from paddle center, normalized to [-1, 1]
pub fn paddle_relative_position(contact_x: f32, bounds: PaddleBounds) -> f32 {
    let half_width = bounds.width * 0.5;
    if half_width <= 0.0 {
        return 0.0;
    }
    ((contact_x - bounds.center_x) / half_width).clamp(-1.0, 1.0)
}

/// Bounce angle off vertical in degrees; right of center sends the ball right
#[inline]
pub fn paddle_bounce_angle(relative_position: f32) -> f32 {
    relative_position.clamp(-1.0, 1.0) * PADDLE_MAX_BOUNCE_ANGLE
}

/// Always upward unit direction for a bounce angle
#[inline]
pub fn paddle_bounce_direction(angle_degrees: f32) -> Vec2 {
    let rad = angle_degrees.to_radians();
    Vec2::new(rad.sin(), rad.abs().cos()).normalize()
}
