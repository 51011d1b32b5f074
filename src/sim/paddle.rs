//! Player paddle
//!
//! Purely position-integrating: input axis times speed times dt, then a clamp
//! into the playfield. The ball reads the paddle's bounds to compute bounce
//! angles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, PaddleBounds};
use crate::settings::PaddleSettings;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    /// Collision box size
    pub size: Vec2,
    /// Horizontal speed at full input deflection
    pub speed: f32,
    /// x stays within [-x_limit, x_limit]
    pub x_limit: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new(&PaddleSettings::default())
    }
}

impl Paddle {
    pub fn new(settings: &PaddleSettings) -> Self {
        Self {
            pos: Vec2::new(0.0, settings.y),
            size: Vec2::new(settings.width, settings.height),
            speed: settings.speed,
            x_limit: settings.x_limit,
        }
    }

    /// Move by `axis` in [-1, 1] for `dt` seconds, staying inside the playfield
    pub fn update(&mut self, axis: f32, dt: f32) {
        let axis = axis.clamp(-1.0, 1.0);
        self.pos.x += axis * self.speed * dt;
        self.pos.x = self.pos.x.clamp(-self.x_limit, self.x_limit);
    }

    /// Axis input that steers toward `target_x` without overshooting this tick
    pub fn axis_toward(&self, target_x: f32, dt: f32) -> f32 {
        let max_step = self.speed * dt;
        if max_step <= 0.0 {
            return 0.0;
        }
        ((target_x - self.pos.x) / max_step).clamp(-1.0, 1.0)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn bounds(&self) -> PaddleBounds {
        PaddleBounds {
            center_x: self.pos.x,
            width: self.width(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}
