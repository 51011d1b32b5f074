//! Trigger region below the paddle
//!
//! A ball entering it costs a life and goes back to the paddle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{Aabb, ball_aabb_collision};
use super::game::Timer;
use super::progression::GameSession;
use super::scheduler::Scheduler;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryTrigger {
    pub aabb: Aabb,
}

impl BoundaryTrigger {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            aabb: Aabb::new(center, size),
        }
    }

    /// Whether a ball at `pos` overlaps the trigger
    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        ball_aabb_collision(pos, radius, &self.aabb).hit
    }

    /// Ball entered the trigger
    pub fn on_ball_enter(
        &self,
        ball: &mut Ball,
        session: &mut GameSession,
        scheduler: &mut Scheduler<Timer>,
    ) {
        session.lose_life(scheduler);
        ball.reset();
    }
}
