//! Scene contents for a playable level

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::boundary::BoundaryTrigger;
use super::brick::{Brick, BrickId, PALETTE};
use super::collision::Aabb;
use super::paddle::Paddle;
use crate::consts::*;
use crate::settings::Settings;

/// Standard brick grid
pub const BRICK_ROWS: u32 = 5;
pub const BRICK_COLUMNS: u32 = 10;
pub const BRICK_X_SPACING: f32 = 1.1;
pub const BRICK_Y_SPACING: f32 = 0.6;
/// Centre y of the top row
pub const BRICK_TOP_Y: f32 = 3.5;

/// Entities of one loaded level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub walls: Vec<Aabb>,
    pub boundary: BoundaryTrigger,
}

impl Level {
    /// Paddle, resting ball, walls and boundary, no bricks
    pub fn empty(settings: &Settings) -> Self {
        let paddle = Paddle::new(&settings.paddle);
        let mut ball = Ball::new(&settings.ball);
        ball.follow(&paddle);

        let half_width = VIEW_HALF_HEIGHT * VIEW_ASPECT;
        let side_x = half_width + WALL_THICKNESS * 0.5;
        let side_size = Vec2::new(WALL_THICKNESS, VIEW_HALF_HEIGHT * 2.0);
        let walls = vec![
            Aabb::new(Vec2::new(-side_x, 0.0), side_size),
            Aabb::new(Vec2::new(side_x, 0.0), side_size),
            Aabb::new(
                Vec2::new(0.0, VIEW_HALF_HEIGHT + WALL_THICKNESS * 0.5),
                Vec2::new(half_width * 2.0, WALL_THICKNESS),
            ),
        ];

        Self {
            paddle,
            ball,
            bricks: Vec::new(),
            walls,
            boundary: BoundaryTrigger::new(
                Vec2::new(0.0, BOUNDARY_Y),
                Vec2::new(half_width * 2.0 + WALL_THICKNESS * 2.0, 1.0),
            ),
        }
    }

    /// Standard layout: a 5x10 grid, coloured by row
    ///
    /// From level 2 on, the top rows take extra hits and show damage colours.
    pub fn standard(level_number: u32, settings: &Settings) -> Self {
        let mut level = Self::empty(settings);
        let start_x = -((BRICK_COLUMNS - 1) as f32) * BRICK_X_SPACING * 0.5;
        let size = Vec2::new(BRICK_WIDTH, BRICK_HEIGHT);
        let tough_rows = level_number.saturating_sub(1).min(BRICK_ROWS);

        let mut id: BrickId = 0;
        for row in 0..BRICK_ROWS {
            let color = PALETTE[row as usize % PALETTE.len()];
            for col in 0..BRICK_COLUMNS {
                let center = Vec2::new(
                    start_x + col as f32 * BRICK_X_SPACING,
                    BRICK_TOP_Y - row as f32 * BRICK_Y_SPACING,
                );
                let mut brick = Brick::new(id, center, size, color, &settings.brick);
                if row < tough_rows {
                    brick.set_type(2, Some(vec![dim(color)]), false);
                }
                level.bricks.push(brick);
                id += 1;
            }
        }

        log::debug!(
            "Built level {} with {} bricks",
            level_number,
            level.bricks.len()
        );
        level
    }

    /// Bricks that still have to be destroyed
    pub fn live_brick_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    pub fn brick_mut(&mut self, id: BrickId) -> Option<&mut Brick> {
        self.bricks.iter_mut().find(|b| b.id == id)
    }

    /// Drop destroyed bricks. Returns how many were removed.
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.bricks.len();
        self.bricks.retain(|b| !b.is_destroyed());
        before - self.bricks.len()
    }
}

fn dim(color: Vec4) -> Vec4 {
    Vec4::new(color.x * 0.6, color.y * 0.6, color.z * 0.6, color.w)
}
