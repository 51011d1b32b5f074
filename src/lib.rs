//! Brickfall - a breakout/arkanoid game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, bricks, paddle, progression)
//! - `hud`: Score/lives/message display seam
//! - `effects`: Sound and visual-effect seam
//! - `settings`: Data-driven game balance

pub mod effects;
pub mod hud;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball defaults
    pub const BALL_SPEED: f32 = 12.0;
    pub const BALL_MIN_SPEED: f32 = 8.0;
    pub const BALL_MAX_SPEED: f32 = 20.0;
    pub const BALL_RADIUS: f32 = 0.11;
    /// Minimum angle from horizontal (degrees)
    pub const BALL_MIN_ANGLE: f32 = 15.0;
    /// Deviation from target speed tolerated before snapping back
    pub const SPEED_TOLERANCE: f32 = 0.5;
    /// Launch direction is drawn from [-LAUNCH_SPREAD, LAUNCH_SPREAD] degrees off vertical
    pub const LAUNCH_SPREAD: f32 = 45.0;
    /// Height above the paddle while the ball rests on it
    pub const BALL_REST_OFFSET: f32 = 0.6;

    /// Paddle bounce
    pub const PADDLE_MAX_BOUNCE_ANGLE: f32 = 75.0;
    pub const PADDLE_BOUNCE_FORCE: f32 = 1.2;
    /// Upward velocity kick after a paddle bounce (unit mass)
    pub const PADDLE_LIFT_IMPULSE: f32 = 2.0;
    pub const WALL_BOUNCE_RANDOMNESS: f32 = 0.1;

    /// Paddle defaults
    pub const PADDLE_SPEED: f32 = 10.0;
    /// Paddle x is clamped to [-PADDLE_X_LIMIT, PADDLE_X_LIMIT]
    pub const PADDLE_X_LIMIT: f32 = 8.5;
    pub const PADDLE_WIDTH: f32 = 1.04;
    pub const PADDLE_HEIGHT: f32 = 0.24;
    pub const PADDLE_Y: f32 = -4.0;

    /// Brick defaults
    pub const BRICK_POINTS: u32 = 100;
    pub const BRICK_WIDTH: f32 = 0.64;
    pub const BRICK_HEIGHT: f32 = 0.32;
    /// Per-axis jitter added to a brick reflection
    pub const BRICK_JITTER: f32 = 0.05;
    /// Distance the ball is pushed out of a brick along the contact normal
    pub const BRICK_SEPARATION: f32 = 0.1;
    pub const BRICK_FLASH_DURATION: f32 = 0.1;
    pub const BRICK_DESTROY_EFFECT_LIFETIME: f32 = 2.0;
    pub const BRICK_REGENERATION_DELAY: f32 = 2.0;

    /// Playfield (orthographic view of half-height 5 at 16:9)
    pub const VIEW_HALF_HEIGHT: f32 = 5.0;
    pub const VIEW_ASPECT: f32 = 16.0 / 9.0;
    pub const WALL_THICKNESS: f32 = 1.0;
    pub const BOUNDARY_Y: f32 = -5.5;

    /// Progression defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const LEVEL_COUNT: u32 = 2;
    pub const LEVEL_TRANSITION_DELAY: f32 = 0.5;
    pub const DEFEAT_DELAY: f32 = 1.0;
}

/// Angle of a vector from the positive horizontal axis, in degrees [0, 180]
///
/// Direction-agnostic on the vertical axis: (1, 1) and (1, -1) both give 45.
#[inline]
pub fn angle_from_horizontal(v: Vec2) -> f32 {
    v.y.atan2(v.x).abs().to_degrees()
}

/// Unit vector at `degrees` off the vertical axis (positive = toward +x)
#[inline]
pub fn direction_from_vertical(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}
