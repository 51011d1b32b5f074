//! Game balance settings
//!
//! Every tunable lives here so a level designer can override it from a JSON
//! file. Missing fields fall back to the defaults in [`crate::consts`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to load settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Ball motion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    /// Target speed the ball is held at
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Minimum angle from horizontal, degrees
    pub min_angle: f32,
    /// Gain applied to the paddle bounce
    pub paddle_bounce_force: f32,
    /// Noise amplitude added to wall reflections
    pub wall_bounce_randomness: f32,
    pub radius: f32,
    /// Height above the paddle while resting on it
    pub rest_offset: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            speed: BALL_SPEED,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            min_angle: BALL_MIN_ANGLE,
            paddle_bounce_force: PADDLE_BOUNCE_FORCE,
            wall_bounce_randomness: WALL_BOUNCE_RANDOMNESS,
            radius: BALL_RADIUS,
            rest_offset: BALL_REST_OFFSET,
        }
    }
}

/// Paddle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub speed: f32,
    /// Paddle x stays within [-x_limit, x_limit]
    pub x_limit: f32,
    pub width: f32,
    pub height: f32,
    pub y: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            speed: PADDLE_SPEED,
            x_limit: PADDLE_X_LIMIT,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            y: PADDLE_Y,
        }
    }
}

/// Brick tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickSettings {
    pub points: u32,
    pub flash_duration: f32,
    /// How long the destruction effect stays alive
    pub destroy_effect_lifetime: f32,
    pub regeneration_delay: f32,
}

impl Default for BrickSettings {
    fn default() -> Self {
        Self {
            points: BRICK_POINTS,
            flash_duration: BRICK_FLASH_DURATION,
            destroy_effect_lifetime: BRICK_DESTROY_EFFECT_LIFETIME,
            regeneration_delay: BRICK_REGENERATION_DELAY,
        }
    }
}

/// Lives, level sequence and transition timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    pub starting_lives: u32,
    /// Number of the last level (levels are numbered from 1)
    pub level_count: u32,
    pub level_transition_delay: f32,
    pub defeat_delay: f32,
    pub show_level_complete_message: bool,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            level_count: LEVEL_COUNT,
            level_transition_delay: LEVEL_TRANSITION_DELAY,
            defeat_delay: DEFEAT_DELAY,
            show_level_complete_message: true,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub brick: BrickSettings,
    pub progression: ProgressionSettings,
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the physics cannot honor
    pub fn validate(&self) -> Result<(), SettingsError> {
        let ball = &self.ball;
        if ball.min_speed <= 0.0 || ball.speed <= 0.0 || ball.max_speed <= 0.0 {
            return Err(SettingsError::Invalid("ball speeds must be positive".into()));
        }
        if ball.min_speed > ball.max_speed {
            return Err(SettingsError::Invalid(format!(
                "ball min_speed {} exceeds max_speed {}",
                ball.min_speed, ball.max_speed
            )));
        }
        if !(ball.min_angle > 0.0 && ball.min_angle <= 45.0) {
            return Err(SettingsError::Invalid(format!(
                "ball min_angle {} must be in (0, 45]",
                ball.min_angle
            )));
        }
        if ball.wall_bounce_randomness < 0.0 {
            return Err(SettingsError::Invalid(
                "wall_bounce_randomness must not be negative".into(),
            ));
        }
        if ball.radius <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "ball radius {} must be positive",
                ball.radius
            )));
        }
        if self.paddle.speed < 0.0 {
            return Err(SettingsError::Invalid("paddle speed must not be negative".into()));
        }
        if self.paddle.x_limit < 0.0 {
            return Err(SettingsError::Invalid("paddle x_limit must not be negative".into()));
        }
        if self.progression.level_count == 0 {
            return Err(SettingsError::Invalid("at least one level is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.ball.speed, 12.0);
        assert_eq!(settings.progression.starting_lives, 3);
        assert_eq!(settings.progression.level_count, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "ball": { "speed": 14.0 }, "progression": { "level_count": 5 } }"#)
                .unwrap();
        assert_eq!(settings.ball.speed, 14.0);
        assert_eq!(settings.ball.min_speed, BALL_MIN_SPEED);
        assert_eq!(settings.progression.level_count, 5);
        assert_eq!(settings.paddle, PaddleSettings::default());
    }

    #[test]
    fn test_rejects_inverted_speed_bounds() {
        let err = Settings::from_json(r#"{ "ball": { "min_speed": 30.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_degenerate_ball_and_paddle() {
        let err = Settings::from_json(r#"{ "ball": { "radius": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "paddle": { "speed": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        // A stationary paddle is allowed
        assert!(Settings::from_json(r#"{ "paddle": { "speed": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_rejects_zero_levels() {
        let err = Settings::from_json(r#"{ "progression": { "level_count": 0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here/brickfall.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.seed = 42;
        settings.brick.points = 250;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
