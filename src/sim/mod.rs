//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Delayed effects go through the scheduler, never wall-clock time
//! - No rendering or platform dependencies

pub mod ball;
pub mod boundary;
pub mod brick;
pub mod collision;
pub mod game;
pub mod level;
pub mod paddle;
pub mod progression;
pub mod scheduler;

pub use ball::Ball;
pub use boundary::BoundaryTrigger;
pub use brick::{Brick, BrickHit, BrickId, BrickKind};
pub use collision::{Aabb, Collider, CollisionEvent, CollisionResult, PaddleBounds, ball_aabb_collision};
pub use game::{Game, TickInput, Timer};
pub use level::Level;
pub use paddle::Paddle;
pub use progression::{GameSession, Phase, SceneId, SceneLoader, SessionSnapshot};
pub use scheduler::{Scheduler, TimerHandle};
