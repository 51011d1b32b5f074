//! Collision categories, contact data and reflection math
//!
//! Everything in the playfield is an axis-aligned box (walls, paddle, bricks,
//! the boundary below the paddle) and the ball is a circle, so contact
//! generation reduces to a circle-vs-box test. Reflection helpers are shared
//! by the ball and the bricks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::brick::BrickId;

/// Paddle extents handed to the ball for bounce-angle computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleBounds {
    pub center_x: f32,
    pub width: f32,
}

/// What the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Paddle(PaddleBounds),
    Wall,
    Brick(BrickId),
    /// Trigger region below the playfield
    Boundary,
    Other,
}

/// A contact delivered by the collision service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub other: Collider,
    /// Contact point on the other collider's surface
    pub point: Vec2,
    /// Surface normal at the contact, pointing toward the ball
    pub normal: Vec2,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a box
///
/// When the ball center has tunneled inside the box, the normal is taken from
/// the face of least penetration.
pub fn ball_aabb_collision(ball_pos: Vec2, ball_radius: f32, aabb: &Aabb) -> CollisionResult {
    let closest = aabb.closest_point(ball_pos);
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-8 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center inside the box - push out through the nearest face
    let local = ball_pos - aabb.center;
    let depth = aabb.half_extents - local.abs();
    if depth.x < depth.y {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            point: Vec2::new(aabb.center.x + sign * aabb.half_extents.x, ball_pos.y),
            normal: Vec2::new(sign, 0.0),
            penetration: depth.x + ball_radius,
        }
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, aabb.center.y + sign * aabb.half_extents.y),
            normal: Vec2::new(0.0, sign),
            penetration: depth.y + ball_radius,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Axis-aligned reflection for box-shaped obstacles
///
/// Flips x when the normal is mostly horizontal, y otherwise.
#[inline]
pub fn axis_aligned_reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    if normal.x.abs() > normal.y.abs() {
        Vec2::new(-velocity.x, velocity.y)
    } else {
        Vec2::new(velocity.x, -velocity.y)
    }
}

/// Rescale `v` to `length`, keeping its direction (zero stays zero)
#[inline]
pub fn with_length(v: Vec2, length: f32) -> Vec2 {
    v.normalize_or_zero() * length
}
