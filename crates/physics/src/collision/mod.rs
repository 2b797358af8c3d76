//! # Collision Detection and Response
//!
//! Contact generation between circles and between circles and static
//! segments, resolved with impulses plus a positional correction.

mod broad_phase;
mod circle_circle;
mod circle_segment;

pub use broad_phase::*;
pub use circle_circle::*;
pub use circle_segment::*;

use crate::types::{Material, Vec2};

/// Overlap tolerated before positional correction kicks in, in pixels.
pub const PENETRATION_SLOP: f32 = 0.5;

/// Contact information for collision response
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact normal (from body A to body B, or from the wall to the body)
    pub normal: Vec2,
    /// Penetration depth (positive means overlap)
    pub depth: f32,
    /// Combined friction coefficient
    pub friction: f32,
    /// Combined restitution coefficient
    pub restitution: f32,
}

impl Contact {
    #[must_use]
    pub fn new(normal: Vec2, depth: f32, mat_a: &Material, mat_b: &Material) -> Self {
        Self {
            normal,
            depth,
            friction: combine_friction(mat_a.friction, mat_b.friction),
            restitution: combine_restitution(mat_a.restitution, mat_b.restitution),
        }
    }
}

/// Combine friction coefficients using geometric mean
fn combine_friction(f1: f32, f2: f32) -> f32 {
    (f1 * f2).sqrt()
}

/// Combine restitution coefficients using geometric mean
fn combine_restitution(r1: f32, r2: f32) -> f32 {
    (r1 * r2).sqrt()
}

/// Fraction of the remaining overlap to remove this step.
///
/// `bias` is the fraction of overlap left after one second.
#[must_use]
pub fn correction_fraction(bias: f32, dt: f32) -> f32 {
    1.0 - bias.powf(dt)
}
