//! # Physics Integration
//!
//! Semi-implicit Euler for the dynamic particles: velocity first, then
//! position from the new velocity.

use crate::types::{Particle, Vec2};

/// Integrate velocities and positions of all live particles.
///
/// `damping` is the fraction of velocity kept after one simulated second, so
/// the per-step factor is `damping^dt`.
pub fn integrate_particles(particles: &mut [Particle], gravity: Vec2, damping: f32, dt: f32) {
    let damping_factor = damping.powf(dt);
    for particle in particles.iter_mut().filter(|p| p.alive) {
        particle.vel += gravity * dt;
        particle.vel *= damping_factor;
        particle.pos += particle.vel * dt;
    }
}
