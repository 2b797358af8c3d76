//! Circle-circle collision detection and response

use super::{Contact, PENETRATION_SLOP};
use crate::types::{Material, Particle, Vec2};

/// Detect overlap between two particles.
pub fn detect_circle_circle_collision(
    a: &Particle,
    b: &Particle,
    material: &Material,
) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let distance_squared = delta.length_squared();
    let min_distance = a.radius + b.radius;

    if distance_squared >= min_distance * min_distance {
        return None;
    }

    let distance = distance_squared.sqrt();
    // Coincident centers: push apart vertically
    let normal = if distance > 1e-4 {
        delta / distance
    } else {
        Vec2::new(0.0, 1.0)
    };

    Some(Contact::new(normal, min_distance - distance, material, material))
}

/// Apply impulse-based response between two particles.
pub fn resolve_circle_circle_collision(
    a: &mut Particle,
    b: &mut Particle,
    contact: &Contact,
    correction: f32,
) {
    let inv_a = 1.0 / a.mass;
    let inv_b = 1.0 / b.mass;
    let inv_mass_sum = inv_a + inv_b;

    let relative_velocity = b.vel - a.vel;
    let velocity_along_normal = relative_velocity.dot(contact.normal);

    if velocity_along_normal < 0.0 {
        let j = -(1.0 + contact.restitution) * velocity_along_normal / inv_mass_sum;
        let impulse = contact.normal * j;
        a.vel -= impulse * inv_a;
        b.vel += impulse * inv_b;

        let tangent = contact.normal.perp();
        let tangent_speed = (b.vel - a.vel).dot(tangent);
        let max_friction = contact.friction * j;
        let jt = (-tangent_speed / inv_mass_sum).clamp(-max_friction, max_friction);
        let friction_impulse = tangent * jt;
        a.vel -= friction_impulse * inv_a;
        b.vel += friction_impulse * inv_b;
    }

    let correction_magnitude =
        (contact.depth - PENETRATION_SLOP).max(0.0) / inv_mass_sum * correction;
    let shift = contact.normal * correction_magnitude;
    a.pos -= shift * inv_a;
    b.pos += shift * inv_b;
}
