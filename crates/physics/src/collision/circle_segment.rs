//! Circle-segment collision detection and response
//!
//! Walls are one-sided. Inside a wall's span a particle whose center lies
//! behind the wall line is still in contact and is pushed back along the
//! inward normal, however deep it went. Past the endpoints the wall behaves
//! like a rounded cap on its free side.

use super::{Contact, PENETRATION_SLOP};
use crate::types::{Material, Particle, Segment, Vec2};

/// Detect overlap between a particle and a static segment.
pub fn detect_circle_segment_collision(
    particle: &Particle,
    segment: &Segment,
    material: &Material,
) -> Option<Contact> {
    let normal = segment.inward_normal();
    if normal == Vec2::ZERO {
        return None;
    }
    let radius = particle.radius;
    let ab = segment.b - segment.a;
    let rel = particle.pos - segment.a;
    let t = rel.dot(ab) / ab.length_squared();
    let signed = rel.dot(normal);

    if (0.0..=1.0).contains(&t) {
        return (signed < radius)
            .then(|| Contact::new(normal, radius - signed, material, &segment.material));
    }

    let end = if t < 0.0 { segment.a } else { segment.b };
    let delta = particle.pos - end;
    let distance_squared = delta.length_squared();
    if distance_squared >= radius * radius {
        return None;
    }
    let distance = distance_squared.sqrt();
    let contact = if signed > 0.0 && distance > 1e-4 {
        Contact::new(delta / distance, radius - distance, material, &segment.material)
    } else {
        Contact::new(normal, radius - signed, material, &segment.material)
    };
    Some(contact)
}

/// Reflect the normal velocity and project the particle out of the wall.
///
/// Walls are immovable, so the whole overlap beyond the slop is removed at
/// once.
pub fn resolve_circle_segment_collision(particle: &mut Particle, contact: &Contact) {
    let velocity_along_normal = particle.vel.dot(contact.normal);

    if velocity_along_normal < 0.0 {
        let j = -(1.0 + contact.restitution) * velocity_along_normal;
        particle.vel += contact.normal * j;
        apply_friction(particle, contact, j);
    }

    if contact.depth > PENETRATION_SLOP {
        particle.pos += contact.normal * (contact.depth - PENETRATION_SLOP);
    }
}

/// Apply friction impulse along the wall
fn apply_friction(particle: &mut Particle, contact: &Contact, normal_impulse: f32) {
    let tangent = contact.normal.perp();
    let tangent_speed = particle.vel.dot(tangent);
    let max_friction = contact.friction * normal_impulse.abs();
    let jt = (-tangent_speed).clamp(-max_friction, max_friction);
    particle.vel += tangent * jt;
}
