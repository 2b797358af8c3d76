//! # Simulation Builder
//!
//! Methods for adding walls and particles to a [`PhysicsSim`].

use crate::error::PhysicsError;
use crate::simulation::mass_for_radius;
use crate::types::{Particle, ParticleId, Segment, Vec2};
use crate::PhysicsSim;

impl PhysicsSim {
    /// Add an immovable wall segment.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DegenerateSegment`] when both endpoints
    /// coincide, or [`PhysicsError::NonFinitePosition`] for non-finite ends.
    pub fn add_boundary(&mut self, segment: Segment) -> Result<(), PhysicsError> {
        if !segment.a.is_finite() || !segment.b.is_finite() {
            return Err(PhysicsError::NonFinitePosition);
        }
        if (segment.b - segment.a).length_squared() <= f32::EPSILON {
            return Err(PhysicsError::DegenerateSegment {
                x: segment.a.x,
                y: segment.a.y,
            });
        }
        self.boundaries.push(segment);
        Ok(())
    }

    /// Add the open-topped container: left wall, floor, right wall.
    ///
    /// # Errors
    ///
    /// Propagates [`PhysicsSim::add_boundary`] errors.
    pub fn add_container(
        &mut self,
        top_left: Vec2,
        bottom_left: Vec2,
        bottom_right: Vec2,
        top_right: Vec2,
    ) -> Result<(), PhysicsError> {
        self.add_boundary(Segment::new(top_left, bottom_left))?;
        self.add_boundary(Segment::new(bottom_left, bottom_right))?;
        self.add_boundary(Segment::new(bottom_right, top_right))
    }

    /// Add a particle of tier `kind` with an initial velocity.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownFruit`] for tiers outside the fruit
    /// table and [`PhysicsError::NonFinitePosition`] for NaN or infinite input.
    pub fn add_particle_with_velocity(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        kind: usize,
    ) -> Result<ParticleId, PhysicsError> {
        let radius = self
            .fruits
            .get(kind)
            .map(|f| f.radius)
            .ok_or(PhysicsError::UnknownFruit(kind))?;
        if !pos.is_finite() || !vel.is_finite() {
            return Err(PhysicsError::NonFinitePosition);
        }
        let id = self.allocate_id();
        self.particles.push(Particle {
            id,
            kind,
            pos,
            vel,
            radius,
            mass: mass_for_radius(radius),
            alive: true,
            has_collided: false,
        });
        Ok(id)
    }
}
