//! The interface the environment drives. [`crate::PhysicsSim`] is the
//! production implementation; tests substitute scripted worlds.

use crate::error::PhysicsError;
use crate::types::{FruitTable, ParticleId, ParticleView, ScoreDelta, Segment, Vec2, WorldParams};

pub trait World {
    /// Build an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidParams`] when the parameters cannot
    /// describe a stable simulation.
    fn create(params: WorldParams, fruits: FruitTable) -> Result<Self, PhysicsError>
    where
        Self: Sized;

    /// Add an immovable wall.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DegenerateSegment`] for zero-length segments.
    fn add_static_boundary(&mut self, segment: Segment) -> Result<(), PhysicsError>;

    /// Add a resting particle of tier `kind` centered at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownFruit`] for tiers outside the fruit table.
    fn add_particle(&mut self, position: Vec2, kind: usize) -> Result<ParticleId, PhysicsError>;

    /// Step all dynamics by `dt` seconds, resolving contacts and merges.
    fn advance(&mut self, dt: f32) -> ScoreDelta;

    /// Snapshot of every live particle, in insertion order.
    fn live_particles(&self) -> Vec<ParticleView>;
}
