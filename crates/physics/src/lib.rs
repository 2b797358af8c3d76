#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Suika Physics
//!
//! A small 2D rigid-circle world for the fruit-merging game.
//!
//! The world holds static wall segments and dynamic circular particles
//! ("fruits"). Each advance integrates gravity and damping, resolves contacts
//! with impulses and merges touching particles of the same tier into one
//! particle of the next tier. Merges report their points through the
//! [`ScoreDelta`] returned from [`World::advance`]; there is no shared score
//! accumulator.
//!
//! ## Key Components
//!
//! -   **[`World`]:** the interface the environment drives. Tests can supply
//!     their own scripted implementation.
//! -   **[`PhysicsSim`]:** the production world.
//! -   **[`FruitTable`]:** radius and points per tier.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Fruit, FruitTable, PhysicsSim, Vec2, World, WorldParams};
//!
//! let fruits = FruitTable::new(vec![
//!     Fruit { radius: 10.0, points: 1.0 },
//!     Fruit { radius: 20.0, points: 3.0 },
//! ]);
//! let mut sim = PhysicsSim::new(WorldParams::default(), fruits)?;
//! sim.add_container(
//!     Vec2::new(100.0, 100.0),
//!     Vec2::new(100.0, 500.0),
//!     Vec2::new(400.0, 500.0),
//!     Vec2::new(400.0, 100.0),
//! )?;
//! sim.add_particle(Vec2::new(250.0, 200.0), 0)?;
//! let delta = sim.advance(1.0 / 60.0);
//! assert_eq!(delta.merges, 0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

mod builder;
pub mod collision;
pub mod error;
pub mod integrator;
pub mod simulation;
pub mod types;
pub mod world;

pub use error::PhysicsError;
pub use simulation::PhysicsSim;
pub use types::{
    BoundingBox, Fruit, FruitTable, Material, Particle, ParticleId, ParticleView, ScoreDelta,
    Segment, Vec2, WorldParams,
};
pub use world::World;
