//! # Physics Simulation Core
//!
//! This module provides the main simulation structure. One [`PhysicsSim::step`]
//! integrates the particles, then runs a few contact passes over the broad
//! phase pairs and the static walls. Touching particles of the same tier are
//! merged into the next tier and their points reported in the returned
//! [`ScoreDelta`].

use crate::collision::{
    correction_fraction, detect_circle_circle_collision, detect_circle_segment_collision,
    resolve_circle_circle_collision, resolve_circle_segment_collision, SpatialGrid,
};
use crate::error::PhysicsError;
use crate::integrator::integrate_particles;
use crate::types::{
    BoundingBox, FruitTable, Particle, ParticleId, ParticleView, ScoreDelta, Segment, Vec2,
    WorldParams,
};
use crate::world::World;

/// Upper bound on internal sub-steps per [`PhysicsSim::step`].
const MAX_INTERNAL_SUBSTEPS: u32 = 16;

/// Main physics simulation container
#[derive(Clone, Debug)]
pub struct PhysicsSim {
    // Bodies
    pub particles: Vec<Particle>,
    pub boundaries: Vec<Segment>,

    // Simulation parameters
    pub params: WorldParams,
    pub fruits: FruitTable,

    // Spatial acceleration
    pub spatial_grid: SpatialGrid,

    pub(crate) next_id: u64,
}

impl PhysicsSim {
    /// Create an empty simulation.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidParams`] for non-finite gravity, a
    /// damping outside `(0, 1]`, a bias outside `(0, 1)`, zero solver
    /// iterations, an empty fruit table, a non-positive fruit radius or an
    /// extent too large for the spatial grid.
    pub fn new(params: WorldParams, fruits: FruitTable) -> Result<Self, PhysicsError> {
        validate_params(&params, &fruits)?;

        let max_radius = (0..fruits.len())
            .filter_map(|k| fruits.get(k))
            .map(|f| f.radius)
            .fold(0.0_f32, f32::max);
        let bounds = BoundingBox {
            min: Vec2::ZERO,
            max: params.extent,
        };
        let spatial_grid = SpatialGrid::new((max_radius * 2.0).max(1.0), bounds)?;

        Ok(Self {
            particles: Vec::new(),
            boundaries: Vec::new(),
            params,
            fruits,
            spatial_grid,
            next_id: 0,
        })
    }

    /// Advance the simulation by one increment of `dt` seconds.
    ///
    /// The increment is split into internal sub-steps so no particle moves
    /// more than half of the smallest radius per sub-step.
    pub fn step(&mut self, dt: f32) -> ScoreDelta {
        let substeps = self.internal_substeps(dt);
        #[allow(clippy::cast_precision_loss)]
        let h = dt / substeps as f32;
        let correction = correction_fraction(self.params.bias, h);

        let mut delta = ScoreDelta::default();
        for _ in 0..substeps {
            integrate_particles(&mut self.particles, self.params.gravity, self.params.damping, h);
            for _ in 0..self.params.iterations {
                delta += self.solve_particle_contacts(correction);
                self.solve_boundary_contacts();
            }
        }

        self.particles.retain(|p| p.alive);
        if delta.merges > 0 {
            tracing::trace!(merges = delta.merges, points = delta.points, "particles merged");
        }
        delta
    }

    /// Run `steps` increments, summing the score deltas.
    pub fn run(&mut self, dt: f32, steps: usize) -> ScoreDelta {
        let mut total = ScoreDelta::default();
        for _ in 0..steps {
            total += self.step(dt);
        }
        total
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn internal_substeps(&self, dt: f32) -> u32 {
        let max_speed = self
            .particles
            .iter()
            .filter(|p| p.alive)
            .map(|p| (p.vel + self.params.gravity * dt).length())
            .fold(0.0_f32, f32::max);
        let min_radius = self
            .particles
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.radius)
            .fold(f32::INFINITY, f32::min);
        if !min_radius.is_finite() || max_speed <= 0.0 {
            return 1;
        }
        let travel = max_speed * dt / (0.5 * min_radius);
        (travel.ceil() as u32).clamp(1, MAX_INTERNAL_SUBSTEPS)
    }

    pub(crate) fn allocate_id(&mut self) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        id
    }
}

// Contact passes
impl PhysicsSim {
    fn solve_particle_contacts(&mut self, correction: f32) -> ScoreDelta {
        self.spatial_grid.update(&self.particles);
        let material = self.params.material;
        let mut delta = ScoreDelta::default();
        let mut spawned = Vec::new();

        for (i, j) in self.spatial_grid.potential_pairs() {
            let (before, after) = self.particles.split_at_mut(j);
            let (a, b) = (&mut before[i], &mut after[0]);
            if !a.alive || !b.alive {
                continue;
            }
            let Some(contact) = detect_circle_circle_collision(a, b, &material) else {
                continue;
            };
            a.has_collided = true;
            b.has_collided = true;

            let merged = if a.kind == b.kind {
                self.fruits.merged(a.kind)
            } else {
                None
            };
            match merged.and_then(|kind| self.fruits.get(kind).map(|f| (kind, f))) {
                Some((kind, fruit)) => {
                    a.alive = false;
                    b.alive = false;
                    spawned.push(Particle {
                        id: ParticleId(0),
                        kind,
                        pos: (a.pos + b.pos) * 0.5,
                        vel: (a.vel + b.vel) * 0.5,
                        radius: fruit.radius,
                        mass: mass_for_radius(fruit.radius),
                        alive: true,
                        has_collided: true,
                    });
                    delta += ScoreDelta {
                        points: fruit.points,
                        merges: 1,
                    };
                }
                None => resolve_circle_circle_collision(a, b, &contact, correction),
            }
        }

        for mut particle in spawned {
            particle.id = self.allocate_id();
            self.particles.push(particle);
        }
        delta
    }

    /// Runs after the particle pass so every iteration ends with all live
    /// particles projected onto the free side of the walls.
    fn solve_boundary_contacts(&mut self) {
        let material = self.params.material;
        for particle in self.particles.iter_mut().filter(|p| p.alive) {
            for segment in &self.boundaries {
                if let Some(contact) = detect_circle_segment_collision(particle, segment, &material) {
                    particle.has_collided = true;
                    resolve_circle_segment_collision(particle, &contact);
                }
            }
        }
    }
}

/// Mass of a disc of unit density.
#[must_use]
pub fn mass_for_radius(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

fn validate_params(params: &WorldParams, fruits: &FruitTable) -> Result<(), PhysicsError> {
    if !params.gravity.is_finite() {
        return Err(PhysicsError::InvalidParams("gravity must be finite"));
    }
    if !(params.damping > 0.0 && params.damping <= 1.0) {
        return Err(PhysicsError::InvalidParams("damping must be in (0, 1]"));
    }
    if !(params.bias > 0.0 && params.bias < 1.0) {
        return Err(PhysicsError::InvalidParams("bias must be in (0, 1)"));
    }
    if params.iterations == 0 {
        return Err(PhysicsError::InvalidParams("iterations must be positive"));
    }
    if !(params.extent.is_finite() && params.extent.x > 0.0 && params.extent.y > 0.0) {
        return Err(PhysicsError::InvalidParams("extent must be positive and finite"));
    }
    if fruits.is_empty() {
        return Err(PhysicsError::InvalidParams("fruit table is empty"));
    }
    let bad_radius = (0..fruits.len())
        .filter_map(|k| fruits.get(k))
        .any(|f| !(f.radius > 0.0 && f.radius.is_finite()));
    if bad_radius {
        return Err(PhysicsError::InvalidParams("fruit radius must be positive"));
    }
    Ok(())
}

impl World for PhysicsSim {
    fn create(params: WorldParams, fruits: FruitTable) -> Result<Self, PhysicsError> {
        Self::new(params, fruits)
    }

    fn add_static_boundary(&mut self, segment: Segment) -> Result<(), PhysicsError> {
        self.add_boundary(segment)
    }

    fn add_particle(&mut self, position: Vec2, kind: usize) -> Result<ParticleId, PhysicsError> {
        self.add_particle_with_velocity(position, Vec2::ZERO, kind)
    }

    fn advance(&mut self, dt: f32) -> ScoreDelta {
        self.step(dt)
    }

    fn live_particles(&self) -> Vec<ParticleView> {
        self.particles
            .iter()
            .filter(|p| p.alive)
            .map(Particle::view)
            .collect()
    }
}
