//! The "cloud": the piece about to be dropped and a preview of the next one.

use physics::{ParticleId, PhysicsError, Vec2, World};

use crate::config::{ConfigError, GameConfig, LaneConfig};

/// A piece waiting above the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPiece {
    pub kind: usize,
    pub radius: f32,
    pub x: f32,
}

#[derive(Clone, Debug)]
pub struct Spawner {
    current: PendingPiece,
    next: PendingPiece,
    lane: LaneConfig,
    radii: Vec<f32>,
    tiers: usize,
    rng: fastrand::Rng,
}

impl Spawner {
    /// Both pieces start at the lane center.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `config` fails validation, for
    /// instance with an empty fruit table.
    pub fn new(config: &GameConfig, mut rng: fastrand::Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let radii: Vec<f32> = config.fruits.iter().map(|f| f.radius).collect();
        let tiers = config.spawner.tiers;
        let lane = config.lane;
        let current = fresh_piece(&mut rng, &radii, tiers, &lane);
        let next = fresh_piece(&mut rng, &radii, tiers, &lane);
        Ok(Self {
            current,
            next,
            lane,
            radii,
            tiers,
            rng,
        })
    }

    #[must_use]
    pub fn current(&self) -> &PendingPiece {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &PendingPiece {
        &self.next
    }

    /// Move the current piece, keeping it fully inside the lane.
    pub fn set_current_x(&mut self, x: f32) {
        self.current = PendingPiece {
            x: clamp_to_lane(x, self.current.radius, &self.lane),
            ..self.current
        };
    }

    /// Drop the current piece into `world` at the spawn height.
    ///
    /// # Errors
    ///
    /// Propagates the world's error when the piece cannot be added.
    pub fn release<W: World>(&self, world: &mut W) -> Result<ParticleId, PhysicsError> {
        world.add_particle(Vec2::new(self.current.x, self.lane.spawn_y), self.current.kind)
    }

    /// `current ← next`, `next ← fresh piece`.
    pub fn advance(&mut self) {
        let next = fresh_piece(&mut self.rng, &self.radii, self.tiers, &self.lane);
        let promoted = std::mem::replace(&mut self.next, next);
        self.current = PendingPiece {
            x: clamp_to_lane(self.current.x, promoted.radius, &self.lane),
            ..promoted
        };
    }
}

fn fresh_piece(rng: &mut fastrand::Rng, radii: &[f32], tiers: usize, lane: &LaneConfig) -> PendingPiece {
    let kind = rng.usize(..tiers);
    let radius = radii[kind];
    PendingPiece {
        kind,
        radius,
        x: clamp_to_lane((lane.left + lane.right) * 0.5, radius, lane),
    }
}

/// Clamp so the piece fits between the walls; a piece wider than the lane
/// is centered.
fn clamp_to_lane(x: f32, radius: f32, lane: &LaneConfig) -> f32 {
    let lo = lane.left + radius;
    let hi = lane.right - radius;
    if lo <= hi {
        x.clamp(lo, hi)
    } else {
        (lane.left + lane.right) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner(seed: u64) -> Spawner {
        Spawner::new(&GameConfig::default(), fastrand::Rng::with_seed(seed)).unwrap()
    }

    #[test]
    fn x_is_clamped_inside_lane() {
        let mut s = spawner(1);
        let lane = LaneConfig::default();
        let r = s.current().radius;

        s.set_current_x(0.0);
        assert_eq!(s.current().x, lane.left + r);
        s.set_current_x(10_000.0);
        assert_eq!(s.current().x, lane.right - r);
        s.set_current_x(600.0);
        assert_eq!(s.current().x, 600.0);
    }

    #[test]
    fn advance_promotes_next_piece() {
        let mut s = spawner(2);
        let next = *s.next();
        s.set_current_x(500.0);
        s.advance();
        assert_eq!(s.current().kind, next.kind);
        assert_eq!(s.current().radius, next.radius);
        // keeps the last drop column
        assert_eq!(s.current().x, 500.0);
    }

    #[test]
    fn pieces_come_from_spawn_tiers() {
        let mut s = spawner(3);
        for _ in 0..200 {
            assert!(s.current().kind < GameConfig::default().spawner.tiers);
            s.advance();
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = spawner(42);
        let mut b = spawner(42);
        for _ in 0..20 {
            assert_eq!(a.current(), b.current());
            a.advance();
            b.advance();
        }
    }

    #[test]
    fn oversized_piece_is_centered() {
        let lane = LaneConfig {
            left: 100.0,
            right: 120.0,
            ..LaneConfig::default()
        };
        assert_eq!(clamp_to_lane(0.0, 50.0, &lane), 110.0);
    }

    #[test]
    fn empty_fruit_table_is_an_error() {
        let config = GameConfig {
            fruits: Vec::new(),
            ..GameConfig::default()
        };
        let result = Spawner::new(&config, fastrand::Rng::with_seed(0));
        assert!(matches!(result, Err(ConfigError::Invalid { field: "fruits", .. })));
    }
}
