//! Fixed-length observation vectors.
//!
//! Layout: a header describing the spawner and the lane, then up to
//! `max_fruits` particle records `(kind, x, y, radius)` ordered top to bottom,
//! then zero padding. Every entry is divided by its normalizer and nothing is
//! clamped.

use bytemuck::{Pod, Zeroable};
use physics::ParticleView;

use crate::config::{ConfigError, GameConfig, HeaderLayout, LaneConfig};
use crate::spawner::Spawner;

/// One encoded particle, laid out exactly as it appears in the vector.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleRecord {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl ParticleRecord {
    pub const WIDTH: usize = 4;
}

#[derive(Clone, Debug)]
pub struct ObservationEncoder {
    header: HeaderLayout,
    max_fruits: usize,
    lane: LaneConfig,
    type_scale: f32,
    radius_scale: f32,
    width: f32,
    height: f32,
}

impl ObservationEncoder {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `config` fails validation. The
    /// scales below divide by the fruit count, the radius bound and the
    /// screen extent.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            header: config.episode.header,
            max_fruits: config.episode.max_fruits,
            lane: config.lane,
            type_scale: config.fruits.len() as f32,
            radius_scale: config.episode.max_radius,
            width: config.screen.width,
            height: config.screen.height,
        })
    }

    /// Length of every vector this encoder produces.
    #[must_use]
    pub fn size(&self) -> usize {
        self.header.width() + ParticleRecord::WIDTH * self.max_fruits
    }

    #[must_use]
    pub fn encode(&self, spawner: &Spawner, particles: &[ParticleView]) -> Vec<f32> {
        let mut obs = Vec::with_capacity(self.size());
        self.write_header(&mut obs, spawner, particles);

        let records: Vec<ParticleRecord> = sorted_live(particles)
            .into_iter()
            .take(self.max_fruits)
            .map(|p| self.record(p))
            .collect();
        obs.extend_from_slice(bytemuck::cast_slice(&records));
        obs.resize(self.size(), 0.0);
        obs
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_header(&self, obs: &mut Vec<f32>, spawner: &Spawner, particles: &[ParticleView]) {
        let current = spawner.current();
        obs.push(current.kind as f32 / self.type_scale);
        obs.push(current.radius / self.radius_scale);
        if self.header == HeaderLayout::Extended {
            let next = spawner.next();
            obs.push(next.kind as f32 / self.type_scale);
            obs.push(next.radius / self.radius_scale);
        }
        obs.extend_from_slice(&[
            self.lane.left / self.width,
            self.lane.right / self.width,
            self.lane.bot / self.height,
            self.lane.kill_y / self.height,
        ]);
        if self.header == HeaderLayout::Extended {
            obs.push(highest_top_edge(particles).unwrap_or(self.lane.bot) / self.height);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record(&self, particle: &ParticleView) -> ParticleRecord {
        ParticleRecord {
            kind: particle.kind as f32 / self.type_scale,
            x: particle.position.x / self.width,
            y: particle.position.y / self.height,
            radius: particle.radius / self.radius_scale,
        }
    }
}

/// Live particles ordered by `(y, x)` ascending. Ties keep input order.
#[must_use]
pub fn sorted_live(particles: &[ParticleView]) -> Vec<&ParticleView> {
    let mut live: Vec<&ParticleView> = particles.iter().filter(|p| p.alive).collect();
    live.sort_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
    });
    live
}

/// Smallest `y - radius` over live particles.
fn highest_top_edge(particles: &[ParticleView]) -> Option<f32> {
    particles
        .iter()
        .filter(|p| p.alive)
        .map(|p| p.position.y - p.radius)
        .min_by(f32::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{ParticleId, Vec2};

    fn view(id: u64, x: f32, y: f32) -> ParticleView {
        ParticleView {
            id: ParticleId(id),
            kind: 1,
            position: Vec2::new(x, y),
            radius: 25.0,
            alive: true,
            has_collided: true,
        }
    }

    fn encoder_and_spawner(header: HeaderLayout) -> (ObservationEncoder, Spawner) {
        let mut config = GameConfig::default();
        config.episode.header = header;
        let spawner = Spawner::new(&config, fastrand::Rng::with_seed(0)).unwrap();
        (ObservationEncoder::new(&config).unwrap(), spawner)
    }

    #[test]
    fn header_widths() {
        let (compact, _) = encoder_and_spawner(HeaderLayout::Compact);
        let (extended, _) = encoder_and_spawner(HeaderLayout::Extended);
        assert_eq!(compact.size(), 6 + 200);
        assert_eq!(extended.size(), 9 + 200);
    }

    #[test]
    fn empty_board_reports_floor_as_top_edge() {
        let (encoder, spawner) = encoder_and_spawner(HeaderLayout::Extended);
        let obs = encoder.encode(&spawner, &[]);
        assert_eq!(obs[8], 700.0 / 720.0);
        assert!(obs[9..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn header_normalizes_lane() {
        let (encoder, spawner) = encoder_and_spawner(HeaderLayout::Compact);
        let obs = encoder.encode(&spawner, &[view(0, 500.0, 400.0)]);
        assert_eq!(obs[2], 415.0 / 1280.0);
        assert_eq!(obs[3], 863.0 / 1280.0);
        assert_eq!(obs[4], 700.0 / 720.0);
        assert_eq!(obs[5], 200.0 / 720.0);
        assert_eq!(&obs[6..10], &[1.0 / 11.0, 500.0 / 1280.0, 400.0 / 720.0, 25.0 / 150.0]);
    }

    #[test]
    fn dead_particles_are_skipped() {
        let (encoder, spawner) = encoder_and_spawner(HeaderLayout::Extended);
        let mut dead = view(0, 500.0, 100.0);
        dead.alive = false;
        let obs = encoder.encode(&spawner, &[dead, view(1, 600.0, 300.0)]);
        assert_eq!(obs[9 + 1], 600.0 / 1280.0);
        assert_eq!(obs[8], (300.0 - 25.0) / 720.0);
        assert!(obs[13..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn ties_on_y_break_by_x() {
        let particles = [view(0, 700.0, 300.0), view(1, 450.0, 300.0), view(2, 600.0, 200.0)];
        let order: Vec<u64> = sorted_live(&particles).iter().map(|p| p.id.0).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn encoder_rejects_config_that_would_divide_by_zero() {
        let mut config = GameConfig::default();
        config.fruits.clear();
        assert!(ObservationEncoder::new(&config).is_err());

        let mut config = GameConfig::default();
        config.episode.max_radius = 0.0;
        assert!(ObservationEncoder::new(&config).is_err());
    }
}
