//! Immutable game configuration.
//!
//! Loaded once from JSON (or taken from [`GameConfig::default`]), validated,
//! and handed by reference to the components that need it. Every section and
//! field has a serde default so a file only needs to list what it overrides.

use std::path::Path;

use physics::{Fruit, FruitTable, Material, Vec2, WorldParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
    #[error("discrete action space needs at least 2 bins, got {0}")]
    DegenerateBins(usize),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
    pub fps: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            fps: 60.0,
        }
    }
}

/// Drop lane and container geometry. Screen coordinates: `y` grows downwards,
/// so `kill_y < bot` and the spawner sits at `spawn_y` above the kill line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bot: f32,
    pub kill_y: f32,
    pub spawn_y: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            left: 415.0,
            right: 863.0,
            top: 150.0,
            bot: 700.0,
            kill_y: 200.0,
            spawn_y: 100.0,
        }
    }
}

impl LaneConfig {
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height the side walls reach: the screen top, or `top` if that is
    /// higher still.
    #[must_use]
    pub fn wall_top(&self) -> f32 {
        self.top.min(0.0)
    }

    #[must_use]
    pub fn wall_top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.wall_top())
    }

    #[must_use]
    pub fn bot_left(&self) -> Vec2 {
        Vec2::new(self.left, self.bot)
    }

    #[must_use]
    pub fn wall_top_right(&self) -> Vec2 {
        Vec2::new(self.right, self.wall_top())
    }

    #[must_use]
    pub fn bot_right(&self) -> Vec2 {
        Vec2::new(self.right, self.bot)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s².
    pub gravity: f32,
    pub damping: f32,
    pub bias: f32,
    pub restitution: f32,
    pub friction: f32,
    pub iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let params = WorldParams::default();
        Self {
            gravity: params.gravity.y,
            damping: params.damping,
            bias: params.bias,
            restitution: params.material.restitution,
            friction: params.material.friction,
            iterations: params.iterations,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FruitSpec {
    pub name: String,
    pub radius: f32,
    pub points: f32,
}

fn default_fruits() -> Vec<FruitSpec> {
    const TABLE: [(&str, f32, f32); 11] = [
        ("cherry", 17.0, 1.0),
        ("strawberry", 25.0, 3.0),
        ("grapes", 32.0, 6.0),
        ("orange", 38.0, 10.0),
        ("persimmon", 50.0, 15.0),
        ("apple", 63.0, 21.0),
        ("pear", 75.0, 28.0),
        ("peach", 87.0, 36.0),
        ("pineapple", 100.0, 45.0),
        ("melon", 115.0, 55.0),
        ("watermelon", 135.0, 66.0),
    ];
    TABLE
        .iter()
        .map(|&(name, radius, points)| FruitSpec {
            name: name.to_owned(),
            radius,
            points,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Pieces are drawn uniformly from tiers `0..tiers`.
    pub tiers: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self { tiers: 5 }
    }
}

/// Observation header variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    /// Current piece, four boundaries.
    Compact,
    /// Current and next piece, four boundaries, highest particle top edge.
    Extended,
}

impl HeaderLayout {
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Compact => 6,
            Self::Extended => 9,
        }
    }
}

/// Randomized initial board used when a reset asks for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub min_count: usize,
    pub max_count: usize,
    /// Highest tier (inclusive) a scattered piece may have.
    pub max_tier: usize,
    /// Physics sub-steps run after scattering so the pile settles.
    pub settle_substeps: u32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            min_count: 5,
            max_count: 15,
            max_tier: 3,
            settle_substeps: 120,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Physics increments simulated per environment step.
    pub substeps: u32,
    /// Seconds a settled particle may stay above the kill line.
    pub game_over_seconds: f32,
    pub max_fruits: usize,
    /// Radius normalizer for observations.
    pub max_radius: f32,
    pub header: HeaderLayout,
    pub scatter: ScatterConfig,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            substeps: 120,
            game_over_seconds: 3.0,
            max_fruits: 50,
            max_radius: 150.0,
            header: HeaderLayout::Extended,
            scatter: ScatterConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Added to every live step.
    pub survival_bonus: f32,
    /// Consecutive picks of one discrete action allowed before penalizing.
    pub repeat_limit: u32,
    pub repeat_penalty: f32,
    pub terminal_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            survival_bonus: 0.1,
            repeat_limit: 2,
            repeat_penalty: 1.0,
            terminal_penalty: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub lane: LaneConfig,
    pub physics: PhysicsConfig,
    pub fruits: Vec<FruitSpec>,
    pub spawner: SpawnerConfig,
    pub episode: EpisodeConfig,
    pub reward: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            lane: LaneConfig::default(),
            physics: PhysicsConfig::default(),
            fruits: default_fruits(),
            spawner: SpawnerConfig::default(),
            episode: EpisodeConfig::default(),
            reward: RewardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`GameConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Simulation increment in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / self.screen.fps
    }

    #[must_use]
    pub fn fruit_table(&self) -> FruitTable {
        FruitTable::new(
            self.fruits
                .iter()
                .map(|f| Fruit {
                    radius: f.radius,
                    points: f.points,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            gravity: Vec2::new(0.0, self.physics.gravity),
            damping: self.physics.damping,
            bias: self.physics.bias,
            material: Material {
                restitution: self.physics.restitution,
                friction: self.physics.friction,
            },
            iterations: self.physics.iterations,
            extent: Vec2::new(self.screen.width, self.screen.height),
        }
    }

    #[must_use]
    pub fn radius_of(&self, kind: usize) -> Option<f32> {
        self.fruits.get(kind).map(|f| f.radius)
    }

    /// Check every invariant the environment relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let screen = &self.screen;
        let finite_extent = screen.width.is_finite() && screen.height.is_finite();
        if !(screen.width > 0.0 && screen.height > 0.0 && finite_extent) {
            return Err(ConfigError::invalid(
                "screen",
                "width and height must be positive and finite",
            ));
        }
        if !(screen.fps > 0.0 && screen.fps.is_finite()) {
            return Err(ConfigError::invalid("screen.fps", "must be positive"));
        }

        let lane = &self.lane;
        let finite = [lane.left, lane.right, lane.top, lane.bot, lane.kill_y, lane.spawn_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::invalid("lane", "coordinates must be finite"));
        }
        if lane.left >= lane.right {
            return Err(ConfigError::invalid("lane", "left must be less than right"));
        }
        if lane.top >= lane.bot {
            return Err(ConfigError::invalid("lane", "top must be above bot"));
        }
        if lane.kill_y >= lane.bot {
            return Err(ConfigError::invalid("lane.kill_y", "must be above the floor"));
        }

        if self.fruits.is_empty() {
            return Err(ConfigError::invalid("fruits", "table is empty"));
        }
        if let Some(f) = self.fruits.iter().find(|f| !(f.radius > 0.0 && f.radius.is_finite())) {
            return Err(ConfigError::invalid("fruits", format!("{} has a non-positive radius", f.name)));
        }

        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(ConfigError::invalid("physics.gravity", "must be finite"));
        }
        if !(physics.damping > 0.0 && physics.damping <= 1.0) {
            return Err(ConfigError::invalid("physics.damping", "must be in (0, 1]"));
        }
        if !(physics.bias > 0.0 && physics.bias < 1.0) {
            return Err(ConfigError::invalid("physics.bias", "must be in (0, 1)"));
        }
        if physics.iterations == 0 {
            return Err(ConfigError::invalid("physics.iterations", "must be positive"));
        }

        if self.spawner.tiers == 0 || self.spawner.tiers > self.fruits.len() {
            return Err(ConfigError::invalid(
                "spawner.tiers",
                format!("must be in 1..={}", self.fruits.len()),
            ));
        }

        let episode = &self.episode;
        if episode.substeps == 0 {
            return Err(ConfigError::invalid("episode.substeps", "must be positive"));
        }
        if !(episode.game_over_seconds >= 0.0) {
            return Err(ConfigError::invalid("episode.game_over_seconds", "must be non-negative"));
        }
        if !(episode.max_radius > 0.0) {
            return Err(ConfigError::invalid("episode.max_radius", "must be positive"));
        }
        let scatter = &episode.scatter;
        if scatter.min_count > scatter.max_count {
            return Err(ConfigError::invalid("episode.scatter", "min_count exceeds max_count"));
        }
        if scatter.max_tier >= self.fruits.len() {
            return Err(ConfigError::invalid("episode.scatter.max_tier", "outside the fruit table"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.fruits.len(), 11);
        assert_eq!(config.episode.header.width(), 9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "lane": { "left": 100, "right": 300 }, "episode": { "header": "compact" } }"#,
        )
        .unwrap();
        assert_eq!(config.lane.left, 100.0);
        assert_eq!(config.lane.bot, LaneConfig::default().bot);
        assert_eq!(config.episode.header, HeaderLayout::Compact);
        assert_eq!(config.episode.substeps, 120);
    }

    #[test]
    fn inverted_lane_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "lane": { "left": 900, "right": 300 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "lane", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ lane: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn spawner_tiers_must_fit_fruit_table() {
        let mut config = GameConfig::default();
        config.spawner.tiers = 12;
        assert!(config.validate().is_err());
    }

    #[test]
    fn infinite_screen_is_rejected() {
        let mut config = GameConfig::default();
        config.screen.width = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "screen", .. })
        ));
    }
}
