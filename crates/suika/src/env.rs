//! The episode driver.
//!
//! [`SuikaEnv`] owns the physics world, the spawner and the per-episode
//! bookkeeping. One [`SuikaEnv::step`] drops a piece, runs the configured
//! number of physics sub-steps while watching the kill line, and returns the
//! next observation with a shaped reward.

use physics::{ParticleView, PhysicsSim, Segment, Vec2, World};
use serde::Serialize;

use crate::action::{Action, ActionMapper, ActionSpace};
use crate::config::GameConfig;
use crate::error::EnvError;
use crate::observation::ObservationEncoder;
use crate::render::{Frame, RenderSignal, Renderer};
use crate::reward::RewardShaper;
use crate::spawner::Spawner;
use crate::termination::TerminationMonitor;

/// Gym-style environment interface.
pub trait Env {
    /// Start a new episode and return its first observation.
    ///
    /// # Errors
    ///
    /// Returns an error if the world cannot be built.
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: &ResetOptions,
    ) -> Result<(Vec<f32>, Info), EnvError>;

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid action or when no episode is running.
    fn step(&mut self, action: Action) -> Result<Step, EnvError>;

    fn observation_size(&self) -> usize;

    fn action_space(&self) -> ActionSpace;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetOptions {
    /// Pre-populate the board with settled random pieces.
    pub scatter: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Info {
    pub score: f32,
    pub game_over: bool,
    pub steps: u64,
    pub live_fruits: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Ready,
    Terminal,
    Aborted,
}

struct Episode<W> {
    /// `None` once a renderer quit tore the world down.
    world: Option<W>,
    spawner: Spawner,
    score: f32,
    phase: Phase,
    steps: u64,
    live_fruits: usize,
    last_obs: Vec<f32>,
}

impl<W> Episode<W> {
    fn info(&self) -> Info {
        Info {
            score: self.score,
            game_over: self.phase == Phase::Terminal,
            steps: self.steps,
            live_fruits: self.live_fruits,
        }
    }

    /// Result of stepping a finished episode. Nothing changes.
    fn absorbing_step(&self) -> Step {
        Step {
            observation: self.last_obs.clone(),
            reward: 0.0,
            terminated: true,
            truncated: false,
            info: self.info(),
        }
    }
}

/// The merge-game environment, generic over the physics world.
pub struct SuikaEnv<W: World = PhysicsSim> {
    config: GameConfig,
    mapper: ActionMapper,
    encoder: ObservationEncoder,
    /// Shared by every episode and reset at the start of each.
    monitor: TerminationMonitor,
    shaper: RewardShaper,
    renderer: Option<Box<dyn Renderer>>,
    episode: Option<Episode<W>>,
}

impl SuikaEnv<PhysicsSim> {
    /// Build an environment backed by [`PhysicsSim`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] if the configuration is invalid or the
    /// action space is degenerate, and [`EnvError::Physics`] if the world
    /// cannot be built for the screen extent.
    pub fn new(config: GameConfig, action_space: ActionSpace) -> Result<Self, EnvError> {
        Self::create(config, action_space)
    }
}

impl<W: World> SuikaEnv<W> {
    /// Build an environment backed by any [`World`].
    ///
    /// # Errors
    ///
    /// As [`SuikaEnv::new`].
    pub fn create(config: GameConfig, action_space: ActionSpace) -> Result<Self, EnvError> {
        config.validate()?;
        let mapper = ActionMapper::new(action_space, &config.lane)?;
        let encoder = ObservationEncoder::new(&config)?;
        // Surface world parameter errors here rather than on the first reset.
        drop(W::create(config.world_params(), config.fruit_table())?);
        let monitor =
            TerminationMonitor::new(config.lane.kill_y, config.episode.game_over_seconds);
        let shaper = RewardShaper::new(&config.reward);
        Ok(Self {
            config,
            mapper,
            encoder,
            monitor,
            shaper,
            renderer: None,
            episode: None,
        })
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn observation_size(&self) -> usize {
        self.encoder.size()
    }

    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        self.mapper.space()
    }

    #[must_use]
    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    /// Spawner of the running episode.
    #[must_use]
    pub fn spawner(&self) -> Option<&Spawner> {
        self.episode.as_ref().map(|e| &e.spawner)
    }

    /// Live particles of the running episode, empty without a world.
    #[must_use]
    pub fn live_particles(&self) -> Vec<ParticleView> {
        self.episode
            .as_ref()
            .and_then(|e| e.world.as_ref())
            .map(World::live_particles)
            .unwrap_or_default()
    }

    /// Seconds the board has continuously been over the kill line.
    #[must_use]
    pub fn game_over_timer(&self) -> Option<f32> {
        self.episode.as_ref().map(|_| self.monitor.timer())
    }

    #[must_use]
    pub fn info(&self) -> Option<Info> {
        self.episode.as_ref().map(Episode::info)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.episode.as_ref().is_some_and(|e| e.phase != Phase::Ready)
    }

    /// Start a new episode.
    ///
    /// The same seed always yields the same piece sequence and scatter.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvError::Physics`] if the world rejects the container or
    /// a scattered piece.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        options: &ResetOptions,
    ) -> Result<(Vec<f32>, Info), EnvError> {
        let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        let spawner = Spawner::new(&self.config, fastrand::Rng::with_seed(rng.u64(..)))?;

        let mut world = W::create(self.config.world_params(), self.config.fruit_table())?;
        let lane = &self.config.lane;
        // Side walls reach the top of the screen so a tall pile cannot spill
        // over the rim.
        world.add_static_boundary(Segment::new(lane.wall_top_left(), lane.bot_left()))?;
        world.add_static_boundary(Segment::new(lane.bot_left(), lane.bot_right()))?;
        world.add_static_boundary(Segment::new(lane.bot_right(), lane.wall_top_right()))?;

        let scattered = if options.scatter {
            self.scatter(&mut world, &mut rng)?
        } else {
            0
        };
        tracing::debug!(?seed, scattered, "episode reset");

        let particles = world.live_particles();
        let observation = self.encoder.encode(&spawner, &particles);
        let mut episode = Episode {
            world: Some(world),
            spawner,
            score: 0.0,
            phase: Phase::Ready,
            steps: 0,
            live_fruits: particles.len(),
            last_obs: observation.clone(),
        };

        if let Some(renderer) = self.renderer.as_mut() {
            let frame = Frame {
                spawner: &episode.spawner,
                particles: &particles,
                lane,
                score: 0.0,
                game_over: false,
                frames_remaining: 0,
            };
            if renderer.draw(&frame) == RenderSignal::Quit {
                tracing::warn!("renderer quit during reset");
                episode.world = None;
                episode.phase = Phase::Aborted;
            }
        }

        self.monitor.reset();
        self.shaper.reset();
        let info = episode.info();
        self.episode = Some(episode);
        Ok((observation, info))
    }

    /// Drop one piece and simulate until it lands or the episode ends.
    ///
    /// Stepping a finished episode returns the last observation again with
    /// zero reward.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NeedsReset`] before the first reset or after
    /// [`SuikaEnv::close`], and [`EnvError::InvalidAction`] for an action
    /// outside the action space; neither changes the episode.
    pub fn step(&mut self, action: Action) -> Result<Step, EnvError> {
        let episode = self.episode.as_mut().ok_or(EnvError::NeedsReset)?;
        if episode.phase != Phase::Ready {
            return Ok(episode.absorbing_step());
        }
        let target_x = self.mapper.target_x(action)?;
        let world = episode.world.as_mut().ok_or(EnvError::NeedsReset)?;

        episode.spawner.set_current_x(target_x);
        episode.spawner.release(world)?;

        let score_before = episode.score;
        let dt = self.config.dt();
        let substeps = self.config.episode.substeps;

        for substep in 0..substeps {
            let remaining = substeps - substep - 1;
            if remaining == 0 {
                episode.spawner.advance();
            }
            episode.score += world.advance(dt).points;

            let particles = world.live_particles();
            if self.monitor.sample(&particles, dt) {
                break;
            }

            if let Some(renderer) = self.renderer.as_mut() {
                let frame = Frame {
                    spawner: &episode.spawner,
                    particles: &particles,
                    lane: &self.config.lane,
                    score: episode.score,
                    game_over: false,
                    frames_remaining: remaining,
                };
                if renderer.draw(&frame) == RenderSignal::Quit {
                    tracing::warn!(
                        score = episode.score,
                        steps = episode.steps,
                        "renderer quit, aborting episode"
                    );
                    episode.last_obs = self.encoder.encode(&episode.spawner, &particles);
                    episode.live_fruits = particles.len();
                    episode.steps += 1;
                    episode.world = None;
                    episode.phase = Phase::Aborted;
                    return Ok(episode.absorbing_step());
                }
            }
        }

        let terminal_now = self.monitor.is_terminal();
        let particles = world.live_particles();
        let observation = self.encoder.encode(&episode.spawner, &particles);
        let action_index = match action {
            Action::Discrete(index) => Some(index),
            Action::Continuous(_) => None,
        };
        let reward = self
            .shaper
            .shape(episode.score - score_before, action_index, terminal_now);

        episode.steps += 1;
        episode.live_fruits = particles.len();
        episode.last_obs.clone_from(&observation);
        if terminal_now {
            episode.phase = Phase::Terminal;
            tracing::info!(score = episode.score, steps = episode.steps, "game over");
        }

        Ok(Step {
            observation,
            reward,
            terminated: terminal_now,
            truncated: false,
            info: episode.info(),
        })
    }

    /// Observation of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NeedsReset`] when no episode is running.
    pub fn observe(&self) -> Result<Vec<f32>, EnvError> {
        self.episode
            .as_ref()
            .map(|e| e.last_obs.clone())
            .ok_or(EnvError::NeedsReset)
    }

    /// Drop the episode and its world.
    pub fn close(&mut self) {
        self.episode = None;
    }

    #[allow(clippy::cast_precision_loss)]
    fn scatter(&self, world: &mut W, rng: &mut fastrand::Rng) -> Result<usize, EnvError> {
        let scatter = &self.config.episode.scatter;
        let lane = &self.config.lane;
        let count = rng.usize(scatter.min_count..=scatter.max_count);

        for _ in 0..count {
            let kind = rng.usize(..=scatter.max_tier);
            let radius = self.config.radius_of(kind).unwrap_or(0.0);
            let x = uniform_within(rng, lane.left + radius, lane.right - radius);
            let y = uniform_within(rng, lane.kill_y + radius, lane.bot - radius);
            world.add_particle(Vec2::new(x, y), kind)?;
        }

        let dt = self.config.dt();
        for _ in 0..scatter.settle_substeps {
            // settling merges do not count towards the episode score
            let _ = world.advance(dt);
        }
        Ok(count)
    }
}

/// Uniform sample in `[lo, hi]`; the midpoint when the range is empty.
fn uniform_within(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        lo + rng.f32() * (hi - lo)
    } else {
        (lo + hi) * 0.5
    }
}

impl<W: World> Env for SuikaEnv<W> {
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: &ResetOptions,
    ) -> Result<(Vec<f32>, Info), EnvError> {
        Self::reset(self, seed, options)
    }

    fn step(&mut self, action: Action) -> Result<Step, EnvError> {
        Self::step(self, action)
    }

    fn observation_size(&self) -> usize {
        Self::observation_size(self)
    }

    fn action_space(&self) -> ActionSpace {
        Self::action_space(self)
    }
}

