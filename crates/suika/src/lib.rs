#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Suika Environment
//!
//! A reinforcement learning environment around the fruit-merging game.
//!
//! Each [`SuikaEnv::step`] takes one drop position, releases the pending piece
//! over the container, simulates a fixed number of physics sub-steps and
//! returns a normalized observation, a shaped reward and whether the pile has
//! stayed above the kill line for too long.
//!
//! ## Key Components
//!
//! -   **[`ActionMapper`]:** discrete bin or continuous scalar to a drop column.
//! -   **[`Spawner`]:** the current and next piece.
//! -   **[`TerminationMonitor`]:** kill-line timer with hysteresis.
//! -   **[`ObservationEncoder`]:** fixed-length `Vec<f32>` observations.
//! -   **[`RewardShaper`]:** score gain plus survival and repeat shaping.
//! -   **[`Renderer`]:** optional read-only observer that may request a quit.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use suika::{Action, ActionSpace, GameConfig, ResetOptions, SuikaEnv};
//!
//! let mut env = SuikaEnv::new(GameConfig::default(), ActionSpace::Discrete { bins: 15 })?;
//! let (obs, _info) = env.reset(Some(7), &ResetOptions::default())?;
//! assert_eq!(obs.len(), env.observation_size());
//!
//! let step = env.step(Action::Discrete(7))?;
//! println!("reward {} score {}", step.reward, step.info.score);
//! # Ok::<(), suika::EnvError>(())
//! ```

pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod render;
pub mod reward;
pub mod spawner;
pub mod termination;

pub use action::{Action, ActionMapper, ActionSpace};
pub use config::{ConfigError, GameConfig, HeaderLayout, LaneConfig};
pub use env::{Env, Info, ResetOptions, Step, SuikaEnv};
pub use error::EnvError;
pub use observation::{ObservationEncoder, ParticleRecord};
pub use render::{ascii_board, Frame, RenderSignal, Renderer};
pub use reward::RewardShaper;
pub use spawner::{PendingPiece, Spawner};
pub use termination::TerminationMonitor;
