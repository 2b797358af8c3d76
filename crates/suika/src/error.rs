use physics::PhysicsError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("environment must be reset before use")]
    NeedsReset,
    #[error("physics failure: {0}")]
    Physics(#[from] PhysicsError),
}
