//! Agent actions and the mapping from an action to a drop coordinate.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, LaneConfig};
use crate::error::EnvError;

/// A single agent decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Bin index in `[0, bins)`.
    Discrete(usize),
    /// Scalar in `[-1, 1]`; values outside are clamped.
    Continuous(f32),
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Self::Discrete(index)
    }
}

impl From<f32> for Action {
    fn from(value: f32) -> Self {
        Self::Continuous(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpace {
    Discrete { bins: usize },
    Continuous,
}

impl ActionSpace {
    /// Draw a uniformly random action from the space.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Action {
        match *self {
            Self::Discrete { bins } => Action::Discrete(rng.usize(..bins)),
            Self::Continuous => Action::Continuous(rng.f32() * 2.0 - 1.0),
        }
    }

    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        match (*self, action) {
            (Self::Discrete { bins }, Action::Discrete(index)) => index < bins,
            (Self::Continuous, Action::Continuous(value)) => !value.is_nan(),
            _ => false,
        }
    }
}

/// Turns an [`Action`] into a horizontal pixel coordinate inside the lane.
#[derive(Clone, Copy, Debug)]
pub struct ActionMapper {
    space: ActionSpace,
    left: f32,
    right: f32,
}

impl ActionMapper {
    /// # Errors
    ///
    /// Returns [`ConfigError::DegenerateBins`] for a discrete space with fewer
    /// than two bins, where the linear map is undefined.
    pub fn new(space: ActionSpace, lane: &LaneConfig) -> Result<Self, ConfigError> {
        if let ActionSpace::Discrete { bins } = space {
            if bins < 2 {
                return Err(ConfigError::DegenerateBins(bins));
            }
        }
        Ok(Self {
            space,
            left: lane.left,
            right: lane.right,
        })
    }

    #[must_use]
    pub fn space(&self) -> ActionSpace {
        self.space
    }

    /// Normalized action value in `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidAction`] when the action does not belong to
    /// this mapper's space.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, action: Action) -> Result<f32, EnvError> {
        match (self.space, action) {
            (ActionSpace::Discrete { bins }, Action::Discrete(index)) if index < bins => {
                Ok(-1.0 + 2.0 * index as f32 / (bins - 1) as f32)
            }
            (ActionSpace::Discrete { bins }, Action::Discrete(index)) => Err(
                EnvError::InvalidAction(format!("index {index} outside 0..{bins}")),
            ),
            (ActionSpace::Continuous, Action::Continuous(value)) if !value.is_nan() => {
                Ok(value.clamp(-1.0, 1.0))
            }
            (ActionSpace::Continuous, Action::Continuous(_)) => {
                Err(EnvError::InvalidAction("continuous action is NaN".to_owned()))
            }
            (space, action) => Err(EnvError::InvalidAction(format!(
                "{action:?} does not fit {space:?}"
            ))),
        }
    }

    /// Drop coordinate for `action`, truncated to a whole pixel.
    ///
    /// # Errors
    ///
    /// As [`ActionMapper::value`].
    pub fn target_x(&self, action: Action) -> Result<f32, EnvError> {
        let value = self.value(action)?;
        Ok((self.left + (value + 1.0) * 0.5 * (self.right - self.left)).trunc())
    }

    /// Continuous action that drops at pointer coordinate `x`.
    #[must_use]
    pub fn action_for_x(&self, x: f32) -> Action {
        let clamped = x.clamp(self.left, self.right);
        Action::Continuous((clamped - self.left) / (self.right - self.left) * 2.0 - 1.0)
    }
}
