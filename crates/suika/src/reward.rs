//! Shaped per-step reward.

use crate::config::RewardConfig;

#[derive(Clone, Debug)]
pub struct RewardShaper {
    survival_bonus: f32,
    repeat_limit: u32,
    repeat_penalty: f32,
    terminal_penalty: f32,
    last_action: Option<usize>,
    repeat_count: u32,
}

impl RewardShaper {
    #[must_use]
    pub fn new(config: &RewardConfig) -> Self {
        Self {
            survival_bonus: config.survival_bonus,
            repeat_limit: config.repeat_limit,
            repeat_penalty: config.repeat_penalty,
            terminal_penalty: config.terminal_penalty,
            last_action: None,
            repeat_count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.last_action = None;
        self.repeat_count = 0;
    }

    /// Length of the current run of identical discrete actions.
    #[must_use]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// `action` is the discrete index for discrete spaces and `None` for
    /// continuous ones, which never accrue a repeat penalty.
    pub fn shape(&mut self, score_delta: f32, action: Option<usize>, terminal_now: bool) -> f32 {
        let mut reward = score_delta + self.survival_bonus;

        if let Some(index) = action {
            if self.last_action == Some(index) {
                self.repeat_count += 1;
            } else {
                self.last_action = Some(index);
                self.repeat_count = 1;
            }
            if self.repeat_count > self.repeat_limit {
                reward -= self.repeat_penalty;
            }
        }

        if terminal_now {
            reward -= self.terminal_penalty;
        }
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaper() -> RewardShaper {
        RewardShaper::new(&RewardConfig::default())
    }

    #[test]
    fn survival_bonus_is_added() {
        let mut s = shaper();
        assert!((s.shape(3.0, Some(0), false) - 3.1).abs() < 1e-6);
    }

    #[test]
    fn third_repeat_is_penalized() {
        let mut s = shaper();
        let rewards: Vec<f32> = (0..4).map(|_| s.shape(0.0, Some(7), false)).collect();
        assert!((rewards[0] - 0.1).abs() < 1e-6);
        assert!((rewards[1] - 0.1).abs() < 1e-6);
        assert!((rewards[2] + 0.9).abs() < 1e-6);
        assert!((rewards[3] + 0.9).abs() < 1e-6);
        assert_eq!(s.repeat_count(), 4);
    }

    #[test]
    fn changing_action_restarts_run() {
        let mut s = shaper();
        s.shape(0.0, Some(1), false);
        s.shape(0.0, Some(1), false);
        s.shape(0.0, Some(2), false);
        assert_eq!(s.repeat_count(), 1);
        assert!((s.shape(0.0, Some(2), false) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn continuous_actions_never_repeat() {
        let mut s = shaper();
        for _ in 0..5 {
            assert!((s.shape(0.0, None, false) - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn terminal_penalty() {
        let mut s = shaper();
        assert!((s.shape(2.0, None, true) - (2.1 - 10.0)).abs() < 1e-6);
    }
}
