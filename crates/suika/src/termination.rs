//! Game-over detection with hysteresis.
//!
//! A particle that has touched something and whose lower edge is above the
//! kill line is "over the line". The episode ends only once some particle
//! has been over the line for longer than the threshold without a break, so
//! bounces during merge cascades do not count.

use physics::ParticleView;

#[derive(Clone, Debug)]
pub struct TerminationMonitor {
    kill_y: f32,
    threshold: f32,
    timer: f32,
    terminal: bool,
}

impl TerminationMonitor {
    #[must_use]
    pub fn new(kill_y: f32, threshold: f32) -> Self {
        Self {
            kill_y,
            threshold,
            timer: 0.0,
            terminal: false,
        }
    }

    /// `y` grows downwards, so "above the line" means a smaller `y`.
    #[must_use]
    pub fn is_over_line(&self, particle: &ParticleView) -> bool {
        particle.alive
            && particle.has_collided
            && particle.position.y + particle.radius < self.kill_y
    }

    /// Feed one sub-step snapshot. Returns `true` once terminal.
    pub fn sample(&mut self, particles: &[ParticleView], dt: f32) -> bool {
        if particles.iter().any(|p| self.is_over_line(p)) {
            self.timer += dt;
            if self.timer > self.threshold {
                self.terminal = true;
            }
        } else {
            self.timer = 0.0;
        }
        self.terminal
    }

    /// Seconds of the current unbroken over-the-line run.
    #[must_use]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.terminal = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{ParticleId, Vec2};

    fn particle(y: f32, has_collided: bool) -> ParticleView {
        ParticleView {
            id: ParticleId(0),
            kind: 0,
            position: Vec2::new(100.0, y),
            radius: 10.0,
            alive: true,
            has_collided,
        }
    }

    #[test]
    fn fresh_piece_above_line_is_ignored() {
        let m = TerminationMonitor::new(200.0, 3.0);
        assert!(!m.is_over_line(&particle(50.0, false)));
        assert!(m.is_over_line(&particle(50.0, true)));
    }

    #[test]
    fn lower_edge_must_clear_the_line() {
        let m = TerminationMonitor::new(200.0, 3.0);
        // lower edge exactly on the line
        assert!(!m.is_over_line(&particle(190.0, true)));
        assert!(m.is_over_line(&particle(189.0, true)));
    }

    #[test]
    fn sustained_violation_terminates() {
        let mut m = TerminationMonitor::new(200.0, 1.0);
        let over = [particle(50.0, true)];
        let dt = 0.25;
        for _ in 0..4 {
            assert!(!m.sample(&over, dt), "timer at threshold is not terminal yet");
        }
        assert!(m.sample(&over, dt));
        assert!(m.is_terminal());
        m.reset();
        assert!(!m.is_terminal());
        assert_eq!(m.timer(), 0.0);
    }
}
