//! Fixed-step clock
//!
//! Converts variable frame times into a whole number of fixed simulation
//! steps. Leftover time carries into the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    pub step: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Feed one frame of real time, returns how many steps to simulate
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == self.max_substeps && self.accumulator >= self.step {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Unsimulated time as a fraction of a step (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_steps_and_carry() {
        let mut clock = FixedStep::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        // 0.3s fed, one step taken, 0.05s carried
        assert_eq!(clock.advance(0.1), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_substep_cap_drops_backlog() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(0.1), 4);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FixedStep::new(0.05, 100);
        assert_eq!(clock.advance(10.0), 2);
    }
}
