//! Fixed-timestep clock
//!
//! Converts variable frame times into a whole number of `SIM_DT` ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame fed into the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many ticks to run now.
    /// Time the sim cannot catch up on is dropped so a slow machine does
    /// not build an ever-growing backlog.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        self.accumulator = self.accumulator.min(SIM_DT * MAX_SUBSTEPS as f32);
        steps
    }

    /// Leftover time not yet consumed by a tick
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame_runs_one_tick() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(SIM_DT), 1);
        assert!(step.pending() < 1e-6);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(SIM_DT * 0.6), 0);
        assert_eq!(step.advance(SIM_DT * 0.6), 1);
    }

    #[test]
    fn test_slow_frames_keep_backlog_bounded() {
        let mut step = FixedStep::new();
        let cap = SIM_DT * MAX_SUBSTEPS as f32;
        for _ in 0..1000 {
            assert_eq!(step.advance(0.1), MAX_SUBSTEPS);
            assert!(step.pending() <= cap);
        }
    }

    #[test]
    fn test_negative_or_huge_frames_are_clamped() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(-1.0), 0);
        assert_eq!(step.pending(), 0.0);
        assert_eq!(step.advance(30.0), MAX_SUBSTEPS);
        assert!(step.pending() <= SIM_DT * MAX_SUBSTEPS as f32);
    }
}
