//! Fixed-timestep scheduler for the mini-game loops. Frames arrive at
//! whatever rate the host renders; simulation advances in whole fixed
//! steps so physics stays rate-independent.

use std::time::Duration;

/// Accumulator over elapsed frame time, paying out whole simulation steps.
///
/// A long stall (debugger pause, background tab) would otherwise queue up
/// thousands of catch-up steps, so the accumulator is clamped to a few
/// steps' worth and the rest of the backlog is dropped.
#[derive(Debug, Clone)]
pub struct FixedTick {
    step: Duration,
    accumulated: Duration,
    max_steps_per_frame: u32,
}

impl FixedTick {
    /// Scheduler paying out one step per `step` of elapsed time.
    /// At most 4 steps are run per frame.
    pub fn new(step: Duration) -> Self {
        Self::with_max_steps(step, 4)
    }

    pub fn with_max_steps(step: Duration, max_steps_per_frame: u32) -> Self {
        Self {
            step,
            accumulated: Duration::ZERO,
            max_steps_per_frame,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Feed one frame's elapsed time, returning how many fixed steps to run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut steps = 0;
        while self.accumulated >= self.step && steps < self.max_steps_per_frame {
            self.accumulated -= self.step;
            steps += 1;
        }
        if self.accumulated >= self.step {
            log::debug!("dropping {:?} of simulation backlog", self.accumulated);
            self.accumulated = Duration::ZERO;
        }
        steps
    }

    /// Fraction of the next step already elapsed, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulated.as_secs_f32() / self.step.as_secs_f32()
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
