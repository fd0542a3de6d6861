//! Rain ramp timer for the Sun level
//!
//! A fixed-interval accumulator advanced by the frame loop. It runs at most
//! once per play-through: Idle -> Running -> Stopped, never back.

use serde::{Deserialize, Serialize};

/// Cap on ramp steps per `advance` call (prevents a long frame from
/// replaying an unbounded backlog)
pub const MAX_STEPS_PER_ADVANCE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RampPhase {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RainRamp {
    phase: RampPhase,
    accumulator: f32,
}

impl RainRamp {
    pub fn phase(&self) -> RampPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RampPhase::Running
    }

    /// Start the ramp. Returns false if it is already running or has stopped.
    pub fn start(&mut self) -> bool {
        if self.phase != RampPhase::Idle {
            return false;
        }
        self.phase = RampPhase::Running;
        self.accumulator = 0.0;
        true
    }

    /// Accumulate `dt` seconds and return how many intervals have elapsed
    pub fn advance(&mut self, dt: f32, interval: f32) -> u32 {
        if self.phase != RampPhase::Running || interval <= 0.0 {
            return 0;
        }
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= interval && steps < MAX_STEPS_PER_ADVANCE {
            self.accumulator -= interval;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_ADVANCE {
            // Drop the backlog
            self.accumulator = self.accumulator.min(interval);
        }
        steps
    }

    /// Terminal transition. Returns true only the first time.
    pub fn stop(&mut self) -> bool {
        if self.phase != RampPhase::Running {
            return false;
        }
        self.phase = RampPhase::Stopped;
        self.accumulator = 0.0;
        true
    }
}
