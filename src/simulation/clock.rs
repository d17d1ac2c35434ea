//! World clock: run state and speed
//!
//! The clock never steps the world itself. It converts elapsed real-time
//! units into a whole number of due ticks; fractions carry over.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Highest accepted speed multiplier
pub const MAX_SPEED: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ClockState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    state: ClockState,
    /// Ticks per real-time unit
    speed: f64,
    /// Fractional ticks carried between calls
    carry: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            state: ClockState::Stopped,
            speed: 1.0,
            carry: 0.0,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// stopped -> running; ignored in any other state
    pub fn start(&mut self) {
        if self.state == ClockState::Stopped {
            self.state = ClockState::Running;
        }
    }

    /// running -> paused
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// paused -> running
    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Back to stopped, dropping any carried fraction
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.carry = 0.0;
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 || multiplier > MAX_SPEED {
            return Err(SimError::Config(format!(
                "speed multiplier {} must be within (0, {}]",
                multiplier, MAX_SPEED
            )));
        }
        self.speed = multiplier;
        Ok(())
    }

    /// Whole ticks due after `units` of real time. Only a running clock
    /// accumulates time.
    pub fn due_ticks(&mut self, units: f64) -> u64 {
        if self.state != ClockState::Running || !units.is_finite() || units <= 0.0 {
            return 0;
        }
        self.carry += self.speed * units;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole as u64
    }
}
