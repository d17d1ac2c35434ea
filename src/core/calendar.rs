//! Calendar system for month/year tracking
//!
//! The engine counts ticks; the calendar turns them into dates for logs and
//! election bookkeeping.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

pub const MONTHS_PER_YEAR: u64 = 12;

/// Calendar date derived from a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: u64,
    /// 1-based month
    pub month: u32,
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Y{} M{:02}", self.year, self.month)
    }
}

/// Calendar tracks simulation time with month granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    tick: Tick,
    start_year: u64,
}

impl Calendar {
    pub fn new(start_year: u64) -> Self {
        Self {
            tick: 0,
            start_year,
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn date_of(&self, tick: Tick) -> Date {
        Date {
            year: self.start_year + tick / MONTHS_PER_YEAR,
            month: (tick % MONTHS_PER_YEAR) as u32 + 1,
        }
    }

    pub fn current_date(&self) -> Date {
        self.date_of(self.tick)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(2000)
    }
}
