//! Bounded, human-readable log of what happened in the world

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::types::{NationId, Tick};
use crate::events::template::EventCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Event(EventCategory),
    Diplomacy,
    Treaty,
    Election,
    Government,
    Rejection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: Tick,
    pub kind: LogKind,
    pub nations: Vec<NationId>,
    pub message: String,
}

/// FIFO ring: once full, the oldest entry is evicted for each new one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn record(&mut self, tick: Tick, kind: LogKind, nations: Vec<NationId>, message: impl Into<String>) {
        self.push(LogEntry {
            tick,
            kind,
            nations,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The `n` most recent entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn for_nation(&self, id: NationId) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.nations.contains(&id))
    }
}
