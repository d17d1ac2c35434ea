//! Read-only, serializable copies of the world for presentation layers

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

use crate::core::calendar::Date;
use crate::core::types::{NationId, Tick};
use crate::diplomacy::relation::Relationship;
use crate::events::log::LogEntry;
use crate::nation::model::Nation;
use crate::simulation::clock::ClockState;
use crate::simulation::world::{World, WorldStatistics};

/// A copy of everything a front end displays. Taking one never mutates
/// the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub date: Date,
    pub clock: ClockState,
    pub speed: f64,
    pub nations: Vec<Nation>,
    pub relationships: Vec<Relationship>,
    /// Oldest first
    pub recent_log: Vec<LogEntry>,
    pub statistics: WorldStatistics,
}

impl Snapshot {
    pub fn capture(world: &World, clock: ClockState, speed: f64) -> Self {
        Self {
            tick: world.tick(),
            date: world.calendar.current_date(),
            clock,
            speed,
            nations: world.nations.clone(),
            relationships: world.graph.iter().cloned().collect(),
            recent_log: world.log.recent(world.log.capacity()),
            statistics: world.statistics(),
        }
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.iter().find(|n| n.id == id)
    }

    /// Nation ids ordered by power score, strongest first. Ties keep id order.
    pub fn power_ranking(&self) -> Vec<(NationId, f64)> {
        let mut ranking: Vec<(NationId, f64)> =
            self.nations.iter().map(|n| (n.id, n.status.power)).collect();
        ranking.sort_by_key(|&(id, power)| (Reverse(OrderedFloat(power)), id));
        ranking
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }
}
