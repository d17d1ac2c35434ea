//! World - the single container of all mutable simulation state

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::calendar::{Calendar, Date};
use crate::core::config::SimConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{NationId, Tick};
use crate::diplomacy::action::SideEffect;
use crate::diplomacy::graph::RelationshipGraph;
use crate::events::log::EventLog;
use crate::events::system::EventSystem;
use crate::nation::model::Nation;

/// All nations, the relationship graph, the log and the random source.
/// Passed explicitly to everything that reads or mutates the simulation.
pub struct World {
    /// Sorted by id
    pub nations: Vec<Nation>,
    pub graph: RelationshipGraph,
    pub calendar: Calendar,
    pub log: EventLog,
    pub events: EventSystem,
    pub config: SimConfig,
    /// Random number generator (deterministic)
    pub rng: ChaCha8Rng,
    /// One-off diplomatic consequences waiting for the next tick
    pub carried_effects: Vec<SideEffect>,
}

/// Aggregate figures for a status line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldStatistics {
    pub tick: Tick,
    pub date: Date,
    pub nation_count: usize,
    pub total_population: u64,
    pub total_gdp: f64,
    pub active_wars: usize,
    pub active_alliances: usize,
    pub trade_deals: usize,
    pub player_nation: Option<String>,
}

impl World {
    /// Assemble a world from pre-built nations. Every pair of nations gets a
    /// neutral relationship record.
    pub fn new(mut nations: Vec<Nation>, config: SimConfig) -> Self {
        nations.sort_by_key(|n| n.id);
        let ids: Vec<NationId> = nations.iter().map(|n| n.id).collect();

        Self {
            graph: RelationshipGraph::new(&ids),
            calendar: Calendar::new(config.world.start_year),
            log: EventLog::new(config.events.log_capacity),
            events: EventSystem::standard(),
            rng: ChaCha8Rng::seed_from_u64(config.world.seed),
            carried_effects: Vec::new(),
            nations,
            config,
        }
    }

    pub fn tick(&self) -> Tick {
        self.calendar.current_tick()
    }

    pub fn index_of(&self, id: NationId) -> Option<usize> {
        self.nations.binary_search_by_key(&id, |n| n.id).ok()
    }

    pub fn nation(&self, id: NationId) -> Result<&Nation> {
        self.index_of(id)
            .map(|i| &self.nations[i])
            .ok_or(SimError::UnknownNation(id))
    }

    pub fn nation_mut(&mut self, id: NationId) -> Result<&mut Nation> {
        let i = self.index_of(id).ok_or(SimError::UnknownNation(id))?;
        Ok(&mut self.nations[i])
    }

    pub fn player(&self) -> Option<&Nation> {
        self.nations.iter().find(|n| n.is_player)
    }

    pub fn statistics(&self) -> WorldStatistics {
        WorldStatistics {
            tick: self.tick(),
            date: self.calendar.current_date(),
            nation_count: self.nations.len(),
            total_population: self
                .nations
                .iter()
                .fold(0u64, |total, n| total.saturating_add(n.population.size)),
            total_gdp: self.nations.iter().map(|n| n.economy.gdp).sum(),
            active_wars: self.graph.active_wars(),
            active_alliances: self.graph.active_alliances(),
            trade_deals: self.graph.active_trade_deals(),
            player_nation: self.player().map(|n| n.name.clone()),
        }
    }
}
