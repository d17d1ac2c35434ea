//! Nation - one country's economy, population, government and politics

use serde::{Deserialize, Serialize};

use crate::ai::traits::TraitVector;
use crate::core::types::{ColorTag, NationId};
use crate::nation::economy::Economy;
use crate::nation::government::{Government, GovernmentType};
use crate::nation::politics::{default_parties, Politics};
use crate::nation::population::Population;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    pub color: ColorTag,
    pub is_player: bool,
    /// Fixed at world generation; only read for AI-controlled nations
    pub traits: TraitVector,

    pub economy: Economy,
    pub population: Population,
    pub government: Government,
    pub politics: Politics,

    /// Recomputed every tick, never mutated independently
    pub status: NationStatus,
}

/// Diplomatic position of a nation, summarised from the relationship graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub wars: u32,
    pub allies: u32,
    pub trade_partners: u32,
    /// Number of nations currently sanctioning this one
    pub sanctioned_by: u32,
}

impl Standing {
    pub fn at_war(&self) -> bool {
        self.wars > 0
    }
}

/// Cached statistics derived from the rest of the record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NationStatus {
    pub standing: Standing,
    /// Stability is below the coup threshold
    pub coup_risk: bool,
    pub economic_health: f64,
    pub power: f64,
}

impl Nation {
    /// A nation with baseline sub-records and the default party line-up
    pub fn new(id: NationId, name: impl Into<String>, kind: GovernmentType, population: u64, gdp: f64) -> Self {
        Self {
            id,
            name: name.into(),
            color: ColorTag([128, 128, 128]),
            is_player: false,
            traits: TraitVector::default(),
            economy: Economy::new(gdp),
            population: Population::new(population),
            government: Government::new(kind),
            politics: Politics::new(default_parties(), kind.coefficients().election_cadence),
            status: NationStatus::default(),
        }
    }

    pub fn is_at_war(&self) -> bool {
        self.status.standing.at_war()
    }

    pub fn stability(&self) -> f64 {
        self.politics.stability
    }

    /// Overall national power used for diplomatic comparisons
    pub fn power_score(&self) -> f64 {
        let economic = self.economy.gdp / 1.0e6;
        let military = self.economy.military_power() / 1.0e6 * 4.0;
        (economic + military) * (0.5 + self.politics.stability / 200.0)
    }
}
