//! Event templates: eligibility conditions and a closed set of effects
//!
//! Templates are plain data so a catalog can be loaded from TOML. Effects
//! are interpreted by the event system, never executed as code.

use serde::{Deserialize, Serialize};

use crate::core::types::{NationId, ResourceKind, Tick};
use crate::nation::government::GovernmentType;
use crate::nation::model::Nation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Economic,
    Political,
    Social,
    Natural,
}

/// Eligibility predicate over a nation's state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    #[default]
    Always,
    StabilityBelow { value: f64 },
    StabilityAbove { value: f64 },
    HappinessBelow { value: f64 },
    HappinessAbove { value: f64 },
    /// Protest risk (0-1) strictly above `value`
    ProtestRiskAbove { value: f64 },
    CorruptionAbove { value: f64 },
    EducationAtLeast { value: f64 },
    InDebt,
    AtWar,
    AtPeace,
    GovernmentIs { government: GovernmentType },

    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn holds(&self, nation: &Nation) -> bool {
        match self {
            Condition::Always => true,
            Condition::StabilityBelow { value } => nation.stability() < *value,
            Condition::StabilityAbove { value } => nation.stability() > *value,
            Condition::HappinessBelow { value } => nation.population.happiness < *value,
            Condition::HappinessAbove { value } => nation.population.happiness > *value,
            Condition::ProtestRiskAbove { value } => nation.population.protest_risk() > *value,
            Condition::CorruptionAbove { value } => nation.government.corruption > *value,
            Condition::EducationAtLeast { value } => nation.population.education >= *value,
            Condition::InDebt => nation.economy.treasury < 0.0,
            Condition::AtWar => nation.is_at_war(),
            Condition::AtPeace => !nation.is_at_war(),
            Condition::GovernmentIs { government } => nation.government.kind == *government,
            Condition::All { conditions } => conditions.iter().all(|c| c.holds(nation)),
            Condition::Any { conditions } => conditions.iter().any(|c| c.holds(nation)),
            Condition::Not { condition } => !condition.holds(nation),
        }
    }
}

/// Numeric field an effect can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NationField {
    Gdp,
    Treasury,
    Inflation,
    Unemployment,
    Population,
    Happiness,
    Health,
    Education,
    Approval,
    Corruption,
    /// Popularity share (0-1) of the ruling party; other parties absorb
    /// the difference
    RulingSupport,
    Resource(ResourceKind),
}

/// Non-numeric state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOverride {
    SetGovernment(GovernmentType),
    /// End the war with the most hostile enemy; the stronger side gains
    EndWar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// `field += amount * magnitude`
    Additive { field: NationField, amount: f64 },
    /// `field *= 1 + (factor - 1) * magnitude`
    Multiplicative { field: NationField, factor: f64 },
    Override { status: StatusOverride },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    /// Unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    pub category: EventCategory,
    /// Chance per tick for each eligible nation
    pub probability: f64,
    #[serde(default)]
    pub condition: Condition,
    pub effects: Vec<Effect>,
}

/// A fired event. Applied once, then kept only as a log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventInstance {
    pub template_id: String,
    pub name: String,
    pub category: EventCategory,
    pub nation: NationId,
    pub tick: Tick,
    pub magnitude: f64,
}
