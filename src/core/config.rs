//! Simulation configuration with documented constants
//!
//! Every tuning coefficient of the nation, diplomacy, event and AI rules is
//! collected here. One tick is one month, so per-tick rates are small.
//! All sections default field-by-field, so a TOML file only needs to name
//! the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Top-level configuration owned by the world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub economy: EconomyConfig,
    pub population: PopulationConfig,
    pub politics: PoliticsConfig,
    pub diplomacy: DiplomacyConfig,
    pub events: EventConfig,
    pub ai: AiConfig,
}

/// World generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the single random source of the run
    pub seed: u64,
    /// Number of nations generated
    pub nation_count: usize,
    /// Whether the first generated nation is player-controlled
    pub player_nation: bool,
    /// Calendar year of tick 0
    pub start_year: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            nation_count: 8,
            player_nation: true,
            start_year: 2000,
        }
    }
}

/// Economy update coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Baseline GDP growth per tick (0.002/month is roughly 2.4%/year)
    pub base_gdp_growth: f64,
    /// Growth added per point of education above 50, scaled to [−0.5, 0.5]
    pub education_growth_weight: f64,
    /// Growth added per unit of infrastructure share
    pub infrastructure_growth_weight: f64,
    /// Growth added per unit of mean resource abundance
    pub resource_growth_weight: f64,
    /// Inflation above this level starts to hurt growth
    pub inflation_threshold: f64,
    /// Growth lost per unit of inflation above the threshold
    pub inflation_penalty: f64,
    /// Growth lost per unit of unemployment
    pub unemployment_penalty: f64,
    /// Growth lost per unit of debt/GDP ratio
    pub debt_penalty_weight: f64,
    /// Cap on the debt growth penalty
    pub max_debt_penalty: f64,
    /// Interest charged on negative treasury each tick
    pub debt_interest: f64,
    /// Growth added per active trade partner
    pub trade_bonus: f64,
    /// Growth lost per nation sanctioning this one
    pub sanction_penalty: f64,
    /// Growth lost per active war
    pub war_gdp_penalty: f64,
    /// GDP never falls below this value
    pub gdp_floor: f64,
    /// GDP never rises above this value (keeps unbounded runs finite)
    pub gdp_ceiling: f64,
    /// Annual government budget as a fraction of GDP
    pub budget_gdp_ratio: f64,
    /// Treasury magnitude limit in either direction
    pub treasury_limit: f64,
    /// Unemployment level at trend growth
    pub natural_unemployment: f64,
    /// Unemployment response to annualised growth deviation
    pub okun_coefficient: f64,
    /// Fraction of the gap to target unemployment closed per tick
    pub unemployment_adjust: f64,
    /// Inflation level at trend growth with a balanced budget
    pub base_inflation: f64,
    /// Fraction of the gap to target inflation closed per tick
    pub inflation_adjust: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_gdp_growth: 0.002,
            education_growth_weight: 0.002,
            infrastructure_growth_weight: 0.004,
            resource_growth_weight: 0.0005,
            inflation_threshold: 0.05,
            inflation_penalty: 0.05,
            unemployment_penalty: 0.01,
            debt_penalty_weight: 0.002,
            max_debt_penalty: 0.004,
            debt_interest: 0.003,
            trade_bonus: 0.001,
            sanction_penalty: 0.0015,
            war_gdp_penalty: 0.004,
            gdp_floor: 1.0,
            gdp_ceiling: 1.0e15,
            budget_gdp_ratio: 0.25,
            treasury_limit: 1.0e17,
            natural_unemployment: 0.05,
            okun_coefficient: 0.5,
            unemployment_adjust: 0.1,
            base_inflation: 0.02,
            inflation_adjust: 0.1,
        }
    }
}

/// Population update coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub base_happiness: f64,
    pub healthcare_happiness_weight: f64,
    pub welfare_happiness_weight: f64,
    pub unemployment_happiness_weight: f64,
    pub corruption_happiness_weight: f64,
    /// Happiness target lost per active war
    pub war_happiness_penalty: f64,
    /// Happiness target lost per nation sanctioning this one
    pub sanction_happiness_penalty: f64,
    /// Happiness target lost per unit of tax above the threshold
    pub tax_burden_weight: f64,
    pub tax_burden_threshold: f64,
    /// Fraction of the gap to target happiness closed per tick
    pub happiness_adjust: f64,
    pub health_base: f64,
    pub health_spending_weight: f64,
    pub health_adjust: f64,
    pub education_base: f64,
    pub education_spending_weight: f64,
    pub education_adjust: f64,
    /// Baseline population growth per tick
    pub base_growth_rate: f64,
    /// Half-width of the uniform noise added to growth each tick
    pub growth_noise: f64,
    pub min_growth_rate: f64,
    pub max_growth_rate: f64,
    pub war_growth_penalty: f64,
    /// Carrying capacity of a single nation; growth slows to zero here
    pub max_population: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            base_happiness: 50.0,
            healthcare_happiness_weight: 60.0,
            welfare_happiness_weight: 60.0,
            unemployment_happiness_weight: 150.0,
            corruption_happiness_weight: 0.3,
            war_happiness_penalty: 8.0,
            sanction_happiness_penalty: 2.0,
            tax_burden_weight: 40.0,
            tax_burden_threshold: 0.25,
            happiness_adjust: 0.2,
            health_base: 40.0,
            health_spending_weight: 150.0,
            health_adjust: 0.05,
            education_base: 30.0,
            education_spending_weight: 200.0,
            education_adjust: 0.02,
            base_growth_rate: 0.001,
            growth_noise: 0.0005,
            min_growth_rate: -0.01,
            max_growth_rate: 0.003,
            war_growth_penalty: 0.0005,
            max_population: 2_000_000_000,
        }
    }
}

/// Government, party and stability coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliticsConfig {
    /// Fraction of the gap to target approval closed per tick
    pub approval_adjust: f64,
    /// Corruption gained per tick before resistance is applied
    pub corruption_drift: f64,
    /// Approval lost when the government type changes
    pub government_change_penalty: f64,
    /// Approval lost when a law is enacted or repealed
    pub law_change_penalty: f64,
    /// Approval gained when a new party takes power
    pub election_honeymoon: f64,
    /// Ruling-party popularity change per approval point away from 50
    pub party_drift: f64,
    /// Popularity shift per unit of ideology fit at elections
    pub ideology_weight: f64,
    /// Stability below which a nation is at risk of a coup
    pub coup_threshold: f64,
    pub war_stability_penalty: f64,
    pub ally_stability_bonus: f64,
    pub max_ally_bonus: f64,
}

impl Default for PoliticsConfig {
    fn default() -> Self {
        Self {
            approval_adjust: 0.2,
            corruption_drift: 0.1,
            government_change_penalty: 15.0,
            law_change_penalty: 1.0,
            election_honeymoon: 5.0,
            party_drift: 0.0005,
            ideology_weight: 0.1,
            coup_threshold: 20.0,
            war_stability_penalty: 10.0,
            ally_stability_bonus: 2.0,
            max_ally_bonus: 6.0,
        }
    }
}

/// Diplomatic action deltas, preconditions and treaty dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiplomacyConfig {
    pub improve_delta: f64,
    pub trade_delta: f64,
    pub alliance_delta: f64,
    pub war_delta: f64,
    pub peace_delta: f64,
    pub sanction_delta: f64,
    /// Score change between a sanctioning actor and each ally of the target
    pub sanction_ally_penalty: f64,
    pub aid_delta: f64,
    /// Minimum score for a trade deal
    pub trade_min_score: f64,
    /// Minimum score for an alliance
    pub alliance_min_score: f64,
    /// Actor GDP must be at least this multiple of the target's to give aid
    pub aid_gdp_ratio: f64,
    /// Fraction of actor GDP transferred as aid
    pub aid_fraction: f64,
    /// Trade deal length in ticks (`None` = open-ended)
    pub trade_duration: Option<u32>,
    /// Alliance length in ticks (`None` = open-ended)
    pub alliance_duration: Option<u32>,
    /// Length of the truce following a peace treaty
    pub truce_duration: u32,
    pub sanction_duration: u32,
    /// Expiring treaties renew when the score is at least this
    pub renewal_score: f64,
    /// Per-tick drift of every score toward zero
    pub score_decay: f64,
    /// Per-tick positive drift per active trade deal or alliance
    pub treaty_drift: f64,
    pub alliance_break_score: f64,
    pub trade_break_score: f64,
    /// Military share added on war and removed on peace
    pub war_military_shift: f64,
    /// One-off GDP factor applied to a sanctioned target
    pub sanction_gdp_factor: f64,
    pub sanction_happiness_hit: f64,
    pub aid_happiness_boost: f64,
}

impl Default for DiplomacyConfig {
    fn default() -> Self {
        Self {
            improve_delta: 10.0,
            trade_delta: 5.0,
            alliance_delta: 10.0,
            war_delta: -30.0,
            peace_delta: 20.0,
            sanction_delta: -10.0,
            sanction_ally_penalty: -3.0,
            aid_delta: 15.0,
            trade_min_score: -20.0,
            alliance_min_score: 50.0,
            aid_gdp_ratio: 1.5,
            aid_fraction: 0.01,
            trade_duration: Some(120),
            alliance_duration: Some(240),
            truce_duration: 60,
            sanction_duration: 120,
            renewal_score: 60.0,
            score_decay: 0.05,
            treaty_drift: 0.05,
            alliance_break_score: -80.0,
            trade_break_score: -90.0,
            war_military_shift: 0.05,
            sanction_gdp_factor: 0.98,
            sanction_happiness_hit: 5.0,
            aid_happiness_boost: 2.0,
        }
    }
}

/// Event sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub enabled: bool,
    /// Entries kept in the FIFO log
    pub log_capacity: usize,
    /// Ticks before the same template may fire on the same nation again
    pub cooldown_ticks: u64,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    /// Multiplier applied to every template probability
    pub probability_scale: f64,
    /// How strongly instability raises event chances. Each point of
    /// stability below 50 adds `stability_scaling` percent to a template's
    /// probability; each point above takes the same away.
    pub stability_scaling: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_capacity: 50,
            cooldown_ticks: 100,
            min_magnitude: 0.5,
            max_magnitude: 1.5,
            probability_scale: 1.0,
            stability_scaling: 1.0,
        }
    }
}

/// AI heuristic thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub max_intents_per_tick: usize,
    /// Metrics at or above this level do not trigger budget changes
    pub comfort_threshold: f64,
    /// Share moved into the weakest sector per decision
    pub realloc_step: f64,
    /// Sectors are never drained below this share
    pub min_sector_share: f64,
    /// Chance per tick (before isolationism) of considering diplomacy
    pub diplomacy_rate: f64,
    /// Alliances are only proposed below this aggression
    pub alliance_aggression_max: f64,
    /// War is only declared at or above this aggression
    pub war_aggression_min: f64,
    /// War is only declared at or below this score
    pub war_score_max: f64,
    /// Own military power must exceed the target's by this ratio for war
    pub war_strength_ratio: f64,
    /// Sanctions are only imposed at or below this score
    pub sanction_score_max: f64,
    /// Happiness or stability below this makes a nation sue for peace
    pub peace_unrest_threshold: f64,
    pub tax_step: f64,
    pub min_tax: f64,
    pub max_tax: f64,
    /// Approval below this makes the AI cut taxes
    pub low_approval: f64,
    /// Chance per tick of a regime change under severe unrest
    pub government_change_chance: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_intents_per_tick: 3,
            comfort_threshold: 60.0,
            realloc_step: 0.02,
            min_sector_share: 0.02,
            diplomacy_rate: 0.1,
            alliance_aggression_max: 0.4,
            war_aggression_min: 0.7,
            war_score_max: -60.0,
            war_strength_ratio: 1.2,
            sanction_score_max: -40.0,
            peace_unrest_threshold: 35.0,
            tax_step: 0.01,
            min_tax: 0.05,
            max_tax: 0.5,
            low_approval: 40.0,
            government_change_chance: 0.01,
        }
    }
}

impl SimConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        let mut config = Self::default();
        config.world.seed = seed;
        config
    }

    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let unit_checks = [
            ("events.probability_scale", self.events.probability_scale),
            ("events.stability_scaling", self.events.stability_scaling),
            ("ai.diplomacy_rate", self.ai.diplomacy_rate),
            ("ai.government_change_chance", self.ai.government_change_chance),
            ("population.happiness_adjust", self.population.happiness_adjust),
            ("politics.approval_adjust", self.politics.approval_adjust),
        ];
        for (name, value) in unit_checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::Config(format!("{name} ({value}) must be within [0, 1]")));
            }
        }

        if self.world.nation_count == 0 {
            return Err(SimError::Config("world.nation_count must be positive".into()));
        }

        if self.events.log_capacity == 0 {
            return Err(SimError::Config("events.log_capacity must be positive".into()));
        }

        if self.events.min_magnitude > self.events.max_magnitude {
            return Err(SimError::Config(format!(
                "events.min_magnitude ({}) should be <= events.max_magnitude ({})",
                self.events.min_magnitude, self.events.max_magnitude
            )));
        }

        if self.population.min_growth_rate > self.population.max_growth_rate {
            return Err(SimError::Config(
                "population.min_growth_rate should be <= population.max_growth_rate".into(),
            ));
        }

        if self.population.max_population == 0 {
            return Err(SimError::Config("population.max_population must be positive".into()));
        }

        if self.economy.gdp_floor <= 0.0 || self.economy.gdp_floor >= self.economy.gdp_ceiling {
            return Err(SimError::Config(
                "economy.gdp_floor must be positive and below economy.gdp_ceiling".into(),
            ));
        }

        if self.diplomacy.trade_min_score > self.diplomacy.alliance_min_score {
            return Err(SimError::Config(format!(
                "diplomacy.trade_min_score ({}) should be <= diplomacy.alliance_min_score ({})",
                self.diplomacy.trade_min_score, self.diplomacy.alliance_min_score
            )));
        }

        if self.ai.min_tax > self.ai.max_tax {
            return Err(SimError::Config("ai.min_tax should be <= ai.max_tax".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [world]
            seed = 99
            nation_count = 4

            [events]
            log_capacity = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.nation_count, 4);
        assert_eq!(config.events.log_capacity, 10);
        assert_eq!(config.economy, EconomyConfig::default());
    }

    #[test]
    fn test_invalid_magnitudes_rejected() {
        let mut config = SimConfig::default();
        config.events.min_magnitude = 2.0;
        config.events.max_magnitude = 1.0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_population_ceiling_and_stability_scaling_checked() {
        let mut config = SimConfig::default();
        config.population.max_population = 0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        let mut config = SimConfig::default();
        config.events.stability_scaling = 1.5;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result = SimConfig::from_toml_str("[world]\nseed = \"abc\"");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }
}
