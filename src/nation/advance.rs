//! Per-tick nation update
//!
//! `advance` moves one nation forward one tick. Stages run in a fixed order
//! and each reads only values already computed earlier in the same tick:
//! intents -> GDP -> treasury -> labour & prices -> wellbeing -> population
//! -> government -> elections -> derived statistics.
//!
//! Every stored value is clamped to its valid range; drift is corrected,
//! never reported.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::calendar::MONTHS_PER_YEAR;
use crate::core::config::{EconomyConfig, PoliticsConfig, PopulationConfig, SimConfig};
use crate::core::types::{approach, clamp_percent, clamp_range, clamp_unit, Sector};
use crate::nation::government::{law_modifiers, GovernmentType, Law, LawModifiers};
use crate::nation::model::{Nation, Standing};
use crate::nation::politics::ElectionResult;

/// Intents targeting one nation, gathered for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NationIntents {
    pub tax_rate: Option<f64>,
    /// Applied in order; later entries for the same sector win
    pub budget: Vec<(Sector, f64)>,
    pub government: Option<GovernmentType>,
    pub laws: Vec<(Law, bool)>,
    /// Implicit intents carried over from last tick's diplomacy
    pub effects: Vec<NationEffect>,
}

impl NationIntents {
    pub fn is_empty(&self) -> bool {
        self.tax_rate.is_none()
            && self.budget.is_empty()
            && self.government.is_none()
            && self.laws.is_empty()
            && self.effects.is_empty()
    }
}

/// One-off economic side effect of a diplomatic action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NationEffect {
    GdpFactor(f64),
    TreasuryDelta(f64),
    HappinessDelta(f64),
    SectorShift { sector: Sector, delta: f64 },
}

/// What happened to a nation during `advance`, for the log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    pub government_change: Option<(GovernmentType, GovernmentType)>,
    pub election: Option<ElectionResult>,
}

/// Advance a nation by one tick
pub fn advance<R: Rng>(
    mut nation: Nation,
    intents: &NationIntents,
    standing: &Standing,
    config: &SimConfig,
    rng: &mut R,
) -> (Nation, AdvanceReport) {
    let mut report = AdvanceReport::default();

    apply_intents(&mut nation, intents, config, &mut report);

    let laws = law_modifiers(&nation.government.laws);
    update_gdp(&mut nation, standing, &laws, &config.economy);
    update_treasury(&mut nation, &config.economy);
    update_labour_and_prices(&mut nation, &config.economy);
    update_wellbeing(&mut nation, standing, &laws, &config.population);
    update_population_size(&mut nation, standing, &config.population, rng);
    update_government(&mut nation, &laws, &config.politics);
    report.election = run_election_cycle(&mut nation, &config.politics);
    refresh_derived(&mut nation, standing, config);

    (nation, report)
}

fn apply_intents(
    nation: &mut Nation,
    intents: &NationIntents,
    config: &SimConfig,
    report: &mut AdvanceReport,
) {
    let economy = &mut nation.economy;

    if let Some(rate) = intents.tax_rate {
        economy.tax_rate = clamp_unit(rate);
    }

    for &(sector, share) in &intents.budget {
        economy.budget.set(sector, share);
    }

    for effect in &intents.effects {
        match *effect {
            NationEffect::GdpFactor(factor) => {
                economy.gdp = clamp_range(
                    economy.gdp * factor,
                    config.economy.gdp_floor,
                    config.economy.gdp_ceiling,
                );
            }
            NationEffect::TreasuryDelta(delta) => {
                let limit = config.economy.treasury_limit;
                economy.treasury = clamp_range(economy.treasury + delta, -limit, limit);
            }
            NationEffect::HappinessDelta(delta) => {
                nation.population.happiness = clamp_percent(nation.population.happiness + delta);
            }
            NationEffect::SectorShift { sector, delta } => {
                let current = economy.budget.get(sector);
                economy.budget.set(sector, clamp_unit(current + delta));
            }
        }
    }

    economy.budget.normalize();

    let government = &mut nation.government;
    if let Some(kind) = intents.government {
        if kind != government.kind {
            report.government_change = Some((government.kind, kind));
            government.kind = kind;
            government.approval -= config.politics.government_change_penalty;
            nation.politics.election_countdown = kind.coefficients().election_cadence;
        }
    }

    for &(law, enacted) in &intents.laws {
        let changed = if enacted {
            government.laws.insert(law)
        } else {
            government.laws.remove(&law)
        };
        if changed {
            government.approval -= config.politics.law_change_penalty;
        }
    }

    government.approval = clamp_percent(government.approval);
}

fn update_gdp(nation: &mut Nation, standing: &Standing, laws: &LawModifiers, config: &EconomyConfig) {
    let growth_modifier = nation.government.coefficients().growth_modifier;
    let education = nation.population.education;
    let economy = &mut nation.economy;
    let previous = economy.gdp;

    let education_term = config.education_growth_weight * (education / 100.0 - 0.5);
    let infrastructure_term = config.infrastructure_growth_weight * economy.budget.infrastructure;
    let resource_term = config.resource_growth_weight * economy.mean_abundance();
    let inflation_drag = (economy.inflation - config.inflation_threshold).max(0.0) * config.inflation_penalty;
    let unemployment_drag = economy.unemployment * config.unemployment_penalty;
    let debt_drag = if economy.treasury < 0.0 && previous > 0.0 {
        (economy.debt() / previous * config.debt_penalty_weight).min(config.max_debt_penalty)
    } else {
        0.0
    };
    let diplomacy_term = config.trade_bonus * standing.trade_partners as f64
        - config.sanction_penalty * standing.sanctioned_by as f64;

    let mut growth = (config.base_gdp_growth
        + education_term
        + infrastructure_term
        + resource_term
        + diplomacy_term
        + laws.gdp_growth
        - inflation_drag
        - unemployment_drag
        - debt_drag)
        * growth_modifier;
    growth -= config.war_gdp_penalty * standing.wars as f64;

    economy.gdp = clamp_range(previous * (1.0 + growth), config.gdp_floor, config.gdp_ceiling);
    economy.gdp_growth = if previous > 0.0 {
        (economy.gdp - previous) / previous
    } else {
        0.0
    };
    economy.trade_balance = (growth - config.base_gdp_growth) * economy.gdp * 0.1;
}

fn update_treasury(nation: &mut Nation, config: &EconomyConfig) {
    let economy = &mut nation.economy;
    let revenue = economy.tax_revenue();
    let outlay = economy.budget_outlay(config.budget_gdp_ratio);

    let mut treasury = economy.treasury + (revenue - outlay) / MONTHS_PER_YEAR as f64;
    if treasury < 0.0 {
        treasury *= 1.0 + config.debt_interest;
    }

    economy.treasury = clamp_range(treasury, -config.treasury_limit, config.treasury_limit);
}

fn update_labour_and_prices(nation: &mut Nation, config: &EconomyConfig) {
    let economy = &mut nation.economy;
    let annual_growth = economy.gdp_growth * MONTHS_PER_YEAR as f64;
    let trend = config.base_gdp_growth * MONTHS_PER_YEAR as f64;
    let infrastructure = economy.budget.infrastructure;
    let military = economy.budget.military;

    let target_unemployment = clamp_range(
        config.natural_unemployment
            - config.okun_coefficient * (annual_growth - trend)
            - 0.05 * infrastructure
            - 0.03 * military,
        0.01,
        0.5,
    );
    economy.unemployment = clamp_unit(approach(
        economy.unemployment,
        target_unemployment,
        config.unemployment_adjust,
    ));

    let deficit_ratio = (config.budget_gdp_ratio * economy.budget.total() - economy.tax_rate).max(0.0);
    let target_inflation = config.base_inflation
        + 0.5 * (annual_growth - trend).max(0.0)
        + 0.1 * deficit_ratio
        + 0.02 * military;
    economy.inflation = clamp_range(
        approach(economy.inflation, target_inflation, config.inflation_adjust),
        -0.05,
        0.5,
    );
}

fn update_wellbeing(
    nation: &mut Nation,
    standing: &Standing,
    laws: &LawModifiers,
    config: &PopulationConfig,
) {
    let budget = nation.economy.budget;
    let tax_burden = (nation.economy.tax_rate - config.tax_burden_threshold).max(0.0) * config.tax_burden_weight;
    let corruption = nation.government.corruption;
    let population = &mut nation.population;

    let happiness_target = config.base_happiness
        + budget.healthcare * config.healthcare_happiness_weight
        + budget.welfare * config.welfare_happiness_weight
        - nation.economy.unemployment * config.unemployment_happiness_weight
        - corruption * config.corruption_happiness_weight
        - standing.wars as f64 * config.war_happiness_penalty
        - standing.sanctioned_by as f64 * config.sanction_happiness_penalty
        - tax_burden
        + laws.happiness;
    population.happiness = clamp_percent(approach(
        population.happiness,
        clamp_percent(happiness_target),
        config.happiness_adjust,
    ));

    let health_target = config.health_base
        + budget.healthcare * config.health_spending_weight
        + 0.2 * (population.happiness - 50.0)
        + laws.health_target;
    population.health = clamp_percent(approach(
        population.health,
        clamp_percent(health_target),
        config.health_adjust,
    ));

    let education_target =
        config.education_base + budget.education * config.education_spending_weight + laws.education_target;
    population.education = clamp_percent(approach(
        population.education,
        clamp_percent(education_target),
        config.education_adjust,
    ));
}

fn update_population_size<R: Rng>(
    nation: &mut Nation,
    standing: &Standing,
    config: &PopulationConfig,
    rng: &mut R,
) {
    let population = &mut nation.population;

    let noise = if config.growth_noise > 0.0 {
        rng.gen_range(-config.growth_noise..=config.growth_noise)
    } else {
        0.0
    };

    let growth = config.base_growth_rate
        + (population.health - 70.0) / 100.0 * 0.002
        + (population.happiness - 50.0) / 100.0 * 0.001
        + noise
        - config.war_growth_penalty * standing.wars as f64;
    let mut rate = clamp_range(growth, config.min_growth_rate, config.max_growth_rate);

    // Logistic slowdown: growth fades to zero at carrying capacity
    if rate > 0.0 {
        let room = 1.0 - population.size as f64 / config.max_population as f64;
        rate *= room.max(0.0);
    }
    population.growth_rate = rate;

    let next = population.size as f64 * (1.0 + rate);
    population.set_size(next, config.max_population);
}

fn update_government(nation: &mut Nation, laws: &LawModifiers, config: &PoliticsConfig) {
    let happiness = nation.population.happiness;
    let education = nation.population.education;
    let annual_growth_pct = nation.economy.gdp_growth * MONTHS_PER_YEAR as f64 * 100.0;
    let government = &mut nation.government;

    let approval_target =
        0.6 * happiness + 20.0 + annual_growth_pct.clamp(-10.0, 10.0) - 0.3 * government.corruption;
    government.approval = clamp_percent(approach(
        government.approval,
        clamp_percent(approval_target),
        config.approval_adjust,
    ));

    let coefficients = government.coefficients();
    let ceiling = coefficients.corruption_ceiling();
    let drift = config.corruption_drift * (1.0 - coefficients.corruption_resistance)
        + laws.corruption_drift
        - 0.02 * education / 100.0;

    government.corruption = if government.corruption > ceiling {
        approach(government.corruption, ceiling, 0.05)
    } else {
        (government.corruption + drift).min(ceiling)
    };
    government.corruption = clamp_percent(government.corruption);
}

fn run_election_cycle(nation: &mut Nation, config: &PoliticsConfig) -> Option<ElectionResult> {
    let approval = nation.government.approval;
    let politics = &mut nation.politics;

    politics.ticks_in_power += 1;
    politics.drift_popularity(approval, config);

    let remaining = politics.election_countdown?.saturating_sub(1);
    if remaining > 0 {
        politics.election_countdown = Some(remaining);
        return None;
    }

    let result = politics.hold_election(approval, &nation.economy, config);
    politics.election_countdown = nation.government.kind.coefficients().election_cadence;

    if result.as_ref().map_or(false, |r| r.changed) {
        nation.government.approval = clamp_percent(nation.government.approval + config.election_honeymoon);
    }
    result
}

/// Recompute stability and the cached status block.
///
/// Runs as the last stage of `advance` and again after events have been
/// applied, so the snapshot always reflects the final state of the tick.
pub fn refresh_derived(nation: &mut Nation, standing: &Standing, config: &SimConfig) {
    let politics_config = &config.politics;
    let laws = law_modifiers(&nation.government.laws);
    let coefficients = nation.government.coefficients();

    let ally_bonus =
        (standing.allies as f64 * politics_config.ally_stability_bonus).min(politics_config.max_ally_bonus);

    let stability = 0.4 * nation.population.happiness + 0.4 * nation.government.approval + 20.0
        - 0.3 * nation.government.corruption
        + coefficients.stability_bonus * 50.0
        - standing.wars as f64 * politics_config.war_stability_penalty
        + ally_bonus
        + laws.stability;

    nation.politics.stability = clamp_percent(stability);
    nation.status.standing = *standing;
    nation.status.coup_risk = nation.politics.stability < politics_config.coup_threshold;
    nation.status.economic_health = nation.economy.economic_health();
    nation.status.power = nation.power_score();
}
