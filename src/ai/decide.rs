//! AI decision engine
//!
//! A handful of trait-weighted heuristics evaluated against a read-only
//! view of the world. Output is capped per tick and depends only on that
//! view and the shared random source.

use rand::Rng;

use crate::ai::traits::TraitVector;
use crate::core::config::{AiConfig, SimConfig};
use crate::core::types::{clamp_unit, NationId, Sector};
use crate::diplomacy::action::DiplomaticAction;
use crate::diplomacy::graph::RelationshipGraph;
use crate::nation::government::GovernmentType;
use crate::nation::model::Nation;
use crate::simulation::intent::Intent;

/// Read-only view the AI decides against
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// Sorted by id
    pub nations: &'a [Nation],
    pub graph: &'a RelationshipGraph,
}

impl<'a> WorldView<'a> {
    pub fn nation(&self, id: NationId) -> Option<&'a Nation> {
        self.nations
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.nations[i])
    }
}

/// Decide this tick's intents for an AI-controlled nation
pub fn decide<R: Rng>(
    nation: &Nation,
    world: &WorldView<'_>,
    traits: &TraitVector,
    config: &SimConfig,
    rng: &mut R,
) -> Vec<Intent> {
    let ai = &config.ai;
    if nation.is_player || !ai.enabled || ai.max_intents_per_tick == 0 {
        return Vec::new();
    }

    let mut intents = Vec::new();
    intents.extend(budget_intent(nation, ai));
    intents.extend(tax_intent(nation, ai));
    intents.extend(diplomacy_intents(nation, world, traits, config, rng));
    intents.extend(government_intent(nation, traits, ai, rng));

    intents.truncate(ai.max_intents_per_tick);
    intents
}

/// Metric per sector, lower is worse
fn sector_metrics(nation: &Nation) -> [(Sector, f64); 5] {
    let security = if nation.is_at_war() {
        (nation.economy.budget.military * 500.0).min(100.0)
    } else {
        100.0
    };
    [
        (Sector::Healthcare, nation.population.health),
        (Sector::Education, nation.population.education),
        (Sector::Welfare, nation.population.happiness),
        (Sector::Infrastructure, nation.status.economic_health),
        (Sector::Military, security),
    ]
}

/// Move a slice of budget from the largest other sector into the sector
/// feeding the weakest metric
fn budget_intent(nation: &Nation, ai: &AiConfig) -> Option<Intent> {
    let mut weakest = None;
    for (sector, value) in sector_metrics(nation) {
        if weakest.map_or(true, |(_, w)| value < w) {
            weakest = Some((sector, value));
        }
    }
    let (sector, value) = weakest?;
    if value >= ai.comfort_threshold {
        return None;
    }

    let budget = nation.economy.budget;
    let donor = budget.largest_except(sector)?;
    let available = budget.get(donor) - ai.min_sector_share;
    let step = ai.realloc_step.min(available);
    if step <= 0.0 {
        return None;
    }

    Some(Intent::SetBudgetShares {
        nation: nation.id,
        shares: vec![
            (sector, budget.get(sector) + step),
            (donor, budget.get(donor) - step),
        ],
    })
}

fn tax_intent(nation: &Nation, ai: &AiConfig) -> Option<Intent> {
    let tax = nation.economy.tax_rate;
    let rate = if nation.government.approval < ai.low_approval && tax > ai.min_tax {
        (tax - ai.tax_step).max(ai.min_tax)
    } else if nation.economy.treasury < 0.0 && tax < ai.max_tax {
        (tax + ai.tax_step).min(ai.max_tax)
    } else {
        return None;
    };

    Some(Intent::SetTaxRate {
        nation: nation.id,
        rate: clamp_unit(rate),
    })
}

fn diplomacy_intents<R: Rng>(
    nation: &Nation,
    world: &WorldView<'_>,
    traits: &TraitVector,
    config: &SimConfig,
    rng: &mut R,
) -> Vec<Intent> {
    let ai = &config.ai;
    let mut intents = Vec::new();

    let engage = clamp_unit(ai.diplomacy_rate * (1.0 - traits.isolationism));
    if !rng.gen_bool(engage) {
        return intents;
    }

    // Best and worst partners by score; ties go to the lower id
    let mut best: Option<(NationId, f64)> = None;
    let mut worst: Option<(NationId, f64)> = None;
    for relation in world.graph.relations_of(nation.id) {
        let other = match relation.pair.other(nation.id) {
            Some(other) => other,
            None => continue,
        };
        if best.map_or(true, |(_, s)| relation.score > s) {
            best = Some((other, relation.score));
        }
        if worst.map_or(true, |(_, s)| relation.score < s) {
            worst = Some((other, relation.score));
        }
    }

    let mut propose = |target: NationId, action: DiplomaticAction| -> bool {
        let accepted = world.nation(target).map_or(false, |t| {
            world
                .graph
                .check_action(nation, t, action, &config.diplomacy)
                .is_ok()
        });
        if accepted {
            intents.push(Intent::ProposeAction {
                actor: nation.id,
                target,
                action,
            });
        }
        accepted
    };

    let unrest = nation.population.happiness < ai.peace_unrest_threshold
        || nation.stability() < ai.peace_unrest_threshold;

    // Sue for peace before anything else when the home front is failing
    if unrest {
        if let Some(enemy) = world.graph.most_hostile_enemy(nation.id) {
            propose(enemy, DiplomaticAction::PeaceTreaty);
            return intents;
        }
    }

    if let Some((target, score)) = worst {
        let own_power = nation.economy.military_power();
        let their_power = world
            .nation(target)
            .map_or(f64::INFINITY, |t| t.economy.military_power());

        if traits.aggression >= ai.war_aggression_min
            && score <= ai.war_score_max
            && own_power >= their_power * ai.war_strength_ratio
            && !unrest
        {
            propose(target, DiplomaticAction::DeclareWar);
        } else if traits.aggression >= 0.5 && score <= ai.sanction_score_max {
            propose(target, DiplomaticAction::Sanctions);
        }
    }

    if let Some((target, score)) = best {
        let friendly = if traits.aggression < ai.alliance_aggression_max
            && score >= config.diplomacy.alliance_min_score
        {
            DiplomaticAction::Alliance
        } else if traits.economic_focus >= 0.5 && score >= config.diplomacy.trade_min_score {
            DiplomaticAction::TradeDeal
        } else {
            DiplomaticAction::ImproveRelations
        };
        if !propose(target, friendly) && friendly != DiplomaticAction::ImproveRelations {
            propose(target, DiplomaticAction::ImproveRelations);
        }
    }

    intents
}

/// Rare regime change when both people and government are deeply unpopular
fn government_intent<R: Rng>(
    nation: &Nation,
    traits: &TraitVector,
    ai: &AiConfig,
    rng: &mut R,
) -> Option<Intent> {
    let crisis = nation.population.happiness < ai.peace_unrest_threshold
        && nation.government.approval < ai.low_approval;
    if !crisis || !rng.gen_bool(clamp_unit(ai.government_change_chance)) {
        return None;
    }

    let government = match nation.government.kind {
        GovernmentType::Dictatorship | GovernmentType::Monarchy => GovernmentType::Republic,
        GovernmentType::Democracy | GovernmentType::Republic if traits.aggression >= 0.5 => {
            GovernmentType::Dictatorship
        }
        GovernmentType::Democracy => GovernmentType::Republic,
        GovernmentType::Republic => GovernmentType::Democracy,
    };

    Some(Intent::ChangeGovernment {
        nation: nation.id,
        government,
    })
}
