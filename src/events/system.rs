//! Event system - samples and applies exogenous shocks each tick
//!
//! Every (template, nation) pair is visited in registration order, then
//! nation id order. Ineligible or cooling-down pairs never consume a
//! random draw, so a template that cannot fire does not perturb the
//! sequence seen by later ones.
//!
//! A template's chance is scaled per nation by stability: unstable nations
//! see more shocks, stable ones fewer.

use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::core::config::SimConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{clamp_percent, clamp_range, clamp_unit, NationId, Tick};
use crate::diplomacy::graph::RelationshipGraph;
use crate::events::catalog::EventCatalog;
use crate::events::log::{EventLog, LogKind};
use crate::events::template::{Effect, EventInstance, EventTemplate, NationField, StatusOverride};
use crate::nation::model::Nation;

const MAX_RESOURCE: f64 = 2.0;
const WAR_SPOILS: f64 = 0.05;

#[derive(Debug, Clone, Default)]
pub struct EventSystem {
    catalog: EventCatalog,
    /// (template index, nation) -> tick it last fired
    last_fired: BTreeMap<(usize, NationId), Tick>,
}

impl EventSystem {
    pub fn new(catalog: EventCatalog) -> Self {
        Self {
            catalog,
            last_fired: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(EventCatalog::standard())
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    fn cooling_down(&self, template: usize, nation: NationId, tick: Tick, cooldown: Tick) -> bool {
        self.last_fired
            .get(&(template, nation))
            .map_or(false, |&last| tick < last + cooldown)
    }

    /// Sample every eligible (template, nation) pair and apply the ones that
    /// fire. Effects are clamped exactly like the per-tick nation update.
    pub fn run_tick<R: Rng>(
        &mut self,
        nations: &mut [Nation],
        graph: &mut RelationshipGraph,
        tick: Tick,
        config: &SimConfig,
        rng: &mut R,
        log: &mut EventLog,
    ) -> Result<Vec<EventInstance>> {
        let mut fired = Vec::new();
        if !config.events.enabled {
            return Ok(fired);
        }

        let events = &config.events;
        for (t, template) in self.catalog.all().iter().enumerate() {
            let base = template.probability * events.probability_scale;
            if base <= 0.0 {
                continue;
            }

            for i in 0..nations.len() {
                let id = nations[i].id;
                if self.cooling_down(t, id, tick, events.cooldown_ticks) {
                    continue;
                }
                if !template.condition.holds(&nations[i]) {
                    continue;
                }
                let stability = nations[i].stability();
                let probability = scaled_probability(base, stability, events.stability_scaling);
                if probability <= 0.0 || !rng.gen_bool(probability) {
                    continue;
                }

                let magnitude = rng.gen_range(events.min_magnitude..=events.max_magnitude);
                apply_template(template, i, nations, graph, magnitude, tick, config, log)?;
                self.last_fired.insert((t, id), tick);

                debug!("{} in {} (magnitude {:.2})", template.name, nations[i].name, magnitude);
                log.record(
                    tick,
                    LogKind::Event(template.category),
                    vec![id],
                    format!("{}: {}", nations[i].name, template.name),
                );
                fired.push(EventInstance {
                    template_id: template.id.clone(),
                    name: template.name.clone(),
                    category: template.category,
                    nation: id,
                    tick,
                    magnitude,
                });
            }
        }

        Ok(fired)
    }
}

/// Per-nation firing chance: `base * (1 + scaling * (50 - stability) / 100)`
fn scaled_probability(base: f64, stability: f64, scaling: f64) -> f64 {
    clamp_unit(base * (1.0 + scaling * (50.0 - stability) / 100.0))
}

#[allow(clippy::too_many_arguments)]
fn apply_template(
    template: &EventTemplate,
    index: usize,
    nations: &mut [Nation],
    graph: &mut RelationshipGraph,
    magnitude: f64,
    tick: Tick,
    config: &SimConfig,
    log: &mut EventLog,
) -> Result<()> {
    for effect in &template.effects {
        match effect {
            Effect::Additive { field, amount } => {
                let nation = &mut nations[index];
                let value = read_field(nation, *field) + amount * magnitude;
                write_field(nation, *field, value, config);
            }
            Effect::Multiplicative { field, factor } => {
                let nation = &mut nations[index];
                let value = read_field(nation, *field) * (1.0 + (factor - 1.0) * magnitude);
                write_field(nation, *field, value, config);
            }
            Effect::Override {
                status: StatusOverride::SetGovernment(kind),
            } => {
                let nation = &mut nations[index];
                let previous = nation.government.kind;
                if previous != *kind {
                    nation.government.kind = *kind;
                    nation.politics.election_countdown = kind.coefficients().election_cadence;
                    info!("{}: {} replaced by {}", nation.name, previous.name(), kind.name());
                    log.record(
                        tick,
                        LogKind::Government,
                        vec![nation.id],
                        format!("{} is now a {}", nation.name, kind.name()),
                    );
                }
            }
            Effect::Override {
                status: StatusOverride::EndWar,
            } => end_war(index, nations, graph, tick, config, log)?,
        }
    }
    Ok(())
}

/// End the war with the most hostile enemy. The side with the higher power
/// score takes a GDP gain, the other a GDP loss; nobody is removed.
fn end_war(
    index: usize,
    nations: &mut [Nation],
    graph: &mut RelationshipGraph,
    tick: Tick,
    config: &SimConfig,
    log: &mut EventLog,
) -> Result<()> {
    let id = nations[index].id;
    let enemy = match graph.most_hostile_enemy(id) {
        Some(enemy) => enemy,
        None => return Ok(()),
    };
    let other = nations
        .iter()
        .position(|n| n.id == enemy)
        .ok_or(SimError::UnknownNation(enemy))?;

    graph.end_war(id, enemy, &config.diplomacy)?;
    // Later templates this tick must see the peace
    nations[index].status.standing = graph.standing(id);
    nations[other].status.standing = graph.standing(enemy);

    let (winner, loser) = if nations[index].power_score() >= nations[other].power_score() {
        (index, other)
    } else {
        (other, index)
    };
    for (i, factor) in [(winner, 1.0 + WAR_SPOILS), (loser, 1.0 - WAR_SPOILS)] {
        let gdp = nations[i].economy.gdp * factor;
        write_field(&mut nations[i], NationField::Gdp, gdp, config);
    }

    info!(
        "Ceasefire between {} and {}, {} prevails",
        nations[index].name, nations[other].name, nations[winner].name
    );
    log.record(
        tick,
        LogKind::Treaty,
        vec![id, enemy],
        format!(
            "Ceasefire between {} and {}; {} prevails",
            nations[index].name, nations[other].name, nations[winner].name
        ),
    );
    Ok(())
}

fn read_field(nation: &Nation, field: NationField) -> f64 {
    match field {
        NationField::Gdp => nation.economy.gdp,
        NationField::Treasury => nation.economy.treasury,
        NationField::Inflation => nation.economy.inflation,
        NationField::Unemployment => nation.economy.unemployment,
        NationField::Population => nation.population.size as f64,
        NationField::Happiness => nation.population.happiness,
        NationField::Health => nation.population.health,
        NationField::Education => nation.population.education,
        NationField::Approval => nation.government.approval,
        NationField::Corruption => nation.government.corruption,
        NationField::RulingSupport => nation.politics.ruling().map_or(0.0, |p| p.popularity),
        NationField::Resource(kind) => nation.economy.resources.get(&kind).copied().unwrap_or(0.0),
    }
}

fn write_field(nation: &mut Nation, field: NationField, value: f64, config: &SimConfig) {
    let economy = &config.economy;
    match field {
        NationField::Gdp => {
            nation.economy.gdp = clamp_range(value, economy.gdp_floor, economy.gdp_ceiling);
        }
        NationField::Treasury => {
            nation.economy.treasury = clamp_range(value, -economy.treasury_limit, economy.treasury_limit);
        }
        NationField::Inflation => nation.economy.inflation = clamp_range(value, -0.05, 0.5),
        NationField::Unemployment => nation.economy.unemployment = clamp_unit(value),
        NationField::Population => {
            nation.population.set_size(value, config.population.max_population);
        }
        NationField::Happiness => nation.population.happiness = clamp_percent(value),
        NationField::Health => nation.population.health = clamp_percent(value),
        NationField::Education => nation.population.education = clamp_percent(value),
        NationField::Approval => nation.government.approval = clamp_percent(value),
        NationField::Corruption => nation.government.corruption = clamp_percent(value),
        NationField::RulingSupport => {
            let politics = &mut nation.politics;
            let ruling = politics.ruling_party;
            if let Some(party) = politics.parties.get_mut(ruling) {
                party.popularity = clamp_unit(value);
                politics.normalize_popularity();
            }
        }
        NationField::Resource(kind) => {
            nation
                .economy
                .resources
                .insert(kind, clamp_range(value, 0.0, MAX_RESOURCE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diplomacy::action::DiplomaticAction;
    use crate::events::template::{Condition, EventCategory};
    use crate::nation::government::GovernmentType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world(n: u32) -> (Vec<Nation>, RelationshipGraph) {
        let nations: Vec<Nation> = (0..n)
            .map(|i| {
                Nation::new(
                    NationId(i),
                    format!("Nation {}", i),
                    GovernmentType::Democracy,
                    1_000_000,
                    50_000_000.0 * (i + 1) as f64,
                )
            })
            .collect();
        let ids: Vec<NationId> = nations.iter().map(|n| n.id).collect();
        (nations, RelationshipGraph::new(&ids))
    }

    fn single(condition: Condition, effects: Vec<Effect>) -> EventSystem {
        single_with(1.0, condition, effects)
    }

    fn single_with(probability: f64, condition: Condition, effects: Vec<Effect>) -> EventSystem {
        let mut catalog = EventCatalog::new();
        catalog.add(EventTemplate {
            id: "test".into(),
            name: "Test Event".into(),
            category: EventCategory::Political,
            probability,
            condition,
            effects,
        });
        EventSystem::new(catalog)
    }

    /// Default config with stability-neutral chances
    fn flat_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.events.stability_scaling = 0.0;
        config
    }

    fn unrest() -> Vec<Effect> {
        vec![Effect::Additive {
            field: NationField::Approval,
            amount: -1.0,
        }]
    }

    #[test]
    fn test_ineligible_template_never_fires() {
        let (mut nations, mut graph) = world(1);
        nations[0].politics.stability = 75.0;
        let mut system = single(Condition::StabilityBelow { value: 20.0 }, unrest());
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut log = EventLog::new(50);

        let mut fires = 0;
        for tick in 0..10_000 {
            fires += system
                .run_tick(&mut nations, &mut graph, tick, &config, &mut rng, &mut log)
                .unwrap()
                .len();
        }
        assert_eq!(fires, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_eligible_template_respects_cooldown() {
        let (mut nations, mut graph) = world(1);
        nations[0].politics.stability = 10.0;
        let mut system = single(Condition::StabilityBelow { value: 20.0 }, unrest());
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut log = EventLog::new(50);

        let mut fired_at = Vec::new();
        for tick in 0..1_000 {
            for event in system
                .run_tick(&mut nations, &mut graph, tick, &config, &mut rng, &mut log)
                .unwrap()
            {
                fired_at.push(event.tick);
            }
        }
        let expected: Vec<Tick> = (0..10).map(|k| k * config.events.cooldown_ticks).collect();
        assert_eq!(fired_at, expected);
    }

    #[test]
    fn test_disabled_events_do_nothing() {
        let (mut nations, mut graph) = world(2);
        let mut system = single(Condition::Always, unrest());
        let mut config = SimConfig::default();
        config.events.enabled = false;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut log = EventLog::new(50);

        let fired = system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();
        assert!(fired.is_empty());
    }

    #[test]
    fn test_effects_are_clamped() {
        let (mut nations, mut graph) = world(1);
        let mut system = single(
            Condition::Always,
            vec![
                Effect::Additive {
                    field: NationField::Happiness,
                    amount: -500.0,
                },
                Effect::Multiplicative {
                    field: NationField::Population,
                    factor: -3.0,
                },
                Effect::Additive {
                    field: NationField::Resource(crate::core::types::ResourceKind::Oil),
                    amount: 10.0,
                },
            ],
        );
        let config = flat_config();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = EventLog::new(50);

        system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        assert_eq!(nations[0].population.happiness, 0.0);
        assert_eq!(nations[0].population.size, 0);
        assert_eq!(
            nations[0].economy.resources[&crate::core::types::ResourceKind::Oil],
            MAX_RESOURCE
        );
    }

    #[test]
    fn test_coup_installs_dictatorship() {
        let (mut nations, mut graph) = world(1);
        let mut system = single(
            Condition::Always,
            vec![Effect::Override {
                status: StatusOverride::SetGovernment(GovernmentType::Dictatorship),
            }],
        );
        let config = flat_config();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = EventLog::new(50);

        system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        assert_eq!(nations[0].government.kind, GovernmentType::Dictatorship);
        assert_eq!(nations[0].politics.election_countdown, None);
        assert!(log.iter().any(|e| e.kind == LogKind::Government));
    }

    #[test]
    fn test_ceasefire_rewards_stronger_side() {
        let (mut nations, mut graph) = world(2);
        let config = flat_config();
        graph
            .apply_action(&nations[0], &nations[1], DiplomaticAction::DeclareWar, &config.diplomacy)
            .unwrap();
        for nation in nations.iter_mut() {
            let standing = graph.standing(nation.id);
            crate::nation::advance::refresh_derived(nation, &standing, &config);
        }
        let weak_gdp = nations[0].economy.gdp;
        let strong_gdp = nations[1].economy.gdp;

        let mut system = single(
            Condition::AtWar,
            vec![Effect::Override {
                status: StatusOverride::EndWar,
            }],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = EventLog::new(50);
        system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        assert_eq!(graph.active_wars(), 0);
        assert!(nations[1].economy.gdp > strong_gdp);
        assert!(nations[0].economy.gdp < weak_gdp);
    }

    #[test]
    fn test_ceasefire_fires_once_per_war() {
        let (mut nations, mut graph) = world(2);
        let config = flat_config();
        graph
            .apply_action(&nations[0], &nations[1], DiplomaticAction::DeclareWar, &config.diplomacy)
            .unwrap();
        for nation in nations.iter_mut() {
            nation.status.standing = graph.standing(nation.id);
        }
        let happiness = nations[1].population.happiness;

        let mut system = single(
            Condition::AtWar,
            vec![
                Effect::Override {
                    status: StatusOverride::EndWar,
                },
                Effect::Additive {
                    field: NationField::Happiness,
                    amount: 5.0,
                },
            ],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = EventLog::new(50);
        let fired = system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].nation, NationId(0));
        assert_eq!(graph.active_wars(), 0);
        assert!(nations.iter().all(|n| !n.is_at_war()));
        assert_eq!(nations[1].population.happiness, happiness);
        assert_eq!(log.iter().filter(|e| e.kind == LogKind::Treaty).count(), 1);
    }

    #[test]
    fn test_scaled_probability() {
        assert!((scaled_probability(0.1, 50.0, 1.0) - 0.1).abs() < 1e-12);
        assert!((scaled_probability(0.1, 0.0, 1.0) - 0.15).abs() < 1e-12);
        assert!((scaled_probability(0.1, 100.0, 1.0) - 0.05).abs() < 1e-12);
        assert_eq!(scaled_probability(0.1, 0.0, 0.0), 0.1);
        assert_eq!(scaled_probability(0.9, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_unstable_nations_see_more_events() {
        let (mut nations, mut graph) = world(2);
        nations[0].politics.stability = 10.0;
        nations[1].politics.stability = 90.0;
        let mut system = single_with(0.2, Condition::Always, unrest());
        let mut config = SimConfig::default();
        config.events.cooldown_ticks = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut log = EventLog::new(50);

        let mut counts = [0usize; 2];
        for tick in 0..5_000 {
            for event in system
                .run_tick(&mut nations, &mut graph, tick, &config, &mut rng, &mut log)
                .unwrap()
            {
                counts[event.nation.0 as usize] += 1;
            }
        }
        // Expected rates 0.28 and 0.12
        assert!(counts[0] > 1_200, "{:?}", counts);
        assert!(counts[1] < 800, "{:?}", counts);
    }

    #[test]
    fn test_scandal_costs_ruling_party_support() {
        let (mut nations, mut graph) = world(1);
        let ruling = nations[0].politics.ruling_party;
        let before = nations[0].politics.parties[ruling].popularity;
        let mut system = single(
            Condition::Always,
            vec![Effect::Multiplicative {
                field: NationField::RulingSupport,
                factor: 0.5,
            }],
        );
        let config = flat_config();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut log = EventLog::new(50);
        system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        let politics = &nations[0].politics;
        assert!(politics.parties[ruling].popularity < before);
        assert!((politics.popularity_total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_population_effect_capped() {
        let (mut nations, mut graph) = world(1);
        let mut system = single(
            Condition::Always,
            vec![Effect::Multiplicative {
                field: NationField::Population,
                factor: 1.0e9,
            }],
        );
        let mut config = flat_config();
        config.population.max_population = 5_000_000;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut log = EventLog::new(50);
        system
            .run_tick(&mut nations, &mut graph, 0, &config, &mut rng, &mut log)
            .unwrap();

        assert_eq!(nations[0].population.size, 5_000_000);
    }

    #[test]
    fn test_same_seed_same_events() {
        let run = || {
            let (mut nations, mut graph) = world(6);
            let mut system = EventSystem::standard();
            let config = SimConfig::default();
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            let mut log = EventLog::new(500);
            let mut all = Vec::new();
            for tick in 0..2_000 {
                all.extend(
                    system
                        .run_tick(&mut nations, &mut graph, tick, &config, &mut rng, &mut log)
                        .unwrap(),
                );
            }
            (all, nations)
        };

        let (a, na) = run();
        let (b, nb) = run();
        assert!(!a.is_empty());
        assert_eq!(a, b);
        assert_eq!(na, nb);
    }
}
