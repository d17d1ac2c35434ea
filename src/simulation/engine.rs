//! Tick driver: intent queue, clock, and the fixed per-tick pipeline
//!
//! Order within one tick:
//! 1. AI nations decide against the pre-tick world
//! 2. queued player intents, then AI intents, are applied; diplomatic
//!    proposals mutate the graph, the rest are grouped per nation
//! 3. treaty countdowns and score drift
//! 4. every nation advances (economy, population, government, politics)
//! 5. random events
//! 6. derived statistics are refreshed against the final graph
//! 7. the calendar moves on

use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::ai::decide::{decide, WorldView};
use crate::core::calendar::Date;
use crate::core::config::SimConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{NationId, Tick};
use crate::diplomacy::action::{ActionOutcome, DiplomaticAction, SideEffect};
use crate::diplomacy::graph::TreatyChange;
use crate::events::log::LogKind;
use crate::events::template::EventInstance;
use crate::nation::advance::{advance, refresh_derived, NationIntents};
use crate::nation::government::GovernmentType;
use crate::nation::model::Nation;
use crate::nation::politics::ElectionResult;
use crate::simulation::clock::{Clock, ClockState};
use crate::simulation::generation::generate_world;
use crate::simulation::intent::Intent;
use crate::simulation::snapshot::Snapshot;
use crate::simulation::world::World;

/// What a single `step` resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: Tick,
    pub date: Date,
    pub intents_applied: usize,
    pub intents_rejected: usize,
    pub actions: Vec<ActionOutcome>,
    pub treaty_changes: Vec<TreatyChange>,
    pub events: Vec<EventInstance>,
    pub elections: Vec<(NationId, ElectionResult)>,
    pub government_changes: Vec<(NationId, GovernmentType, GovernmentType)>,
}

impl TickReport {
    fn new(tick: Tick, date: Date) -> Self {
        Self {
            tick,
            date,
            intents_applied: 0,
            intents_rejected: 0,
            actions: Vec::new(),
            treaty_changes: Vec::new(),
            events: Vec::new(),
            elections: Vec::new(),
            government_changes: Vec::new(),
        }
    }

    pub fn events_fired(&self) -> usize {
        self.events.len()
    }
}

/// Owns the authoritative world. Callers read snapshots and submit intents;
/// nothing changes between `step` calls.
pub struct Simulation {
    world: World,
    clock: Clock,
    queue: Vec<Intent>,
}

impl Simulation {
    pub fn new(world: World) -> Self {
        Self {
            world,
            clock: Clock::new(),
            queue: Vec::new(),
        }
    }

    /// Generate a world from config and wrap it
    pub fn from_config(config: SimConfig) -> Result<Self> {
        Ok(Self::new(generate_world(config)?))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for scenario setup
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick(&self) -> Tick {
        self.world.tick()
    }

    // Clock controls

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<()> {
        self.clock.set_speed(multiplier)
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    /// Validate an intent and queue it for the next tick boundary
    pub fn submit(&mut self, intent: Intent) -> Result<()> {
        if let Err(err) = intent.validate(&self.world) {
            debug!("Refused {}: {}", intent, err);
            return Err(err);
        }
        debug!("Queued {}", intent);
        self.queue.push(intent);
        Ok(())
    }

    pub fn pending(&self) -> &[Intent] {
        &self.queue
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world, self.clock.state(), self.clock.speed())
    }

    /// Run `count` ticks back to back
    pub fn step_many(&mut self, count: u64) -> Result<Vec<TickReport>> {
        let mut reports = Vec::with_capacity(count as usize);
        for _ in 0..count {
            reports.push(self.step()?);
        }
        Ok(reports)
    }

    /// Step as many ticks as the clock says are due after `units` of real
    /// time. A stopped or paused clock runs nothing.
    pub fn advance_real_time(&mut self, units: f64) -> Result<Vec<TickReport>> {
        let due = self.clock.due_ticks(units);
        self.step_many(due)
    }

    /// Resolve exactly one tick
    pub fn step(&mut self) -> Result<TickReport> {
        let tick = self.world.tick();
        let mut report = TickReport::new(tick, self.world.calendar.current_date());

        // Decide on a copy of the rng so a failed check leaves it untouched
        let mut rng = self.world.rng.clone();
        let ai = self.ai_intents(&mut rng);
        self.check_references(&ai)?;
        self.world.rng = rng;

        let mut intents = std::mem::take(&mut self.queue);
        intents.extend(ai);

        let mut per_nation: BTreeMap<NationId, NationIntents> = BTreeMap::new();
        for carried in std::mem::take(&mut self.world.carried_effects) {
            per_nation
                .entry(carried.nation)
                .or_default()
                .effects
                .push(carried.effect);
        }

        let mut next_effects: Vec<SideEffect> = Vec::new();
        for intent in intents {
            match self.apply_intent(&intent, tick, &mut per_nation) {
                Ok(Some(outcome)) => {
                    next_effects.extend(outcome.side_effects.iter().copied());
                    report.actions.push(outcome);
                    report.intents_applied += 1;
                }
                Ok(None) => report.intents_applied += 1,
                Err(SimError::Rejected(reason)) => {
                    warn!("Tick {}: dropped {} ({})", tick, intent, reason);
                    self.world.log.record(
                        tick,
                        LogKind::Rejection,
                        vec![intent.nation()],
                        format!("{} rejected: {}", intent, reason),
                    );
                    report.intents_rejected += 1;
                }
                Err(err) => return Err(err),
            }
        }

        report.treaty_changes = self.resolve_treaties(tick);
        self.advance_nations(tick, &per_nation, &mut report);

        {
            let World {
                nations,
                graph,
                events,
                config,
                rng,
                log,
                ..
            } = &mut self.world;
            report.events = events.run_tick(nations, graph, tick, config, rng, log)?;
        }

        self.refresh_all();
        self.world.carried_effects = next_effects;
        self.world.calendar.advance();

        debug!(
            "Tick {} done: {} applied, {} rejected, {} events",
            tick,
            report.intents_applied,
            report.intents_rejected,
            report.events_fired()
        );
        Ok(report)
    }

    /// Intents of every AI nation in id order, decided on the pre-tick world
    fn ai_intents(&self, rng: &mut ChaCha8Rng) -> Vec<Intent> {
        let world = &self.world;
        let view = WorldView {
            nations: &world.nations,
            graph: &world.graph,
        };

        let mut intents = Vec::new();
        for nation in &world.nations {
            intents.extend(decide(nation, &view, &nation.traits, &world.config, rng));
        }
        intents
    }

    /// Every nation named by queued intents, `extra` intents and carried
    /// effects must exist. Runs before the tick mutates anything.
    fn check_references(&self, extra: &[Intent]) -> Result<()> {
        for intent in self.queue.iter().chain(extra) {
            for id in intent.participants() {
                self.world.nation(id)?;
            }
        }
        for carried in &self.world.carried_effects {
            self.world.nation(carried.nation)?;
        }
        Ok(())
    }

    /// Apply one intent. Diplomatic proposals hit the graph immediately;
    /// the rest are collected for the nation's advance.
    fn apply_intent(
        &mut self,
        intent: &Intent,
        tick: Tick,
        per_nation: &mut BTreeMap<NationId, NationIntents>,
    ) -> Result<Option<ActionOutcome>> {
        if let Intent::ProposeAction {
            actor,
            target,
            action,
        } = intent
        {
            let World {
                nations,
                graph,
                config,
                log,
                ..
            } = &mut self.world;
            let nations: &[Nation] = nations;
            let actor = find(nations, *actor)?;
            let target = find(nations, *target)?;

            let outcome = graph.apply_action(actor, target, *action, &config.diplomacy)?;
            let message = format!("{} -> {}: {}", actor.name, target.name, action);
            match action {
                DiplomaticAction::DeclareWar
                | DiplomaticAction::PeaceTreaty
                | DiplomaticAction::Alliance => info!("{}", message),
                _ => debug!("{}", message),
            }
            log.record(tick, LogKind::Diplomacy, vec![actor.id, target.id], message);
            return Ok(Some(outcome));
        }

        intent.validate(&self.world)?;
        let entry = per_nation.entry(intent.nation()).or_default();
        match intent {
            Intent::SetTaxRate { rate, .. } => entry.tax_rate = Some(*rate),
            Intent::SetBudgetShares { shares, .. } => entry.budget.extend(shares.iter().copied()),
            Intent::ChangeGovernment { government, .. } => entry.government = Some(*government),
            Intent::SetLaw { law, enacted, .. } => entry.laws.push((*law, *enacted)),
            Intent::ProposeAction { .. } => {}
        }
        Ok(None)
    }

    fn resolve_treaties(&mut self, tick: Tick) -> Vec<TreatyChange> {
        let World {
            nations,
            graph,
            config,
            log,
            ..
        } = &mut self.world;

        let mut changes = graph.tick_treaties(&config.diplomacy);
        changes.extend(graph.drift_scores(&config.diplomacy));

        for change in &changes {
            let (pair, message) = match change {
                TreatyChange::Renewed { pair, kind } => (pair, format!("{} treaty renewed", kind)),
                TreatyChange::Expired { pair, kind } => (pair, format!("{} treaty expired", kind)),
                TreatyChange::Broken { pair, kind } => (pair, format!("{} treaty broken", kind)),
                TreatyChange::SanctionsLifted { pair } => (pair, "sanctions lifted".to_string()),
            };
            let message = format!(
                "{} / {}: {}",
                name_of(nations, pair.low),
                name_of(nations, pair.high),
                message
            );
            debug!("{}", message);
            log.record(tick, LogKind::Treaty, vec![pair.low, pair.high], message);
        }
        changes
    }

    fn advance_nations(
        &mut self,
        tick: Tick,
        per_nation: &BTreeMap<NationId, NationIntents>,
        report: &mut TickReport,
    ) {
        let standings = self.world.graph.standings();
        let World {
            nations,
            config,
            rng,
            log,
            ..
        } = &mut self.world;

        let none = NationIntents::default();
        let current = std::mem::take(nations);
        let mut advanced = Vec::with_capacity(current.len());

        for nation in current {
            let id = nation.id;
            let intents = per_nation.get(&id).unwrap_or(&none);
            let standing = standings.get(&id).copied().unwrap_or_default();
            let (nation, outcome) = advance(nation, intents, &standing, config, rng);

            if let Some((from, to)) = outcome.government_change {
                let message = format!("{}: {} -> {}", nation.name, from.name(), to.name());
                info!("{}", message);
                log.record(tick, LogKind::Government, vec![id], message);
                report.government_changes.push((id, from, to));
            }
            if let Some(result) = outcome.election {
                let message = if result.changed {
                    format!("{}: {} won the election from {}", nation.name, result.winner, result.previous)
                } else {
                    format!("{}: {} re-elected", nation.name, result.winner)
                };
                info!("{}", message);
                log.record(tick, LogKind::Election, vec![id], message);
                report.elections.push((id, result));
            }
            advanced.push(nation);
        }

        *nations = advanced;
    }

    fn refresh_all(&mut self) {
        let standings = self.world.graph.standings();
        let World {
            nations, config, ..
        } = &mut self.world;
        for nation in nations.iter_mut() {
            let standing = standings.get(&nation.id).copied().unwrap_or_default();
            refresh_derived(nation, &standing, config);
        }
    }
}

fn find(nations: &[Nation], id: NationId) -> Result<&Nation> {
    nations
        .binary_search_by_key(&id, |n| n.id)
        .map(|i| &nations[i])
        .map_err(|_| SimError::UnknownNation(id))
}

fn name_of(nations: &[Nation], id: NationId) -> String {
    find(nations, id)
        .map(|n| n.name.clone())
        .unwrap_or_else(|_| id.to_string())
}
