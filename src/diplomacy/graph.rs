//! Relationship graph: one record per unordered pair of nations
//!
//! Records live in a `Vec` sorted by pair so iteration order is stable;
//! the hash index is only ever used for lookups.

use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::config::DiplomacyConfig;
use crate::core::error::{IntentRejection, Result, SimError};
use crate::core::types::{NationId, Sector};
use crate::diplomacy::action::{ActionOutcome, DiplomaticAction, SideEffect};
use crate::diplomacy::relation::{NationPair, Relationship, Sanction, Treaty, TreatyKind};
use crate::nation::advance::NationEffect;
use crate::nation::model::{Nation, Standing};

/// Change to a treaty produced by countdown or score drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreatyChange {
    Renewed { pair: NationPair, kind: TreatyKind },
    Expired { pair: NationPair, kind: TreatyKind },
    Broken { pair: NationPair, kind: TreatyKind },
    SanctionsLifted { pair: NationPair },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationshipGraph {
    nations: Vec<NationId>,
    relations: Vec<Relationship>,
    #[serde(skip)]
    index: AHashMap<NationPair, usize>,
}

impl PartialEq for RelationshipGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nations == other.nations && self.relations == other.relations
    }
}

impl RelationshipGraph {
    /// Create a neutral record for every pair of the given nations
    pub fn new(ids: &[NationId]) -> Self {
        let mut nations = ids.to_vec();
        nations.sort();
        nations.dedup();

        let mut relations = Vec::with_capacity(nations.len() * nations.len().saturating_sub(1) / 2);
        for (i, &a) in nations.iter().enumerate() {
            for &b in &nations[i + 1..] {
                if let Some(pair) = NationPair::new(a, b) {
                    relations.push(Relationship::new(pair, 0.0));
                }
            }
        }

        let index = relations
            .iter()
            .enumerate()
            .map(|(i, r)| (r.pair, i))
            .collect();

        Self {
            nations,
            relations,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn contains_nation(&self, id: NationId) -> bool {
        self.nations.binary_search(&id).is_ok()
    }

    /// The record for a pair; the same record is returned for (a, b) and (b, a)
    pub fn get(&self, a: NationId, b: NationId) -> Option<&Relationship> {
        let pair = NationPair::new(a, b)?;
        self.index.get(&pair).map(|&i| &self.relations[i])
    }

    pub fn get_mut(&mut self, a: NationId, b: NationId) -> Option<&mut Relationship> {
        let pair = NationPair::new(a, b)?;
        let i = *self.index.get(&pair)?;
        self.relations.get_mut(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relationship> {
        self.relations.iter()
    }

    /// Every record involving `id`, in pair order
    pub fn relations_of(&self, id: NationId) -> impl Iterator<Item = &Relationship> {
        self.relations.iter().filter(move |r| r.pair.contains(id))
    }

    pub fn allies_of(&self, id: NationId) -> Vec<NationId> {
        self.relations_of(id)
            .filter(|r| r.is_allied())
            .filter_map(|r| r.pair.other(id))
            .collect()
    }

    /// Enemy with the lowest score; ties go to the lower id
    pub fn most_hostile_enemy(&self, id: NationId) -> Option<NationId> {
        let mut worst: Option<(&Relationship, NationId)> = None;
        for relation in self.relations_of(id).filter(|r| r.at_war) {
            let other = match relation.pair.other(id) {
                Some(other) => other,
                None => continue,
            };
            if worst.map_or(true, |(w, _)| relation.score < w.score) {
                worst = Some((relation, other));
            }
        }
        worst.map(|(_, other)| other)
    }

    fn lookup(&self, actor: NationId, target: NationId) -> Result<usize> {
        for id in [actor, target] {
            if !self.contains_nation(id) {
                return Err(SimError::UnknownNation(id));
            }
        }
        let pair = NationPair::new(actor, target).ok_or(IntentRejection::SelfTarget)?;
        self.index
            .get(&pair)
            .copied()
            .ok_or(SimError::UnknownNation(target))
    }

    /// Check an action's precondition without changing anything
    pub fn check_action(
        &self,
        actor: &Nation,
        target: &Nation,
        action: DiplomaticAction,
        config: &DiplomacyConfig,
    ) -> Result<()> {
        let relation = &self.relations[self.lookup(actor.id, target.id)?];
        precondition(relation, actor, target, action, config).map_err(SimError::from)
    }

    /// Validate and apply an action. On rejection the graph is untouched.
    ///
    /// The returned side effects are one-off economic consequences that the
    /// caller feeds into both nations' next tick; recurring effects (trade
    /// bonus, war penalties, sanctions) follow from the graph's standing.
    pub fn apply_action(
        &mut self,
        actor: &Nation,
        target: &Nation,
        action: DiplomaticAction,
        config: &DiplomacyConfig,
    ) -> Result<ActionOutcome> {
        let i = self.lookup(actor.id, target.id)?;
        precondition(&self.relations[i], actor, target, action, config)?;

        let mut side_effects = Vec::new();
        let both = [actor.id, target.id];
        let relation = &mut self.relations[i];

        match action {
            DiplomaticAction::ImproveRelations => {
                relation.adjust_score(config.improve_delta);
            }
            DiplomaticAction::TradeDeal => {
                relation.trade = Some(Treaty::new(config.trade_duration));
                relation.adjust_score(config.trade_delta);
            }
            DiplomaticAction::Alliance => {
                relation.alliance = Some(Treaty::new(config.alliance_duration));
                relation.adjust_score(config.alliance_delta);
            }
            DiplomaticAction::DeclareWar => {
                relation.at_war = true;
                relation.trade = None;
                relation.alliance = None;
                relation.peace = None;
                relation.adjust_score(config.war_delta);
                side_effects.extend(both.iter().map(|&nation| SideEffect {
                    nation,
                    effect: NationEffect::SectorShift {
                        sector: Sector::Military,
                        delta: config.war_military_shift,
                    },
                }));
            }
            DiplomaticAction::PeaceTreaty => {
                relation.at_war = false;
                relation.peace = Some(Treaty::new(Some(config.truce_duration)));
                relation.adjust_score(config.peace_delta);
                side_effects.extend(both.iter().map(|&nation| SideEffect {
                    nation,
                    effect: NationEffect::SectorShift {
                        sector: Sector::Military,
                        delta: -config.war_military_shift,
                    },
                }));
            }
            DiplomaticAction::Sanctions => {
                relation.sanction = Some(Sanction {
                    imposer: actor.id,
                    remaining: config.sanction_duration,
                });
                relation.trade = None;
                relation.adjust_score(config.sanction_delta);
                side_effects.push(SideEffect {
                    nation: target.id,
                    effect: NationEffect::GdpFactor(config.sanction_gdp_factor),
                });
                side_effects.push(SideEffect {
                    nation: target.id,
                    effect: NationEffect::HappinessDelta(-config.sanction_happiness_hit),
                });
            }
            DiplomaticAction::ForeignAid => {
                let amount = actor.economy.gdp * config.aid_fraction;
                relation.adjust_score(config.aid_delta);
                side_effects.push(SideEffect {
                    nation: actor.id,
                    effect: NationEffect::TreasuryDelta(-amount),
                });
                side_effects.push(SideEffect {
                    nation: target.id,
                    effect: NationEffect::TreasuryDelta(amount),
                });
                side_effects.push(SideEffect {
                    nation: target.id,
                    effect: NationEffect::HappinessDelta(config.aid_happiness_boost),
                });
            }
        }

        relation.settle_status();
        let outcome = ActionOutcome {
            actor: actor.id,
            target: target.id,
            action,
            pair: relation.pair,
            score: relation.score,
            status: relation.status,
            side_effects,
        };

        // Sanctioning someone also sours relations with their allies
        if action == DiplomaticAction::Sanctions {
            for ally in self.allies_of(target.id) {
                if ally == actor.id {
                    continue;
                }
                if let Some(r) = self.get_mut(actor.id, ally) {
                    r.adjust_score(config.sanction_ally_penalty);
                }
            }
        }

        debug!(
            "{} -> {}: {} (score {:.1}, {})",
            actor.name, target.name, action, outcome.score, outcome.status
        );
        Ok(outcome)
    }

    /// End a war directly, leaving a truce in place
    pub fn end_war(&mut self, a: NationId, b: NationId, config: &DiplomacyConfig) -> Result<()> {
        let i = self.lookup(a, b)?;
        let relation = &mut self.relations[i];
        if !relation.at_war {
            return Err(IntentRejection::NotAtWar.into());
        }
        relation.at_war = false;
        relation.peace = Some(Treaty::new(Some(config.truce_duration)));
        relation.settle_status();
        Ok(())
    }

    /// Count treaties down one tick. Expiring alliances and trade deals
    /// renew when the score is high enough; everything else clears.
    pub fn tick_treaties(&mut self, config: &DiplomacyConfig) -> Vec<TreatyChange> {
        let mut changes = Vec::new();

        for relation in &mut self.relations {
            let pair = relation.pair;
            let renew = relation.score >= config.renewal_score;

            for (kind, slot, duration) in [
                (TreatyKind::Alliance, &mut relation.alliance, config.alliance_duration),
                (TreatyKind::Trade, &mut relation.trade, config.trade_duration),
            ] {
                if let Some(treaty) = slot.as_mut() {
                    if treaty.tick() {
                        if renew {
                            *treaty = Treaty::new(duration);
                            changes.push(TreatyChange::Renewed { pair, kind });
                        } else {
                            *slot = None;
                            changes.push(TreatyChange::Expired { pair, kind });
                        }
                    }
                }
            }

            if relation.peace.as_mut().map_or(false, Treaty::tick) {
                relation.peace = None;
                changes.push(TreatyChange::Expired {
                    pair,
                    kind: TreatyKind::Peace,
                });
            }

            if let Some(sanction) = relation.sanction.as_mut() {
                sanction.remaining = sanction.remaining.saturating_sub(1);
                if sanction.remaining == 0 {
                    relation.sanction = None;
                    changes.push(TreatyChange::SanctionsLifted { pair });
                }
            }

            relation.settle_status();
        }

        changes
    }

    /// Drift every score toward zero, nudge it up for active treaties, and
    /// break treaties whose score has collapsed.
    pub fn drift_scores(&mut self, config: &DiplomacyConfig) -> Vec<TreatyChange> {
        let mut changes = Vec::new();

        for relation in &mut self.relations {
            let pair = relation.pair;
            let decay = relation.score.abs().min(config.score_decay);
            let toward_zero = -relation.score.signum() * decay;
            let treaties = relation.alliance.is_some() as u8 + relation.trade.is_some() as u8;
            relation.adjust_score(toward_zero + config.treaty_drift * treaties as f64);

            if relation.alliance.is_some() && relation.score < config.alliance_break_score {
                relation.alliance = None;
                changes.push(TreatyChange::Broken {
                    pair,
                    kind: TreatyKind::Alliance,
                });
            }
            if relation.trade.is_some() && relation.score < config.trade_break_score {
                relation.trade = None;
                changes.push(TreatyChange::Broken {
                    pair,
                    kind: TreatyKind::Trade,
                });
            }

            relation.settle_status();
        }

        changes
    }

    /// Diplomatic standing of one nation
    pub fn standing(&self, id: NationId) -> Standing {
        let mut standing = Standing::default();
        for relation in self.relations_of(id) {
            tally(&mut standing, relation, id);
        }
        standing
    }

    /// Standing of every nation, in id order
    pub fn standings(&self) -> BTreeMap<NationId, Standing> {
        let mut all: BTreeMap<NationId, Standing> =
            self.nations.iter().map(|&id| (id, Standing::default())).collect();
        for relation in &self.relations {
            for id in [relation.pair.low, relation.pair.high] {
                if let Some(standing) = all.get_mut(&id) {
                    tally(standing, relation, id);
                }
            }
        }
        all
    }

    pub fn active_wars(&self) -> usize {
        self.relations.iter().filter(|r| r.at_war).count()
    }

    pub fn active_alliances(&self) -> usize {
        self.relations.iter().filter(|r| r.is_allied()).count()
    }

    pub fn active_trade_deals(&self) -> usize {
        self.relations.iter().filter(|r| r.has_trade()).count()
    }
}

fn tally(standing: &mut Standing, relation: &Relationship, id: NationId) {
    standing.wars += relation.at_war as u32;
    standing.allies += relation.is_allied() as u32;
    standing.trade_partners += relation.has_trade() as u32;
    standing.sanctioned_by += relation.is_sanctioned_by_partner(id) as u32;
}

fn precondition(
    relation: &Relationship,
    actor: &Nation,
    target: &Nation,
    action: DiplomaticAction,
    config: &DiplomacyConfig,
) -> std::result::Result<(), IntentRejection> {
    let too_low = |required: f64| {
        if relation.score < required {
            Err(IntentRejection::RelationsTooLow {
                required,
                actual: relation.score,
            })
        } else {
            Ok(())
        }
    };

    match action {
        DiplomaticAction::ImproveRelations => {
            if relation.at_war {
                return Err(IntentRejection::Hostile);
            }
        }
        DiplomaticAction::TradeDeal => {
            if relation.at_war || relation.is_sanctioned() {
                return Err(IntentRejection::Hostile);
            }
            if relation.has_trade() {
                return Err(IntentRejection::TradeDealActive);
            }
            too_low(config.trade_min_score)?;
        }
        DiplomaticAction::Alliance => {
            if relation.at_war || relation.is_sanctioned() {
                return Err(IntentRejection::Hostile);
            }
            if relation.is_allied() {
                return Err(IntentRejection::AllianceActive);
            }
            too_low(config.alliance_min_score)?;
        }
        DiplomaticAction::DeclareWar => {
            if relation.at_war {
                return Err(IntentRejection::AlreadyAtWar);
            }
            if relation.is_allied() {
                return Err(IntentRejection::TargetIsAlly);
            }
            if relation.peace.is_some() {
                return Err(IntentRejection::TruceActive);
            }
        }
        DiplomaticAction::PeaceTreaty => {
            if !relation.at_war {
                return Err(IntentRejection::NotAtWar);
            }
        }
        DiplomaticAction::Sanctions => {
            if relation.at_war {
                return Err(IntentRejection::AlreadyAtWar);
            }
            if relation.is_allied() {
                return Err(IntentRejection::TargetIsAlly);
            }
            if relation.is_sanctioned() {
                return Err(IntentRejection::AlreadySanctioned);
            }
        }
        DiplomaticAction::ForeignAid => {
            if relation.at_war {
                return Err(IntentRejection::Hostile);
            }
            if actor.economy.gdp < target.economy.gdp * config.aid_gdp_ratio {
                return Err(IntentRejection::InsufficientGdp);
            }
        }
    }

    Ok(())
}
