//! Diplomatic actions and their resolved outcomes

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::NationId;
use crate::diplomacy::relation::{NationPair, RelationStatus};
use crate::nation::advance::NationEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum DiplomaticAction {
    #[display(fmt = "improve relations")]
    ImproveRelations,
    #[display(fmt = "trade deal")]
    TradeDeal,
    #[display(fmt = "alliance")]
    Alliance,
    #[display(fmt = "declare war")]
    DeclareWar,
    #[display(fmt = "peace treaty")]
    PeaceTreaty,
    #[display(fmt = "sanctions")]
    Sanctions,
    #[display(fmt = "foreign aid")]
    ForeignAid,
}

impl DiplomaticAction {
    pub const ALL: [DiplomaticAction; 7] = [
        DiplomaticAction::ImproveRelations,
        DiplomaticAction::TradeDeal,
        DiplomaticAction::Alliance,
        DiplomaticAction::DeclareWar,
        DiplomaticAction::PeaceTreaty,
        DiplomaticAction::Sanctions,
        DiplomaticAction::ForeignAid,
    ];
}

/// Economic consequence for one nation, fed into its next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideEffect {
    pub nation: NationId,
    pub effect: NationEffect,
}

/// Result of a successfully applied action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub actor: NationId,
    pub target: NationId,
    pub action: DiplomaticAction,
    pub pair: NationPair,
    /// Score after the action
    pub score: f64,
    pub status: RelationStatus,
    pub side_effects: Vec<SideEffect>,
}
