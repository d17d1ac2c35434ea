//! Intents: queued requests to change nation or relationship state
//!
//! Intents are validated when submitted and applied at the next tick
//! boundary. Diplomatic proposals are checked again at application, since
//! an earlier intent in the same tick may have changed the relationship.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::{IntentRejection, Result};
use crate::core::types::{NationId, Sector};
use crate::diplomacy::action::DiplomaticAction;
use crate::nation::government::{GovernmentType, Law};
use crate::simulation::world::World;

/// Floating tolerance when checking that budget shares do not exceed 1
const BUDGET_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
pub enum Intent {
    #[display(fmt = "set tax rate of {} to {:.2}", nation, rate)]
    SetTaxRate { nation: NationId, rate: f64 },

    /// Shares for the listed sectors; unlisted sectors keep their share
    #[display(fmt = "set budget of {}", nation)]
    SetBudgetShares {
        nation: NationId,
        shares: Vec<(Sector, f64)>,
    },

    #[display(fmt = "change government of {} to {:?}", nation, government)]
    ChangeGovernment {
        nation: NationId,
        government: GovernmentType,
    },

    #[display(fmt = "set {:?} = {} in {}", law, enacted, nation)]
    SetLaw {
        nation: NationId,
        law: Law,
        enacted: bool,
    },

    #[display(fmt = "{} proposes {} to {}", actor, action, target)]
    ProposeAction {
        actor: NationId,
        target: NationId,
        action: DiplomaticAction,
    },
}

impl Intent {
    /// The nation issuing the intent
    pub fn nation(&self) -> NationId {
        match self {
            Intent::SetTaxRate { nation, .. }
            | Intent::SetBudgetShares { nation, .. }
            | Intent::ChangeGovernment { nation, .. }
            | Intent::SetLaw { nation, .. } => *nation,
            Intent::ProposeAction { actor, .. } => *actor,
        }
    }

    /// Every nation the intent names
    pub fn participants(&self) -> Vec<NationId> {
        match self {
            Intent::ProposeAction { actor, target, .. } => vec![*actor, *target],
            other => vec![other.nation()],
        }
    }

    /// Check the intent against the current world.
    ///
    /// Unknown nation ids are an `UnknownNation` error; precondition
    /// violations are `Rejected` with a reason code.
    pub fn validate(&self, world: &World) -> Result<()> {
        match self {
            Intent::SetTaxRate { nation, rate } => {
                world.nation(*nation)?;
                if !rate.is_finite() || !(0.0..=1.0).contains(rate) {
                    return Err(IntentRejection::TaxRateOutOfRange(*rate).into());
                }
            }
            Intent::SetBudgetShares { nation, shares } => {
                let current = world.nation(*nation)?.economy.budget;
                let mut merged = current;
                for &(sector, share) in shares {
                    if !share.is_finite() || share < 0.0 {
                        return Err(IntentRejection::InvalidShare(share).into());
                    }
                    merged.set(sector, share);
                }
                let total = merged.total();
                if total > 1.0 + BUDGET_TOLERANCE {
                    return Err(IntentRejection::BudgetOverAllocated { total }.into());
                }
            }
            Intent::ChangeGovernment { nation, government } => {
                if world.nation(*nation)?.government.kind == *government {
                    return Err(IntentRejection::GovernmentUnchanged.into());
                }
            }
            Intent::SetLaw {
                nation,
                law,
                enacted,
            } => {
                let laws = &world.nation(*nation)?.government.laws;
                if laws.contains(law) == *enacted {
                    return Err(IntentRejection::LawUnchanged.into());
                }
            }
            Intent::ProposeAction {
                actor,
                target,
                action,
            } => {
                let actor = world.nation(*actor)?;
                let target = world.nation(*target)?;
                world
                    .graph
                    .check_action(actor, target, *action, &world.config.diplomacy)?;
            }
        }
        Ok(())
    }
}
