//! Pairwise relationship record

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_range, NationId};

pub const MIN_SCORE: f64 = -100.0;
pub const MAX_SCORE: f64 = 100.0;

/// Unordered pair of nations, stored low id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NationPair {
    pub low: NationId,
    pub high: NationId,
}

impl NationPair {
    /// `None` for a nation paired with itself
    pub fn new(a: NationId, b: NationId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn contains(&self, id: NationId) -> bool {
        self.low == id || self.high == id
    }

    /// The partner of `id` in this pair
    pub fn other(&self, id: NationId) -> Option<NationId> {
        if self.low == id {
            Some(self.high)
        } else if self.high == id {
            Some(self.low)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum RelationStatus {
    #[display(fmt = "neutral")]
    Neutral,
    #[display(fmt = "trade partner")]
    TradePartner,
    #[display(fmt = "allied")]
    Allied,
    #[display(fmt = "at war")]
    AtWar,
    #[display(fmt = "sanctioned")]
    Sanctioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TreatyKind {
    #[display(fmt = "alliance")]
    Alliance,
    #[display(fmt = "peace treaty")]
    Peace,
    #[display(fmt = "trade deal")]
    Trade,
}

/// An active treaty; `remaining` is `None` for open-ended treaties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treaty {
    pub remaining: Option<u32>,
}

impl Treaty {
    pub fn new(duration: Option<u32>) -> Self {
        Self { remaining: duration }
    }

    /// Count down one tick; true when the treaty has just run out
    pub fn tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(left) => {
                *left = left.saturating_sub(1);
                *left == 0
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanction {
    pub imposer: NationId,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub pair: NationPair,
    /// -100..100
    pub score: f64,
    pub status: RelationStatus,
    pub at_war: bool,
    pub alliance: Option<Treaty>,
    /// Truce following a peace treaty; blocks a new war while active
    pub peace: Option<Treaty>,
    pub trade: Option<Treaty>,
    pub sanction: Option<Sanction>,
}

impl Relationship {
    pub fn new(pair: NationPair, score: f64) -> Self {
        Self {
            pair,
            score: clamp_range(score, MIN_SCORE, MAX_SCORE),
            status: RelationStatus::Neutral,
            at_war: false,
            alliance: None,
            peace: None,
            trade: None,
            sanction: None,
        }
    }

    pub fn adjust_score(&mut self, delta: f64) {
        self.score = clamp_range(self.score + delta, MIN_SCORE, MAX_SCORE);
    }

    pub fn is_allied(&self) -> bool {
        self.alliance.is_some()
    }

    pub fn has_trade(&self) -> bool {
        self.trade.is_some()
    }

    pub fn is_sanctioned(&self) -> bool {
        self.sanction.is_some()
    }

    /// Whether `id` is the sanctioned party of this pair
    pub fn is_sanctioned_by_partner(&self, id: NationId) -> bool {
        self.sanction
            .map_or(false, |s| self.pair.contains(id) && s.imposer != id)
    }

    /// Recompute the status from the active flags. War dominates, then
    /// alliance, sanctions and trade; a pair with nothing active is neutral.
    pub fn settle_status(&mut self) {
        self.status = if self.at_war {
            RelationStatus::AtWar
        } else if self.alliance.is_some() {
            RelationStatus::Allied
        } else if self.sanction.is_some() {
            RelationStatus::Sanctioned
        } else if self.trade.is_some() {
            RelationStatus::TradePartner
        } else {
            RelationStatus::Neutral
        };
    }
}
