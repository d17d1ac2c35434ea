//! Fixed personality weights of an AI-controlled nation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::clamp_unit;

/// Trait weights in [0, 1], set once at world generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitVector {
    /// Willingness to declare war and impose sanctions
    pub aggression: f64,
    /// Preference for trade over alliances
    pub economic_focus: f64,
    /// Reluctance to engage in diplomacy at all
    pub isolationism: f64,
}

impl Default for TraitVector {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            economic_focus: 0.5,
            isolationism: 0.5,
        }
    }
}

impl TraitVector {
    pub fn new(aggression: f64, economic_focus: f64, isolationism: f64) -> Self {
        Self {
            aggression: clamp_unit(aggression),
            economic_focus: clamp_unit(economic_focus),
            isolationism: clamp_unit(isolationism),
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::new(rng.gen(), rng.gen(), rng.gen())
    }

    pub fn is_peaceful(&self) -> bool {
        self.aggression < 0.3
    }

    pub fn is_militaristic(&self) -> bool {
        self.aggression > 0.7
    }

    /// Starting relation bias between two nations: shared pacifism helps,
    /// shared militarism hurts
    pub fn compatibility(&self, other: &TraitVector) -> f64 {
        let mut bias = 0.0;
        if self.is_peaceful() && other.is_peaceful() {
            bias += 10.0;
        }
        if self.is_militaristic() && other.is_militaristic() {
            bias -= 5.0;
        }
        bias
    }
}
