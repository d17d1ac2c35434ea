//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Simulation tick counter (one tick = one month)
pub type Tick = u64;

/// Unique identifier for nations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display(fmt = "nation#{}", _0)]
pub struct NationId(pub u32);

impl NationId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Display colour handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorTag(pub [u8; 3]);

/// Government spending sectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Healthcare,
    Education,
    Military,
    Infrastructure,
    Welfare,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Healthcare,
        Sector::Education,
        Sector::Military,
        Sector::Infrastructure,
        Sector::Welfare,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sector::Healthcare => "healthcare",
            Sector::Education => "education",
            Sector::Military => "military",
            Sector::Infrastructure => "infrastructure",
            Sector::Welfare => "welfare",
        }
    }
}

/// Natural resource categories in a nation's endowment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Oil,
    Minerals,
    Agriculture,
    Technology,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Oil,
        ResourceKind::Minerals,
        ResourceKind::Agriculture,
        ResourceKind::Technology,
    ];
}

/// Clamp to [0, 100], mapping NaN to the lower bound
pub fn clamp_percent(value: f64) -> f64 {
    clamp_range(value, 0.0, 100.0)
}

/// Clamp to [0, 1], mapping NaN to the lower bound
pub fn clamp_unit(value: f64) -> f64 {
    clamp_range(value, 0.0, 1.0)
}

/// Clamp to [min, max]; NaN collapses to `min` so drift can never poison state
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Move `current` a fraction `rate` of the way toward `target`
pub fn approach(current: f64, target: f64, rate: f64) -> f64 {
    current + (target - current) * rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nation_id_ordering() {
        assert!(NationId(1) < NationId(2));
        assert_eq!(NationId::new(3), NationId(3));
        assert_eq!(NationId(7).index(), 7);
    }

    #[test]
    fn test_nation_id_display() {
        assert_eq!(NationId(4).to_string(), "nation#4");
    }

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(clamp_percent(f64::NAN), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_range(f64::INFINITY, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_approach_moves_fractionally() {
        assert_eq!(approach(0.0, 10.0, 0.5), 5.0);
        assert_eq!(approach(10.0, 0.0, 0.1), 9.0);
    }
}
