//! Government types, their fixed coefficients, and enacted laws
//!
//! Each government type maps to one row of a static coefficient table, so
//! type-specific behaviour is data rather than dispatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GovernmentType {
    Democracy = 0,
    Monarchy = 1,
    Dictatorship = 2,
    Republic = 3,
}

/// Fixed per-type coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GovernmentCoefficients {
    /// 0-1; higher keeps corruption lower
    pub corruption_resistance: f64,
    /// Added to stability (scaled by 50)
    pub stability_bonus: f64,
    /// Multiplier on GDP growth
    pub growth_modifier: f64,
    /// Ticks between elections; `None` for non-elective governments
    pub election_cadence: Option<u32>,
}

const COEFFICIENTS: [GovernmentCoefficients; 4] = [
    // Democracy: elections every 4 years
    GovernmentCoefficients {
        corruption_resistance: 0.8,
        stability_bonus: 0.1,
        growth_modifier: 1.0,
        election_cadence: Some(48),
    },
    // Monarchy
    GovernmentCoefficients {
        corruption_resistance: 0.5,
        stability_bonus: 0.2,
        growth_modifier: 0.9,
        election_cadence: None,
    },
    // Dictatorship
    GovernmentCoefficients {
        corruption_resistance: 0.3,
        stability_bonus: -0.1,
        growth_modifier: 1.1,
        election_cadence: None,
    },
    // Republic: elections every 6 years
    GovernmentCoefficients {
        corruption_resistance: 0.7,
        stability_bonus: 0.05,
        growth_modifier: 1.05,
        election_cadence: Some(72),
    },
];

impl GovernmentType {
    pub const ALL: [GovernmentType; 4] = [
        GovernmentType::Democracy,
        GovernmentType::Monarchy,
        GovernmentType::Dictatorship,
        GovernmentType::Republic,
    ];

    pub fn coefficients(self) -> &'static GovernmentCoefficients {
        &COEFFICIENTS[self as usize]
    }

    pub fn holds_elections(self) -> bool {
        self.coefficients().election_cadence.is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            GovernmentType::Democracy => "Democracy",
            GovernmentType::Monarchy => "Monarchy",
            GovernmentType::Dictatorship => "Dictatorship",
            GovernmentType::Republic => "Republic",
        }
    }
}

impl GovernmentCoefficients {
    /// Highest corruption level this government type tolerates
    pub fn corruption_ceiling(&self) -> f64 {
        (100.0 * (1.0 - self.corruption_resistance) + 20.0).min(100.0)
    }
}

/// Policy flags a government can enact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Law {
    FreedomOfPress,
    UniversalHealthcare,
    MandatoryEducation,
    DeathPenalty,
    GunControl,
    EnvironmentalProtection,
}

/// Aggregated effect of the enacted law set
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LawModifiers {
    pub gdp_growth: f64,
    pub health_target: f64,
    pub education_target: f64,
    pub corruption_drift: f64,
    pub happiness: f64,
    pub stability: f64,
}

impl Law {
    pub const ALL: [Law; 6] = [
        Law::FreedomOfPress,
        Law::UniversalHealthcare,
        Law::MandatoryEducation,
        Law::DeathPenalty,
        Law::GunControl,
        Law::EnvironmentalProtection,
    ];

    pub fn modifiers(self) -> LawModifiers {
        let none = LawModifiers::default();
        match self {
            Law::FreedomOfPress => LawModifiers {
                corruption_drift: -0.03,
                happiness: 1.0,
                ..none
            },
            Law::UniversalHealthcare => LawModifiers {
                health_target: 6.0,
                happiness: 2.0,
                ..none
            },
            Law::MandatoryEducation => LawModifiers {
                education_target: 6.0,
                ..none
            },
            Law::DeathPenalty => LawModifiers {
                happiness: -2.0,
                stability: 3.0,
                ..none
            },
            Law::GunControl => LawModifiers {
                stability: 1.5,
                ..none
            },
            Law::EnvironmentalProtection => LawModifiers {
                gdp_growth: -0.0002,
                health_target: 3.0,
                happiness: 1.0,
                ..none
            },
        }
    }
}

/// Sum the modifiers of every enacted law
pub fn law_modifiers(laws: &BTreeSet<Law>) -> LawModifiers {
    laws.iter().fold(LawModifiers::default(), |acc, law| {
        let m = law.modifiers();
        LawModifiers {
            gdp_growth: acc.gdp_growth + m.gdp_growth,
            health_target: acc.health_target + m.health_target,
            education_target: acc.education_target + m.education_target,
            corruption_drift: acc.corruption_drift + m.corruption_drift,
            happiness: acc.happiness + m.happiness,
            stability: acc.stability + m.stability,
        }
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Government {
    pub kind: GovernmentType,
    /// 0-100
    pub approval: f64,
    /// 0-100
    pub corruption: f64,
    pub laws: BTreeSet<Law>,
}

impl Government {
    pub fn new(kind: GovernmentType) -> Self {
        Self {
            kind,
            approval: 55.0,
            corruption: 20.0,
            laws: [Law::FreedomOfPress, Law::MandatoryEducation, Law::GunControl]
                .into_iter()
                .collect(),
        }
    }

    pub fn coefficients(&self) -> &'static GovernmentCoefficients {
        self.kind.coefficients()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_table_matches_types() {
        for kind in GovernmentType::ALL {
            let c = kind.coefficients();
            assert!((0.0..=1.0).contains(&c.corruption_resistance), "{:?}", kind);
            assert!(c.growth_modifier > 0.0);
            assert_eq!(kind.holds_elections(), c.election_cadence.is_some());
        }
        assert_eq!(GovernmentType::Democracy.coefficients().election_cadence, Some(48));
        assert_eq!(GovernmentType::Republic.coefficients().election_cadence, Some(72));
        assert!(!GovernmentType::Monarchy.holds_elections());
        assert!(!GovernmentType::Dictatorship.holds_elections());
    }

    #[test]
    fn test_corruption_ceiling_follows_resistance() {
        let democracy = GovernmentType::Democracy.coefficients().corruption_ceiling();
        let dictatorship = GovernmentType::Dictatorship.coefficients().corruption_ceiling();
        assert!(democracy < dictatorship);
        assert!(dictatorship <= 100.0);
    }

    #[test]
    fn test_law_modifiers_sum() {
        let laws: BTreeSet<Law> = [Law::UniversalHealthcare, Law::EnvironmentalProtection]
            .into_iter()
            .collect();
        let m = law_modifiers(&laws);
        assert!((m.health_target - 9.0).abs() < 1e-9);
        assert!((m.happiness - 3.0).abs() < 1e-9);
        assert!(m.gdp_growth < 0.0);
    }

    #[test]
    fn test_empty_law_set_is_neutral() {
        assert_eq!(law_modifiers(&BTreeSet::new()), LawModifiers::default());
    }
}
