//! Population sub-record

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub size: u64,
    /// 0-100
    pub happiness: f64,
    /// 0-100
    pub health: f64,
    /// 0-100
    pub education: f64,
    /// Fractional change per tick; negative means shrinking
    pub growth_rate: f64,
}

impl Population {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            happiness: 50.0,
            health: 70.0,
            education: 60.0,
            growth_rate: 0.001,
        }
    }

    /// Set the head count from a fractional value, rounded and held
    /// within `[0, max]`
    pub fn set_size(&mut self, value: f64, max: u64) {
        let size = value.round();
        self.size = if !size.is_finite() || size <= 0.0 {
            0
        } else if size >= max as f64 {
            max
        } else {
            size as u64
        };
    }

    /// Likelihood of street protests (0-1), driven by discontent
    pub fn protest_risk(&self) -> f64 {
        ((100.0 - self.happiness) / 100.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protest_risk_tracks_happiness() {
        let mut population = Population::new(1000);
        population.happiness = 90.0;
        let calm = population.protest_risk();
        population.happiness = 10.0;
        assert!(population.protest_risk() > calm);
        assert!((population.protest_risk() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_set_size_bounded() {
        let mut population = Population::new(1000);
        population.set_size(1234.6, 10_000);
        assert_eq!(population.size, 1235);
        population.set_size(-5.0, 10_000);
        assert_eq!(population.size, 0);
        population.set_size(f64::MAX, 10_000);
        assert_eq!(population.size, 10_000);
        population.set_size(f64::NAN, 10_000);
        assert_eq!(population.size, 0);
    }
}
