//! Economy sub-record: taxes, budget, GDP, prices, treasury, resources

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{clamp_percent, clamp_unit, ResourceKind, Sector};

/// Budget allocation across spending sectors.
///
/// Shares are fractions of the government budget. They are kept
/// non-negative and their total never exceeds 1; any remainder is
/// unallocated (saved).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetShares {
    pub healthcare: f64,
    pub education: f64,
    pub military: f64,
    pub infrastructure: f64,
    pub welfare: f64,
}

impl BudgetShares {
    pub fn zero() -> Self {
        Self {
            healthcare: 0.0,
            education: 0.0,
            military: 0.0,
            infrastructure: 0.0,
            welfare: 0.0,
        }
    }

    pub fn get(&self, sector: Sector) -> f64 {
        match sector {
            Sector::Healthcare => self.healthcare,
            Sector::Education => self.education,
            Sector::Military => self.military,
            Sector::Infrastructure => self.infrastructure,
            Sector::Welfare => self.welfare,
        }
    }

    pub fn set(&mut self, sector: Sector, share: f64) {
        let slot = match sector {
            Sector::Healthcare => &mut self.healthcare,
            Sector::Education => &mut self.education,
            Sector::Military => &mut self.military,
            Sector::Infrastructure => &mut self.infrastructure,
            Sector::Welfare => &mut self.welfare,
        };
        *slot = share;
    }

    pub fn total(&self) -> f64 {
        Sector::ALL.iter().map(|&s| self.get(s)).sum()
    }

    /// Clamp each share to [0, 1] and scale all of them down proportionally
    /// if they over-allocate.
    pub fn normalize(&mut self) {
        for sector in Sector::ALL {
            self.set(sector, clamp_unit(self.get(sector)));
        }

        let total = self.total();
        if total > 1.0 {
            let scale = 1.0 / total;
            for sector in Sector::ALL {
                self.set(sector, self.get(sector) * scale);
            }
        }
    }

    /// Sector holding the largest share, excluding `except`
    pub fn largest_except(&self, except: Sector) -> Option<Sector> {
        let mut best: Option<(Sector, f64)> = None;
        for sector in Sector::ALL {
            if sector == except {
                continue;
            }
            let share = self.get(sector);
            if best.map_or(true, |(_, b)| share > b) {
                best = Some((sector, share));
            }
        }
        best.map(|(s, _)| s)
    }
}

impl Default for BudgetShares {
    fn default() -> Self {
        Self {
            healthcare: 0.15,
            education: 0.20,
            military: 0.10,
            infrastructure: 0.20,
            welfare: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    /// Fraction of GDP collected as tax, in [0, 1]
    pub tax_rate: f64,
    /// Annualised output
    pub gdp: f64,
    /// Fractional GDP change over the last tick
    pub gdp_growth: f64,
    pub budget: BudgetShares,
    pub inflation: f64,
    /// Unemployment as a fraction of the workforce
    pub unemployment: f64,
    /// Negative means the nation is in debt
    pub treasury: f64,
    pub trade_balance: f64,
    pub resources: BTreeMap<ResourceKind, f64>,
}

impl Economy {
    pub fn new(gdp: f64) -> Self {
        Self {
            tax_rate: 0.2,
            gdp,
            gdp_growth: 0.0,
            budget: BudgetShares::default(),
            inflation: 0.02,
            unemployment: 0.05,
            treasury: gdp * 0.05,
            trade_balance: 0.0,
            resources: ResourceKind::ALL.iter().map(|&r| (r, 0.5)).collect(),
        }
    }

    /// Annual tax revenue
    pub fn tax_revenue(&self) -> f64 {
        self.gdp * self.tax_rate
    }

    /// Annual spending for a budget sized at `budget_gdp_ratio` of GDP
    pub fn budget_outlay(&self, budget_gdp_ratio: f64) -> f64 {
        self.gdp * budget_gdp_ratio * self.budget.total()
    }

    pub fn debt(&self) -> f64 {
        (-self.treasury).max(0.0)
    }

    pub fn gdp_per_capita(&self, population: u64) -> f64 {
        if population == 0 {
            0.0
        } else {
            self.gdp / population as f64
        }
    }

    pub fn mean_abundance(&self) -> f64 {
        if self.resources.is_empty() {
            return 0.0;
        }
        self.resources.values().sum::<f64>() / self.resources.len() as f64
    }

    /// Spending power devoted to the military
    pub fn military_power(&self) -> f64 {
        self.gdp * self.budget.military
    }

    /// Overall economic health score (0-100)
    pub fn economic_health(&self) -> f64 {
        let growth_score = (self.gdp_growth * 12.0 * 500.0).clamp(-25.0, 25.0);
        let unemployment_penalty = self.unemployment * 100.0;

        let inflation_effect = if self.inflation < 0.02 {
            10.0
        } else if self.inflation < 0.05 {
            5.0
        } else {
            -self.inflation * 200.0
        };

        let debt_ratio = if self.gdp > 0.0 { self.debt() / self.gdp } else { 0.0 };
        let debt_penalty = (debt_ratio * 50.0).min(30.0);

        clamp_percent(60.0 + growth_score - unemployment_penalty + inflation_effect - debt_penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_scales_proportionally() {
        let mut shares = BudgetShares {
            healthcare: 0.5,
            education: 0.5,
            military: 0.5,
            infrastructure: 0.25,
            welfare: 0.25,
        };
        shares.normalize();

        assert!((shares.total() - 1.0).abs() < 1e-9);
        assert!((shares.healthcare - 0.25).abs() < 1e-9);
        assert!((shares.welfare - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_clamps_negative_and_nan() {
        let mut shares = BudgetShares::zero();
        shares.set(Sector::Military, -0.3);
        shares.set(Sector::Welfare, f64::NAN);
        shares.normalize();

        assert_eq!(shares.military, 0.0);
        assert_eq!(shares.welfare, 0.0);
    }

    #[test]
    fn test_underallocation_untouched() {
        let mut shares = BudgetShares::default();
        let before = shares;
        shares.normalize();
        assert_eq!(shares, before);
        assert!(shares.total() <= 1.0);
    }

    #[test]
    fn test_largest_except() {
        let shares = BudgetShares::default();
        // Education and infrastructure tie at 0.20; first in sector order wins
        assert_eq!(shares.largest_except(Sector::Healthcare), Some(Sector::Education));
        assert_eq!(shares.largest_except(Sector::Education), Some(Sector::Infrastructure));
    }

    #[test]
    fn test_economic_health_penalises_debt() {
        let mut economy = Economy::new(1_000_000.0);
        let healthy = economy.economic_health();
        economy.treasury = -2_000_000.0;
        assert!(economy.economic_health() < healthy);
    }
}
