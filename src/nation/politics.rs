//! Parties, elections and the stability score

use serde::{Deserialize, Serialize};

use crate::core::config::PoliticsConfig;
use crate::nation::economy::Economy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ideology {
    Left,
    Center,
    Right,
}

impl Ideology {
    /// How well current policy matches this ideology (0-1)
    pub fn fit(self, economy: &Economy) -> f64 {
        let left = ((economy.budget.welfare + economy.budget.healthcare) / 0.4).clamp(0.0, 1.0);
        let right = (0.5 * (economy.budget.military / 0.2)
            + 0.5 * ((0.3 - economy.tax_rate) / 0.3))
            .clamp(0.0, 1.0);

        match self {
            Ideology::Left => left,
            Ideology::Right => right,
            Ideology::Center => 1.0 - (left - right).abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub ideology: Ideology,
    /// Share of public support; all parties sum to 1
    pub popularity: f64,
}

/// Outcome of an election
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub winner: String,
    pub previous: String,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Politics {
    pub parties: Vec<Party>,
    /// Index into `parties`
    pub ruling_party: usize,
    pub ticks_in_power: u64,
    /// Ticks until the next election; `None` when the government holds none
    pub election_countdown: Option<u32>,
    /// 0-100, derived each tick
    pub stability: f64,
}

pub fn default_parties() -> Vec<Party> {
    [
        ("Progressive Party", Ideology::Left, 0.25),
        ("Conservative Party", Ideology::Right, 0.25),
        ("Centrist Alliance", Ideology::Center, 0.30),
        ("Nationalist Party", Ideology::Right, 0.20),
    ]
    .into_iter()
    .map(|(name, ideology, popularity)| Party {
        name: name.to_string(),
        ideology,
        popularity,
    })
    .collect()
}

impl Politics {
    pub fn new(parties: Vec<Party>, election_countdown: Option<u32>) -> Self {
        let mut politics = Self {
            parties,
            ruling_party: 0,
            ticks_in_power: 0,
            election_countdown,
            stability: 60.0,
        };
        politics.normalize_popularity();
        politics.ruling_party = politics.most_popular();
        politics
    }

    pub fn ruling(&self) -> Option<&Party> {
        self.parties.get(self.ruling_party)
    }

    pub fn popularity_total(&self) -> f64 {
        self.parties.iter().map(|p| p.popularity).sum()
    }

    /// Rescale popularity so shares sum to 1. Negative or non-finite shares
    /// are zeroed; if nothing is left, support is split evenly.
    pub fn normalize_popularity(&mut self) {
        if self.parties.is_empty() {
            return;
        }

        for party in &mut self.parties {
            if !party.popularity.is_finite() || party.popularity < 0.0 {
                party.popularity = 0.0;
            }
        }

        let total = self.popularity_total();
        let count = self.parties.len() as f64;
        for party in &mut self.parties {
            party.popularity = if total > 0.0 {
                party.popularity / total
            } else {
                1.0 / count
            };
        }
    }

    /// Index of the most popular party; ties go to the lower index
    pub fn most_popular(&self) -> usize {
        let mut best = 0;
        for (i, party) in self.parties.iter().enumerate() {
            if party.popularity > self.parties[best].popularity {
                best = i;
            }
        }
        best
    }

    /// Ruling party gains or loses support with government approval; the
    /// opposition picks up what it loses.
    pub fn drift_popularity(&mut self, approval: f64, config: &PoliticsConfig) {
        if self.parties.is_empty() {
            return;
        }

        let change = (approval - 50.0) * config.party_drift;
        let ruling = self.ruling_party;
        self.parties[ruling].popularity += change;

        if change < 0.0 {
            let share = change.abs() / self.parties.len() as f64;
            for (i, party) in self.parties.iter_mut().enumerate() {
                if i != ruling {
                    party.popularity += share;
                }
            }
        }

        self.normalize_popularity();
    }

    /// Run an election: shares shift toward parties whose ideology fits the
    /// current policy mix, the incumbent is judged on approval, and the most
    /// popular party takes power.
    pub fn hold_election(
        &mut self,
        approval: f64,
        economy: &Economy,
        config: &PoliticsConfig,
    ) -> Option<ElectionResult> {
        if self.parties.is_empty() {
            return None;
        }

        let previous = self.ruling_party;
        self.parties[previous].popularity += (approval - 50.0) / 50.0 * config.ideology_weight * 0.5;

        for party in &mut self.parties {
            party.popularity += party.ideology.fit(economy) * config.ideology_weight;
        }
        self.normalize_popularity();

        let winner = self.most_popular();
        let changed = winner != previous;
        if changed {
            self.ruling_party = winner;
            self.ticks_in_power = 0;
        }

        Some(ElectionResult {
            winner: self.parties[winner].name.clone(),
            previous: self.parties[previous].name.clone(),
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn politics() -> Politics {
        Politics::new(default_parties(), Some(48))
    }

    #[test]
    fn test_new_picks_most_popular() {
        let p = politics();
        assert_eq!(p.ruling().map(|r| r.name.as_str()), Some("Centrist Alliance"));
        assert!((p.popularity_total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_drift_keeps_shares_normalised() {
        let mut p = politics();
        let config = PoliticsConfig::default();
        for _ in 0..500 {
            p.drift_popularity(5.0, &config);
        }
        assert!((p.popularity_total() - 1.0).abs() < 1e-9);
        assert!(p.parties.iter().all(|party| party.popularity >= 0.0));
    }

    #[test]
    fn test_unpopular_incumbent_loses_share() {
        let mut p = politics();
        let before = p.parties[p.ruling_party].popularity;
        p.drift_popularity(10.0, &PoliticsConfig::default());
        assert!(p.parties[p.ruling_party].popularity < before);
    }

    #[test]
    fn test_normalize_recovers_from_zero_total() {
        let mut p = politics();
        for party in &mut p.parties {
            party.popularity = 0.0;
        }
        p.normalize_popularity();
        assert!((p.parties[0].popularity - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_election_can_change_ruling_party() {
        let mut p = politics();
        let mut economy = Economy::new(1.0e6);
        // Heavy welfare state strongly favours the left
        economy.budget.welfare = 0.4;
        economy.budget.healthcare = 0.4;
        economy.budget.military = 0.0;
        economy.tax_rate = 0.45;

        let config = PoliticsConfig {
            ideology_weight: 1.0,
            ..PoliticsConfig::default()
        };
        let result = p.hold_election(10.0, &economy, &config).unwrap();

        assert!(result.changed);
        assert_eq!(result.winner, "Progressive Party");
        assert_eq!(p.ticks_in_power, 0);
        assert!((p.popularity_total() - 1.0).abs() < 1e-9);
    }
}
