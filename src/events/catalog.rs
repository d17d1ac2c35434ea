//! Catalog of event templates
//!
//! Registration order is firing order, so a catalog is a `Vec`, not a map.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::ResourceKind;
use crate::events::template::{
    Condition, Effect, EventCategory, EventTemplate, NationField, StatusOverride,
};
use crate::nation::government::GovernmentType;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
    templates: Vec<EventTemplate>,
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    events: Vec<EventTemplate>,
}

fn add(field: NationField, amount: f64) -> Effect {
    Effect::Additive { field, amount }
}

fn scale(field: NationField, factor: f64) -> Effect {
    Effect::Multiplicative { field, factor }
}

fn template(
    id: &str,
    name: &str,
    category: EventCategory,
    probability: f64,
    condition: Condition,
    effects: Vec<Effect>,
) -> EventTemplate {
    EventTemplate {
        id: id.into(),
        name: name.into(),
        category,
        probability,
        condition,
        effects,
    }
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in economic, political, social and natural events
    pub fn standard() -> Self {
        use EventCategory::*;
        use NationField::*;

        let mut catalog = Self::new();

        // Economic
        catalog.add(template(
            "economic_boom",
            "Economic Boom",
            Economic,
            0.005,
            Condition::Always,
            vec![scale(Gdp, 1.03), add(Unemployment, -0.01), add(Happiness, 3.0)],
        ));
        catalog.add(template(
            "recession",
            "Recession",
            Economic,
            0.005,
            Condition::Always,
            vec![
                scale(Gdp, 0.97),
                add(Unemployment, 0.02),
                add(Happiness, -4.0),
                add(Approval, -3.0),
            ],
        ));
        catalog.add(template(
            "market_crash",
            "Market Crash",
            Economic,
            0.01,
            Condition::InDebt,
            vec![scale(Gdp, 0.92), add(Unemployment, 0.04), add(Approval, -8.0)],
        ));
        catalog.add(template(
            "tech_breakthrough",
            "Technological Breakthrough",
            Economic,
            0.004,
            Condition::EducationAtLeast { value: 50.0 },
            vec![scale(Gdp, 1.04), add(Resource(ResourceKind::Technology), 0.2)],
        ));
        catalog.add(template(
            "resource_discovery",
            "Resource Discovery",
            Economic,
            0.003,
            Condition::Always,
            vec![add(Resource(ResourceKind::Minerals), 0.3), scale(Gdp, 1.02)],
        ));

        // Political
        catalog.add(template(
            "corruption_scandal",
            "Corruption Scandal",
            Political,
            0.006,
            Condition::CorruptionAbove { value: 40.0 },
            vec![
                add(Approval, -10.0),
                add(Corruption, 5.0),
                scale(RulingSupport, 0.9),
                add(Happiness, -2.0),
            ],
        ));
        catalog.add(template(
            "reform_movement",
            "Reform Movement",
            Political,
            0.004,
            Condition::CorruptionAbove { value: 30.0 },
            vec![add(Corruption, -8.0), add(Approval, 4.0)],
        ));
        catalog.add(template(
            "mass_protests",
            "Mass Protests",
            Political,
            0.02,
            Condition::ProtestRiskAbove { value: 0.6 },
            vec![add(Approval, -6.0), add(Happiness, -2.0), scale(Gdp, 0.99)],
        ));
        catalog.add(template(
            "military_coup",
            "Military Coup",
            Political,
            0.02,
            Condition::All {
                conditions: vec![
                    Condition::StabilityBelow { value: 20.0 },
                    Condition::Not {
                        condition: Box::new(Condition::GovernmentIs {
                            government: GovernmentType::Dictatorship,
                        }),
                    },
                ],
            },
            vec![
                Effect::Override {
                    status: StatusOverride::SetGovernment(GovernmentType::Dictatorship),
                },
                add(Approval, -10.0),
                add(Corruption, 10.0),
            ],
        ));
        catalog.add(template(
            "ceasefire",
            "Ceasefire",
            Political,
            0.02,
            Condition::AtWar,
            vec![
                Effect::Override {
                    status: StatusOverride::EndWar,
                },
                add(Happiness, 5.0),
            ],
        ));

        // Social
        catalog.add(template(
            "epidemic",
            "Epidemic",
            Social,
            0.003,
            Condition::Always,
            vec![add(Health, -8.0), scale(Population, 0.995), add(Happiness, -3.0)],
        ));
        catalog.add(template(
            "baby_boom",
            "Baby Boom",
            Social,
            0.003,
            Condition::HappinessAbove { value: 55.0 },
            vec![scale(Population, 1.01)],
        ));
        catalog.add(template(
            "brain_drain",
            "Brain Drain",
            Social,
            0.004,
            Condition::All {
                conditions: vec![
                    Condition::HappinessBelow { value: 45.0 },
                    Condition::EducationAtLeast { value: 40.0 },
                ],
            },
            vec![add(Education, -4.0), scale(Population, 0.998), scale(Gdp, 0.99)],
        ));
        catalog.add(template(
            "immigration_wave",
            "Immigration Wave",
            Social,
            0.004,
            Condition::All {
                conditions: vec![Condition::HappinessAbove { value: 60.0 }, Condition::AtPeace],
            },
            vec![scale(Population, 1.01), add(Unemployment, 0.01)],
        ));

        // Natural
        catalog.add(template(
            "natural_disaster",
            "Natural Disaster",
            Natural,
            0.004,
            Condition::Always,
            vec![
                scale(Gdp, 0.97),
                add(Health, -3.0),
                add(Happiness, -4.0),
                scale(Population, 0.999),
            ],
        ));
        catalog.add(template(
            "bountiful_harvest",
            "Bountiful Harvest",
            Natural,
            0.004,
            Condition::Always,
            vec![
                add(Resource(ResourceKind::Agriculture), 0.2),
                add(Happiness, 3.0),
                scale(Gdp, 1.01),
            ],
        ));

        catalog
    }

    /// Append a template; a template with an existing id replaces it in place
    pub fn add(&mut self, template: EventTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, id: &str) -> Option<&EventTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn all(&self) -> &[EventTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load templates from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse templates from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlCatalog = toml::from_str(content)?;

        let mut catalog = Self::new();
        for template in data.events {
            if !(0.0..=1.0).contains(&template.probability) {
                return Err(SimError::Config(format!(
                    "event '{}' has probability {} outside [0, 1]",
                    template.id, template.probability
                )));
            }
            catalog.add(template);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_covers_categories() {
        let catalog = EventCatalog::standard();
        for category in [
            EventCategory::Economic,
            EventCategory::Political,
            EventCategory::Social,
            EventCategory::Natural,
        ] {
            assert!(catalog.all().iter().any(|t| t.category == category));
        }
        for template in catalog.all() {
            assert!(template.probability > 0.0 && template.probability <= 0.02);
            assert!(!template.effects.is_empty());
        }
        assert!(catalog.get("ceasefire").is_some());
    }

    #[test]
    fn test_scandal_worsens_corruption_and_hurts_rulers() {
        let catalog = EventCatalog::standard();
        let scandal = catalog.get("corruption_scandal").unwrap();
        assert!(scandal.effects.contains(&Effect::Additive {
            field: NationField::Corruption,
            amount: 5.0
        }));
        assert!(scandal.effects.iter().any(|e| matches!(
            e,
            Effect::Multiplicative { field: NationField::RulingSupport, factor } if *factor < 1.0
        )));
        assert!(scandal.effects.iter().all(|e| !matches!(
            e,
            Effect::Additive { field: NationField::Approval, amount } if *amount > 0.0
        )));
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut catalog = EventCatalog::standard();
        let len = catalog.len();
        let mut boom = catalog.get("economic_boom").cloned().unwrap();
        boom.probability = 0.5;
        catalog.add(boom);

        assert_eq!(catalog.len(), len);
        assert_eq!(catalog.all()[0].probability, 0.5);
    }

    #[test]
    fn test_catalog_toml_parsing() {
        let toml_content = r#"
[[events]]
id = "gold_rush"
name = "Gold Rush"
category = "Economic"
probability = 0.01

[events.condition]
type = "HappinessAbove"
value = 40.0

[[events.effects]]
type = "Multiplicative"
field = "Gdp"
factor = 1.05

[[events.effects]]
type = "Additive"
field = { Resource = "Minerals" }
amount = 0.1

[[events]]
id = "strike"
name = "General Strike"
category = "Political"
probability = 0.002

[[events.effects]]
type = "Additive"
field = "Approval"
amount = -5.0
"#;

        let catalog = EventCatalog::parse_toml(toml_content).expect("Failed to parse TOML");
        assert_eq!(catalog.len(), 2);

        let gold = catalog.get("gold_rush").expect("Should have gold_rush");
        assert_eq!(gold.condition, Condition::HappinessAbove { value: 40.0 });
        assert_eq!(
            gold.effects[1],
            Effect::Additive {
                field: NationField::Resource(ResourceKind::Minerals),
                amount: 0.1
            }
        );

        let strike = catalog.get("strike").expect("Should have strike");
        assert_eq!(strike.condition, Condition::Always);
    }

    #[test]
    fn test_catalog_toml_rejects_bad_probability() {
        let toml_content = r#"
[[events]]
id = "bad"
name = "Bad"
category = "Natural"
probability = 3.0
effects = []
"#;
        assert!(EventCatalog::parse_toml(toml_content).is_err());
    }
}
