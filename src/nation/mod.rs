//! Nation model
//!
//! A nation is a plain record of economy, population, government and
//! politics, advanced one tick at a time by a pure function of its own
//! state, its intents and its diplomatic standing.

pub mod advance;
pub mod economy;
pub mod government;
pub mod model;
pub mod politics;
pub mod population;

pub use advance::{advance, refresh_derived, AdvanceReport, NationEffect, NationIntents};
pub use economy::{BudgetShares, Economy};
pub use government::{law_modifiers, Government, GovernmentCoefficients, GovernmentType, Law, LawModifiers};
pub use model::{Nation, NationStatus, Standing};
pub use politics::{default_parties, ElectionResult, Ideology, Party, Politics};
pub use population::Population;
