pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, Date};
pub use config::SimConfig;
pub use error::{IntentRejection, Result, SimError};
pub use types::{ColorTag, NationId, ResourceKind, Sector, Tick};
