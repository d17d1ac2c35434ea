//! Event system
//!
//! Each tick, every eligible (template, nation) pair gets one Bernoulli
//! trial. Fired events mutate the target directly and leave a line in the
//! bounded world log.

pub mod catalog;
pub mod log;
pub mod system;
pub mod template;

pub use catalog::EventCatalog;
pub use log::{EventLog, LogEntry, LogKind};
pub use system::EventSystem;
pub use template::{
    Condition, Effect, EventCategory, EventInstance, EventTemplate, NationField, StatusOverride,
};
