//! World container, generation and the tick driver

pub mod clock;
pub mod engine;
pub mod generation;
pub mod intent;
pub mod snapshot;
pub mod world;

pub use clock::{Clock, ClockState};
pub use engine::{Simulation, TickReport};
pub use generation::generate_world;
pub use intent::Intent;
pub use snapshot::Snapshot;
pub use world::{World, WorldStatistics};
