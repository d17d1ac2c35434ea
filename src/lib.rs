//! Nation Sim - deterministic, tick-based simulation of competing nations
//!
//! Economies, populations, governments and parties advance once per tick;
//! a relationship graph tracks diplomacy between every pair of nations;
//! random events and AI-controlled nations perturb the world. All
//! randomness comes from one seeded source owned by the [`World`].

pub mod ai;
pub mod core;
pub mod diplomacy;
pub mod events;
pub mod nation;
pub mod simulation;

pub use crate::core::{Result, SimConfig, SimError};
pub use crate::simulation::{Intent, Simulation, Snapshot, TickReport, World};
