//! Relationship graph and diplomatic action resolution

pub mod action;
pub mod graph;
pub mod relation;

pub use action::{ActionOutcome, DiplomaticAction, SideEffect};
pub use graph::{RelationshipGraph, TreatyChange};
pub use relation::{NationPair, RelationStatus, Relationship, Sanction, Treaty, TreatyKind};
