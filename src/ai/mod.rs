//! AI decision engine for non-player nations

pub mod decide;
pub mod traits;

pub use decide::{decide, WorldView};
pub use traits::TraitVector;
