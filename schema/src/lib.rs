// Pokedex Schema - Canonical data model
// This crate contains the normalized shapes produced by the catalog resolver and
// consumed by presentation layers. It performs no I/O, so consumers can depend on
// it without pulling in the async runtime or the HTTP stack.

// Re-export the main types
pub use entity::*;
pub use evolution::*;
pub use moves::*;
pub use resources::*;

pub mod entity;
pub mod evolution;
pub mod moves;
pub mod resources;
