//! Shared type definitions for the treasure hunt simulation.
//!
//! Every crate in the workspace speaks in these types: the grid store hands
//! out [`Cell`]s, agents move between [`Position`]s, and results name agents
//! by [`AgentId`].
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes for agents and simulation runs
//! - [`enums`] -- Cell kinds, movement directions, and termination reasons
//! - [`structs`] -- Grid cells and positions

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellKind, Direction, TerminationReason};
pub use ids::{AgentId, RunId};
pub use structs::{Cell, Position};
