//! Shared mutable world state for the treasure hunt simulation.
//!
//! Exactly two resources are shared between concurrently exploring agents,
//! and both live here. Each owns its own lock so that agents contending on
//! the grid never serialize against agents reporting scores.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction and access.
//! - [`grid`] -- [`GridStore`], the N×N board with the guarded
//!   consume operation.
//! - [`layout`] -- [`GridLayout`] probability bands and value ranges used
//!   to generate a random board.
//! - [`outcome`] -- [`OutcomeState`], the running best score, winner, and
//!   remaining-treasure counter.

pub mod error;
pub mod grid;
pub mod layout;
pub mod outcome;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::GridStore;
pub use layout::{GridLayout, ValueRange};
pub use outcome::{Leader, OutcomeState};
