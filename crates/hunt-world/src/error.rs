//! Error types for the `hunt-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use hunt_types::Position;

/// Errors that can occur while building or accessing the grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid must have at least one cell per side.
    #[error("grid size must be at least 1")]
    EmptyGrid,

    /// The number of supplied cells does not match `size * size`.
    #[error("grid of size {size} needs {expected} cells but {actual} were supplied")]
    CellCountMismatch {
        /// Cells per side.
        size: u32,
        /// Required number of cells.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// The grid is too large to address on this platform.
    #[error("grid size {0} is too large")]
    TooLarge(u32),

    /// A position outside the grid was accessed.
    #[error("position {position} is outside a grid of size {size}")]
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Cells per side.
        size: u32,
    },

    /// The generation layout is inconsistent.
    #[error("invalid grid layout: {reason}")]
    InvalidLayout {
        /// Description of the inconsistency.
        reason: String,
    },
}
