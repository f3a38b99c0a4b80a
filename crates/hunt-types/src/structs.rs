//! Core value structs: grid cells and positions.

use serde::{Deserialize, Serialize};

use crate::enums::{CellKind, Direction};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single grid cell.
///
/// `value` is a positive score for treasure, a negative penalty for a trap,
/// and zero for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Cell {
    /// What occupies the cell.
    pub kind: CellKind,
    /// Score delta applied to the visitor.
    pub value: i32,
}

impl Cell {
    /// An empty cell.
    pub const EMPTY: Self = Self {
        kind: CellKind::Empty,
        value: 0,
    };

    /// A treasure worth `value` points.
    pub const fn treasure(value: i32) -> Self {
        Self {
            kind: CellKind::Treasure,
            value,
        }
    }

    /// A trap costing `penalty` points. The stored value is negative.
    pub const fn trap(penalty: i32) -> Self {
        Self {
            kind: CellKind::Trap,
            value: -penalty.abs(),
        }
    }

    /// A resurrection stone.
    pub const fn resurrection() -> Self {
        Self {
            kind: CellKind::Resurrection,
            value: 0,
        }
    }

    /// A deadly trap.
    pub const fn deadly_trap() -> Self {
        Self {
            kind: CellKind::DeadlyTrap,
            value: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A grid coordinate. `x` is the row and `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index.
    pub x: u32,
    /// Column index.
    pub y: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The neighbor one step in `direction`, if it lies inside an
    /// `size`×`size` grid.
    pub fn step(self, direction: Direction, size: u32) -> Option<Self> {
        let (x, y) = match direction {
            Direction::Up => (self.x.checked_sub(1)?, self.y),
            Direction::Down => (self.x.checked_add(1)?, self.y),
            Direction::Left => (self.x, self.y.checked_sub(1)?),
            Direction::Right => (self.x, self.y.checked_add(1)?),
        };
        (x < size && y < size).then_some(Self { x, y })
    }

    /// Whether this position lies inside an `size`×`size` grid.
    pub const fn within(self, size: u32) -> bool {
        self.x < size && self.y < size
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
