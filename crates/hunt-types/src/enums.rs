//! Enumeration types for the treasure hunt simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell kinds
// ---------------------------------------------------------------------------

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellKind {
    /// Nothing here.
    #[default]
    Empty,
    /// Adds the cell value to the finder's score. Consumed on first visit.
    Treasure,
    /// Subtracts a penalty from the visitor's score. Never consumed.
    Trap,
    /// Spawns a new agent when found. Consumed on first visit.
    Resurrection,
    /// Terminates the visiting agent. Never consumed.
    DeadlyTrap,
}

impl CellKind {
    /// Whether the cell reverts to [`CellKind::Empty`] once consumed.
    pub const fn is_consumable(self) -> bool {
        matches!(self, Self::Treasure | Self::Resurrection)
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// One of the four cardinal moves available to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// All directions, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

// ---------------------------------------------------------------------------
// Agent lifecycle
// ---------------------------------------------------------------------------

/// Why an agent stopped exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The global treasure count reached zero.
    TreasuresExhausted,
    /// The agent stepped on a deadly trap.
    Killed,
    /// No unvisited in-bounds neighbor was left, or too many consecutive
    /// move attempts were rejected.
    Stuck,
}

impl core::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::TreasuresExhausted => "treasures exhausted",
            Self::Killed => "killed by a deadly trap",
            Self::Stuck => "stuck",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_treasure_and_resurrection_are_consumable() {
        assert!(CellKind::Treasure.is_consumable());
        assert!(CellKind::Resurrection.is_consumable());
        assert!(!CellKind::Trap.is_consumable());
        assert!(!CellKind::DeadlyTrap.is_consumable());
        assert!(!CellKind::Empty.is_consumable());
    }

    #[test]
    fn default_kind_is_empty() {
        assert_eq!(CellKind::default(), CellKind::Empty);
    }
}
