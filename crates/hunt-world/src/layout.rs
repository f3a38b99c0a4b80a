//! Random board generation.
//!
//! Each cell is rolled independently against cumulative probability bands:
//! a roll in `0..100` lands in the treasure band first, then trap,
//! resurrection, and deadly trap, and anything left over is empty. Values
//! for treasures and trap penalties are drawn uniformly from inclusive
//! ranges.

use hunt_types::Cell;
use rand::Rng;
use serde::Deserialize;

use crate::error::WorldError;

/// An inclusive range of cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValueRange {
    /// Smallest value that can be drawn.
    pub min: u32,
    /// Largest value that can be drawn.
    pub max: u32,
}

impl ValueRange {
    /// Create a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn sample(self, rng: &mut impl Rng) -> i32 {
        let raw = rng.random_range(self.min..=self.max);
        i32::try_from(raw).unwrap_or(i32::MAX)
    }
}

/// Probability bands and value ranges for board generation.
///
/// Percentages are whole numbers and must not sum past 100.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridLayout {
    /// Chance that a cell holds treasure.
    #[serde(default = "default_treasure_percent")]
    pub treasure_percent: u32,

    /// Chance that a cell holds a trap.
    #[serde(default = "default_trap_percent")]
    pub trap_percent: u32,

    /// Chance that a cell holds a resurrection stone.
    #[serde(default = "default_resurrection_percent")]
    pub resurrection_percent: u32,

    /// Chance that a cell holds a deadly trap.
    #[serde(default = "default_deadly_trap_percent")]
    pub deadly_trap_percent: u32,

    /// Points awarded by a treasure.
    #[serde(default = "default_treasure_value")]
    pub treasure_value: ValueRange,

    /// Points taken by a trap, as a positive magnitude.
    #[serde(default = "default_trap_penalty")]
    pub trap_penalty: ValueRange,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            treasure_percent: default_treasure_percent(),
            trap_percent: default_trap_percent(),
            resurrection_percent: default_resurrection_percent(),
            deadly_trap_percent: default_deadly_trap_percent(),
            treasure_value: default_treasure_value(),
            trap_penalty: default_trap_penalty(),
        }
    }
}

const fn default_treasure_percent() -> u32 {
    15
}

const fn default_trap_percent() -> u32 {
    15
}

const fn default_resurrection_percent() -> u32 {
    5
}

const fn default_deadly_trap_percent() -> u32 {
    5
}

const fn default_treasure_value() -> ValueRange {
    ValueRange::new(10, 100)
}

const fn default_trap_penalty() -> ValueRange {
    ValueRange::new(5, 50)
}

impl GridLayout {
    /// Check that the bands fit in 100% and every range is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] describing the first problem found.
    pub fn validate(&self) -> Result<(), WorldError> {
        let total = self
            .treasure_percent
            .saturating_add(self.trap_percent)
            .saturating_add(self.resurrection_percent)
            .saturating_add(self.deadly_trap_percent);
        if total > 100 {
            return Err(WorldError::InvalidLayout {
                reason: format!("cell probabilities sum to {total}%, above 100%"),
            });
        }
        for (name, range) in [
            ("treasure_value", self.treasure_value),
            ("trap_penalty", self.trap_penalty),
        ] {
            if range.min > range.max {
                return Err(WorldError::InvalidLayout {
                    reason: format!("{name} min {} exceeds max {}", range.min, range.max),
                });
            }
        }
        Ok(())
    }

    /// Roll a single cell.
    pub fn roll_cell(&self, rng: &mut impl Rng) -> Cell {
        let roll: u32 = rng.random_range(0..100);
        let treasure_band = self.treasure_percent;
        let trap_band = treasure_band.saturating_add(self.trap_percent);
        let resurrection_band = trap_band.saturating_add(self.resurrection_percent);
        let deadly_band = resurrection_band.saturating_add(self.deadly_trap_percent);

        if roll < treasure_band {
            Cell::treasure(self.treasure_value.sample(rng))
        } else if roll < trap_band {
            Cell::trap(self.trap_penalty.sample(rng))
        } else if roll < resurrection_band {
            Cell::resurrection()
        } else if roll < deadly_band {
            Cell::deadly_trap()
        } else {
            Cell::EMPTY
        }
    }

    /// Roll `count` cells in row-major order.
    pub fn roll_cells(&self, count: usize, rng: &mut impl Rng) -> Vec<Cell> {
        (0..count).map(|_| self.roll_cell(rng)).collect()
    }
}
