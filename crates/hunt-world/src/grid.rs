//! The shared N×N board.
//!
//! [`GridStore`] owns every cell behind a single [`tokio::sync::Mutex`].
//! The only mutation is [`GridStore::consume`], which reads a cell and, for
//! treasure and resurrection stones, empties it inside the same critical
//! section. Exactly one caller can ever observe a given special cell as
//! non-empty.

use hunt_types::{Cell, CellKind, Position};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::WorldError;
use crate::layout::GridLayout;
use crate::outcome::OutcomeState;

/// Shared board of cells, stored row-major.
#[derive(Debug)]
pub struct GridStore {
    /// Cells per side.
    size: u32,
    /// Treasure count at construction time.
    initial_treasures: u32,
    /// Row-major cells.
    cells: Mutex<Vec<Cell>>,
}

impl GridStore {
    /// Build a grid from explicit cells in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] for a zero size,
    /// [`WorldError::TooLarge`] if `size * size` overflows, and
    /// [`WorldError::CellCountMismatch`] if `cells` has the wrong length.
    pub fn from_cells(size: u32, cells: Vec<Cell>) -> Result<Self, WorldError> {
        if size == 0 {
            return Err(WorldError::EmptyGrid);
        }
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(WorldError::CellCountMismatch {
                size,
                expected,
                actual: cells.len(),
            });
        }
        let treasures = cells
            .iter()
            .filter(|c| c.kind == CellKind::Treasure)
            .count();
        let initial_treasures = u32::try_from(treasures).map_err(|_e| WorldError::TooLarge(size))?;
        Ok(Self {
            size,
            initial_treasures,
            cells: Mutex::new(cells),
        })
    }

    /// Build an all-empty grid.
    ///
    /// # Errors
    ///
    /// Same as [`GridStore::from_cells`].
    pub fn empty(size: u32) -> Result<Self, WorldError> {
        Self::from_cells(size, vec![Cell::EMPTY; cell_count(size)?])
    }

    /// Generate a random grid from `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] if the layout does not
    /// validate, plus the errors of [`GridStore::from_cells`].
    pub fn generate(
        size: u32,
        layout: &GridLayout,
        rng: &mut impl Rng,
    ) -> Result<Self, WorldError> {
        layout.validate()?;
        if size == 0 {
            return Err(WorldError::EmptyGrid);
        }
        let cells = layout.roll_cells(cell_count(size)?, rng);
        let grid = Self::from_cells(size, cells)?;
        debug!(
            size,
            treasures = grid.initial_treasures,
            "grid generated"
        );
        Ok(grid)
    }

    /// Cells per side.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of treasures on the board when it was built.
    pub const fn treasure_count(&self) -> u32 {
        self.initial_treasures
    }

    /// Whether `position` lies on the board.
    pub const fn contains(&self, position: Position) -> bool {
        position.within(self.size)
    }

    /// Snapshot of the cell at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `position` is off the board.
    pub async fn cell_at(&self, position: Position) -> Result<Cell, WorldError> {
        let index = self.index_of(position)?;
        let cells = self.cells.lock().await;
        cells
            .get(index)
            .copied()
            .ok_or(WorldError::OutOfBounds {
                position,
                size: self.size,
            })
    }

    /// Consume the cell at `position` and return what was there.
    ///
    /// Treasure and resurrection cells are reset to empty under the lock
    /// before it is released; a consumed treasure also counts down
    /// `outcome`'s remaining treasures inside the same critical section.
    /// Traps, deadly traps, and empty cells are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `position` is off the board.
    pub async fn consume(
        &self,
        position: Position,
        outcome: &OutcomeState,
    ) -> Result<Cell, WorldError> {
        let index = self.index_of(position)?;
        let mut cells = self.cells.lock().await;
        let slot = cells.get_mut(index).ok_or(WorldError::OutOfBounds {
            position,
            size: self.size,
        })?;
        let observed = *slot;
        if observed.kind.is_consumable() {
            *slot = Cell::EMPTY;
            if observed.kind == CellKind::Treasure {
                let left = outcome.take_treasure();
                debug!(%position, remaining = left, "treasure consumed");
            }
        }
        Ok(observed)
    }

    fn index_of(&self, position: Position) -> Result<usize, WorldError> {
        let out_of_bounds = || WorldError::OutOfBounds {
            position,
            size: self.size,
        };
        if !self.contains(position) {
            return Err(out_of_bounds());
        }
        let row = usize::try_from(position.x).map_err(|_e| out_of_bounds())?;
        let col = usize::try_from(position.y).map_err(|_e| out_of_bounds())?;
        let width = usize::try_from(self.size).map_err(|_e| out_of_bounds())?;
        row.checked_mul(width)
            .and_then(|base| base.checked_add(col))
            .ok_or_else(out_of_bounds)
    }
}

fn cell_count(size: u32) -> Result<usize, WorldError> {
    let side = usize::try_from(size).map_err(|_e| WorldError::TooLarge(size))?;
    side.checked_mul(side).ok_or(WorldError::TooLarge(size))
}
