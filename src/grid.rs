//! The 10×10 grid model and coordinate labels.
//!
//! Rows are labelled with letters `A..=J`, columns with numbers `1..=10`.
//! Internally both are zero-based indices.

use crate::bitboard::BitBoard;
use crate::common::BoardError;
use crate::config::{BOARD_SIZE, GRID};

/// Occupancy mask sized for the game grid.
pub type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

/// State of a single cell as shown to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Ship,
    Hit,
    Miss,
}

/// One player's view of a 10×10 sea.
///
/// The same type backs both the "own waters" grid (ships plus incoming hits)
/// and the "attack log" (outgoing hits and misses, no ships). A cell that is
/// both ship and hit reads as [`CellState::Hit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    ships: BB,
    hits: BB,
    misses: BB,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the cell at (`row`, `col`).
    pub fn cell(&self, row: usize, col: usize) -> Result<CellState, BoardError> {
        if self.hits.get(row, col)? {
            Ok(CellState::Hit)
        } else if self.misses.get(row, col)? {
            Ok(CellState::Miss)
        } else if self.ships.get(row, col)? {
            Ok(CellState::Ship)
        } else {
            Ok(CellState::Empty)
        }
    }

    /// True once a hit or miss has been marked on the cell.
    pub fn is_attacked(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        Ok(self.hits.get(row, col)? || self.misses.get(row, col)?)
    }

    pub fn has_ship(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        Ok(self.ships.get(row, col)?)
    }

    /// Mask of ship-occupied cells.
    pub fn ship_mask(&self) -> BB {
        self.ships
    }

    pub fn hits(&self) -> BB {
        self.hits
    }

    pub fn misses(&self) -> BB {
        self.misses
    }

    /// Mask of cells that were fired at, hit or miss.
    pub fn attacked(&self) -> BB {
        self.hits | self.misses
    }

    pub(crate) fn add_ships(&mut self, mask: BB) {
        self.ships = self.ships | mask;
    }

    pub(crate) fn remove_ships(&mut self, mask: BB) {
        self.ships = self.ships & !mask;
    }

    pub(crate) fn mark_hit(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        Ok(self.hits.set(row, col)?)
    }

    pub(crate) fn mark_miss(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        Ok(self.misses.set(row, col)?)
    }

    /// Forget all hits and misses, keeping ships.
    #[cfg(feature = "std")]
    pub(crate) fn clear_shots(&mut self) {
        self.hits.clear_all();
        self.misses.clear_all();
    }

    /// Reset every cell to empty.
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Fail with `OutOfBounds` unless (`row`, `col`) is on the grid.
pub fn check_bounds(row: usize, col: usize) -> Result<(), BoardError> {
    if row < GRID && col < GRID {
        Ok(())
    } else {
        Err(BoardError::OutOfBounds { row, col })
    }
}

/// Letter label for a row index (`0 -> 'A'`).
pub fn row_label(row: usize) -> Option<char> {
    if row < GRID {
        Some((b'A' + row as u8) as char)
    } else {
        None
    }
}

/// Row index for a letter label, case-insensitive.
pub fn row_from_label(label: char) -> Option<usize> {
    let upper = label.to_ascii_uppercase();
    if !upper.is_ascii_uppercase() {
        return None;
    }
    let row = (upper as u8 - b'A') as usize;
    (row < GRID).then_some(row)
}

/// Column index for a 1-based column number.
pub fn col_from_number(number: usize) -> Option<usize> {
    (1..=GRID).contains(&number).then(|| number - 1)
}

/// Parse a cell label such as `A1` or `j10`.
pub fn parse_coord(input: &str) -> Option<(usize, usize)> {
    let input = input.trim();
    let mut chars = input.chars();
    let row = row_from_label(chars.next()?)?;
    let number: usize = chars.as_str().parse().ok()?;
    Some((row, col_from_number(number)?))
}

/// Label for a cell, e.g. `(0, 0) -> "A1"`.
#[cfg(feature = "std")]
pub fn format_coord(row: usize, col: usize) -> String {
    match row_label(row) {
        Some(letter) if col < GRID => format!("{}{}", letter, col + 1),
        _ => format!("?{}", col + 1),
    }
}
