//! Ship definitions: classes, headings and placed ships.

use core::fmt;

use crate::common::BoardError;
use crate::config::GRID;
use crate::grid::BB;

/// Heading of a ship, away from its anchor cell.
///
/// The discriminants are the digits used in layout files and placement
/// commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Toward decreasing row.
    Up = 0,
    /// Toward increasing row.
    Down = 1,
    /// Toward decreasing column.
    Left = 2,
    /// Toward increasing column.
    Right = 3,
}

impl Direction {
    /// All headings, in the order the computer tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a heading digit `0..=3`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The cell `distance` steps away from (`row`, `col`), if it is on the grid.
    pub fn offset(self, row: usize, col: usize, distance: usize) -> Option<(usize, usize)> {
        let (r, c) = match self {
            Direction::Up => (row.checked_sub(distance)?, col),
            Direction::Down => (row.checked_add(distance)?, col),
            Direction::Left => (row, col.checked_sub(distance)?),
            Direction::Right => (row, col.checked_add(distance)?),
        };
        if r < GRID && c < GRID {
            Some((r, c))
        } else {
            None
        }
    }

    /// The neighbouring cell one step away.
    pub fn step(self, row: usize, col: usize) -> Option<(usize, usize)> {
        self.offset(row, col, 1)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Class of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on the grid.
///
/// The span starts at the anchor and runs `length` cells in `direction`.
/// Construction guarantees the whole span is on the grid.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    row: u8,
    col: u8,
    length: u8,
    direction: Direction,
    hits: u8,
    sunk: bool,
}

impl Ship {
    /// Lay a fresh, undamaged ship at (`row`, `col`).
    pub fn new(row: usize, col: usize, length: usize, direction: Direction) -> Result<Self, BoardError> {
        if length == 0 || length > GRID {
            return Err(BoardError::InvalidLength);
        }
        if row >= GRID || col >= GRID {
            return Err(BoardError::OutOfBounds { row, col });
        }
        if direction.offset(row, col, length - 1).is_none() {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(Ship {
            row: row as u8,
            col: col as u8,
            length: length as u8,
            direction,
            hits: 0,
            sunk: false,
        })
    }

    /// Anchor cell (row, col).
    pub fn anchor(&self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Segments hit so far.
    pub fn hits(&self) -> usize {
        self.hits as usize
    }

    pub fn is_sunk(&self) -> bool {
        self.sunk
    }

    /// Cells covered by the ship, starting at the anchor.
    pub fn span(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (row, col) = self.anchor();
        (0..self.length()).filter_map(move |i| self.direction.offset(row, col, i))
    }

    /// Occupancy mask of the span.
    pub fn mask(&self) -> BB {
        let mut mask = BB::new();
        for (r, c) in self.span() {
            // span cells are on the grid by construction
            let _ = mask.set(r, c);
        }
        mask
    }

    /// True if (`row`, `col`) lies on the span.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.span().any(|cell| cell == (row, col))
    }

    /// Count one more hit. Returns `true` only for the hit that sinks it.
    pub fn register_hit(&mut self) -> bool {
        if self.sunk {
            return false;
        }
        self.hits += 1;
        if self.hits >= self.length {
            self.sunk = true;
            return true;
        }
        false
    }

    /// Return the ship to its undamaged state.
    #[cfg(feature = "std")]
    pub(crate) fn repair(&mut self) {
        self.hits = 0;
        self.sunk = false;
    }
}

#[cfg(feature = "std")]
impl Ship {
    /// True if [`Ship::new`] could have built this ship and its damage is
    /// consistent. Decoded ships are checked with this.
    pub(crate) fn is_well_formed(&self) -> bool {
        let (row, col) = self.anchor();
        Ship::new(row, col, self.length(), self.direction).is_ok()
            && self.hits <= self.length
            && self.sunk == (self.hits == self.length)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ anchor: ({}, {}), length: {}, direction: {:?}, hits: {}, sunk: {} }}",
            self.row, self.col, self.length, self.direction, self.hits, self.sunk,
        )
    }
}
