//! Common types shared by the core: shot outcomes and board errors.

use crate::bitboard::BitBoardError;

/// Outcome of a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    /// The shot struck a ship segment. `sunk` is set when this hit finished
    /// the ship off, in which case `ship_length` carries its length;
    /// otherwise `ship_length` is zero.
    Hit { sunk: bool, ship_length: usize },
    /// The shot landed in open water.
    Miss,
}

impl ShotResult {
    /// True for any hit, sinking or not.
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotResult::Hit { .. })
    }

    /// True when the shot sank a ship.
    pub fn is_sunk(&self) -> bool {
        matches!(self, ShotResult::Hit { sunk: true, .. })
    }
}

/// Errors returned by grid, fleet and attack operations.
///
/// Every variant is recoverable: the caller asks for different input and
/// tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Row or column outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// Placement touches (or overlaps) a ship already on the grid.
    TooClose,
    /// The attacker already fired at this cell.
    AlreadyAttacked,
    /// All ten ships are already placed.
    FleetComplete,
    /// The fleet is missing ships and cannot go to battle.
    FleetIncomplete,
    /// Ship length is zero or longer than the grid.
    InvalidLength,
    /// No placed ship at this index.
    InvalidIndex,
    /// The move log is full; the move was not recorded.
    CapacityExceeded,
    /// Random placement could not fit the fleet.
    UnableToPlaceFleet,
    /// The game already has a winner.
    GameOver,
    /// A relative shot was requested before any shot was fired.
    NoPreviousShot,
    /// Both players have the same name; moves could not be told apart.
    DuplicateName,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { row, col } => BoardError::OutOfBounds { row, col },
        }
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds { row, col } => {
                write!(f, "Position ({}, {}) is outside the grid", row, col)
            }
            BoardError::TooClose => write!(f, "Ship would touch another ship"),
            BoardError::AlreadyAttacked => write!(f, "That position was already attacked"),
            BoardError::FleetComplete => write!(f, "All ships are already placed"),
            BoardError::FleetIncomplete => write!(f, "Not all ships have been placed"),
            BoardError::InvalidLength => write!(f, "Ship length does not fit the grid"),
            BoardError::InvalidIndex => write!(f, "No ship at that index"),
            BoardError::CapacityExceeded => write!(f, "Move log is full"),
            BoardError::UnableToPlaceFleet => write!(f, "Unable to place the fleet"),
            BoardError::GameOver => write!(f, "The game is already over"),
            BoardError::NoPreviousShot => write!(f, "No previous shot to aim from"),
            BoardError::DuplicateName => write!(f, "Both players have the same name"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
