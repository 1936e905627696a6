use crate::ship::ShipClass;

pub const BOARD_SIZE: u8 = 10;
/// Grid side as `usize`, for indexing.
pub const GRID: usize = BOARD_SIZE as usize;
pub const NUM_SHIPS: usize = 10;

/// The prescribed fleet, in placement order.
pub const FLEET: [ShipClass; NUM_SHIPS] = [
    ShipClass::new("Small", 2),
    ShipClass::new("Small", 2),
    ShipClass::new("Small", 2),
    ShipClass::new("Small", 2),
    ShipClass::new("Medium", 3),
    ShipClass::new("Medium", 3),
    ShipClass::new("Medium", 3),
    ShipClass::new("Large", 4),
    ShipClass::new("Large", 4),
    ShipClass::new("Cruiser", 6),
];

/// Total number of ship segments in a complete fleet.
pub const TOTAL_SHIP_CELLS: usize = 4 * 2 + 3 * 3 + 2 * 4 + 6;

/// Upper bound on recorded moves per game.
pub const MAX_MOVES: usize = 200;
/// Upper bound on hits remembered while hunting one ship.
pub const HUNT_TRAIL_CAPACITY: usize = 10;

/// Attempts at laying out a whole random fleet before giving up.
pub const FLEET_ATTEMPTS: usize = 1000;
/// Random positions tried per ship within one fleet attempt.
pub const SHIP_ATTEMPTS: usize = 100;

#[cfg(feature = "std")]
pub const DEFAULT_REPLAY_DIR: &str = "replays";
#[cfg(feature = "std")]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
#[cfg(feature = "std")]
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const SALT_SIZE: usize = 16;
pub const IV_SIZE: usize = 16;
pub const KEY_SIZE: usize = 32;
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Longest password read from the terminal, in bytes.
pub const MAX_PASSWORD_LEN: usize = 256;

/// Largest serialized replay accepted when loading.
pub const MAX_REPLAY_BYTES: u64 = 256 * 1024;

/// Class name for a ship of the given length, if the fleet has one.
pub fn class_name(length: usize) -> Option<&'static str> {
    FLEET.iter().find(|c| c.length() == length).map(|c| c.name())
}
