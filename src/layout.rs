#![cfg(feature = "std")]

//! Plain-text ship layout files.
//!
//! One ship per line in fleet order, `<letter><number> <direction>`, where
//! the direction digit is 0 (up), 1 (down), 2 (left) or 3 (right):
//!
//! ```text
//! A1 3
//! C1 3
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::NUM_SHIPS;
use crate::grid::{format_coord, parse_coord};
use crate::player::Player;
use crate::ship::Direction;
use crate::store::StoreError;

/// Anchor and heading of one ship, as written in a layout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

/// Parse `<letter><number> <direction>`.
pub fn parse_placement(text: &str) -> Option<Placement> {
    let mut parts = text.split_whitespace();
    let (row, col) = parse_coord(parts.next()?)?;
    let digit: u8 = parts.next()?.parse().ok()?;
    let direction = Direction::from_index(digit)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Placement { row, col, direction })
}

fn malformed(line: usize, reason: impl Into<String>) -> StoreError {
    StoreError::MalformedLayout {
        line,
        reason: reason.into(),
    }
}

/// Parse a whole layout file. Blank lines are skipped; every other line
/// must be a valid placement and there must be exactly one per ship.
pub fn parse_layout(text: &str) -> Result<Vec<Placement>, StoreError> {
    Ok(numbered_placements(text)?.into_iter().map(|(_, p)| p).collect())
}

fn numbered_placements(text: &str) -> Result<Vec<(usize, Placement)>, StoreError> {
    let mut placements = Vec::with_capacity(NUM_SHIPS);
    let mut last_line = 0;
    for (idx, line) in text.lines().enumerate() {
        last_line = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let placement = parse_placement(line).ok_or_else(|| {
            malformed(
                last_line,
                format!("expected `<letter><number> <0-3>`, got {:?}", line.trim()),
            )
        })?;
        if placements.len() == NUM_SHIPS {
            return Err(malformed(last_line, "more ships than the fleet holds"));
        }
        placements.push((last_line, placement));
    }
    if placements.len() < NUM_SHIPS {
        return Err(malformed(
            last_line,
            format!("expected {} ships, found {}", NUM_SHIPS, placements.len()),
        ));
    }
    Ok(placements)
}

/// Lay out `player`'s fleet from layout text.
///
/// The player's fleet is cleared first. If any line is bad the player is
/// left with an empty fleet; otherwise the whole fleet is placed.
pub fn apply_layout(player: &mut Player, text: &str) -> Result<(), StoreError> {
    player.clear_fleet();
    let mut staged = player.clone();
    for (line, placement) in numbered_placements(text)? {
        staged
            .place_next(placement.row, placement.col, placement.direction)
            .map_err(|err| malformed(line, err.to_string()))?;
    }
    *player = staged;
    Ok(())
}

/// Load a layout file into `player`.
pub fn load_layout(player: &mut Player, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let text = fs::read_to_string(path.as_ref())?;
    apply_layout(player, &text)?;
    log::info!("loaded ship layout from {}", path.as_ref().display());
    Ok(())
}

/// Render `player`'s placed ships in layout-file form.
pub fn format_layout(player: &Player) -> String {
    // the prescribed fleet order is ascending length
    let mut ships: Vec<_> = player.ships().collect();
    ships.sort_by_key(|ship| ship.length());
    let mut out = String::new();
    for ship in ships {
        let (row, col) = ship.anchor();
        let _ = writeln!(out, "{} {}", format_coord(row, col), ship.direction().index());
    }
    out
}

/// Write `player`'s placed ships to a layout file.
pub fn save_layout(player: &Player, path: impl AsRef<Path>) -> Result<(), StoreError> {
    fs::write(path.as_ref(), format_layout(player))?;
    log::info!("saved ship layout to {}", path.as_ref().display());
    Ok(())
}
