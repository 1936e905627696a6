//! Shot resolution and victory detection.

use crate::common::{BoardError, ShotResult};
use crate::grid::check_bounds;
use crate::player::Player;

/// Fire `attacker`'s shot at (`row`, `col`) on `defender`'s waters.
///
/// A cell already present in the attacker's log is rejected with
/// [`BoardError::AlreadyAttacked`] and nothing changes.
pub fn resolve_attack(
    attacker: &mut Player,
    defender: &mut Player,
    row: usize,
    col: usize,
) -> Result<ShotResult, BoardError> {
    check_bounds(row, col)?;
    if attacker.attack_log().is_attacked(row, col)? {
        return Err(BoardError::AlreadyAttacked);
    }
    let hit = defender.own_waters().has_ship(row, col)?;
    apply_shot(attacker, defender, row, col, hit)
}

/// Mark a shot whose outcome is already known on both players' grids.
///
/// This is the single mutation path for shots: live play computes `hit`
/// from the defender's waters, playback takes it from the move record.
/// On a hit the first afloat ship covering the cell takes the damage; a hit
/// with no such ship still marks the grids but reports no ship.
pub fn apply_shot(
    attacker: &mut Player,
    defender: &mut Player,
    row: usize,
    col: usize,
    hit: bool,
) -> Result<ShotResult, BoardError> {
    if !hit {
        attacker.attack_log_mut().mark_miss(row, col)?;
        return Ok(ShotResult::Miss);
    }
    attacker.attack_log_mut().mark_hit(row, col)?;
    defender.own_waters_mut().mark_hit(row, col)?;

    let (sunk, ship_length) = match defender.afloat_ship_at_mut(row, col) {
        Some(ship) => {
            if ship.register_hit() {
                (true, ship.length())
            } else {
                (false, 0)
            }
        }
        None => (false, 0),
    };
    if sunk {
        defender.record_sinking();
    }
    Ok(ShotResult::Hit { sunk, ship_length })
}

/// True once `defender` has lost every ship.
pub fn is_victory(defender: &Player) -> bool {
    defender.is_defeated()
}
