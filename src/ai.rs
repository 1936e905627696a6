// Hunt/target shot selection for the computer opponent.
// Uses no_std and avoids heap allocations.

use rand::Rng;

use crate::{
    common::ShotResult,
    config::{GRID, HUNT_TRAIL_CAPACITY},
    grid::Grid,
    ship::Direction,
};

/// Fixed-capacity list of hits scored on the ship being hunted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuntTrail {
    cells: [(u8, u8); HUNT_TRAIL_CAPACITY],
    len: usize,
}

impl HuntTrail {
    fn starting_at(cell: (usize, usize)) -> Self {
        let mut trail = HuntTrail {
            cells: [(0, 0); HUNT_TRAIL_CAPACITY],
            len: 0,
        };
        trail.push(cell);
        trail
    }

    /// Append a hit; ignored once the trail is full.
    fn push(&mut self, (row, col): (usize, usize)) {
        if self.len < HUNT_TRAIL_CAPACITY {
            self.cells[self.len] = (row as u8, col as u8);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells[..self.len]
            .iter()
            .map(|&(r, c)| (r as usize, c as usize))
    }
}

/// Targeting mode of the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No live target: fire at random unattacked cells.
    Searching,
    /// Working around the latest hit on a ship not yet sunk.
    Hunting {
        /// Most recent confirmed hit; follow-up shots step out from here.
        anchor: (usize, usize),
        /// Heading committed to, if any.
        direction: Option<Direction>,
        trail: HuntTrail,
    },
}

/// Shot-selection state for one computer player in one game.
///
/// Call [`Hunter::next_target`] to pick a cell, fire it, then report the
/// outcome with [`Hunter::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunter {
    mode: Mode,
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hunter {
    pub fn new() -> Self {
        Self {
            mode: Mode::Searching,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_hunting(&self) -> bool {
        matches!(self.mode, Mode::Hunting { .. })
    }

    /// Choose the next cell to fire at, given this player's attack log.
    ///
    /// While hunting, the committed heading is tried first, then the four
    /// headings in fixed order; the first usable one becomes committed. When
    /// no heading around the anchor is usable the hunt is abandoned and a
    /// random cell is chosen. Never returns a cell already in `attack_log`
    /// unless every cell has been attacked.
    pub fn next_target<R: Rng + ?Sized>(&mut self, attack_log: &Grid, rng: &mut R) -> (usize, usize) {
        if let Mode::Hunting {
            anchor, direction, ..
        } = &mut self.mode
        {
            let (row, col) = *anchor;
            let usable = |dir: Direction| {
                dir.step(row, col)
                    .filter(|&(r, c)| !attack_log.is_attacked(r, c).unwrap_or(true))
            };
            if let Some(cell) = direction.and_then(|dir| usable(dir)) {
                return cell;
            }
            for dir in Direction::ALL {
                if let Some(cell) = usable(dir) {
                    *direction = Some(dir);
                    return cell;
                }
            }
            log::debug!("hunt around ({}, {}) exhausted, searching", row, col);
            self.mode = Mode::Searching;
        }
        random_unattacked(attack_log, rng)
    }

    /// Update the state with the outcome of a shot at `target`.
    pub fn observe(&mut self, target: (usize, usize), result: ShotResult) {
        match result {
            ShotResult::Hit { sunk: true, .. } => {
                self.mode = Mode::Searching;
            }
            ShotResult::Hit { .. } => {
                if let Mode::Hunting { anchor, trail, .. } = &mut self.mode {
                    *anchor = target;
                    trail.push(target);
                } else {
                    self.mode = Mode::Hunting {
                        anchor: target,
                        direction: None,
                        trail: HuntTrail::starting_at(target),
                    };
                }
            }
            ShotResult::Miss => {
                if let Mode::Hunting { direction, .. } = &mut self.mode {
                    *direction = None;
                }
            }
        }
    }
}

/// Uniformly random cell not yet in `attack_log` (rejection sampling).
fn random_unattacked<R: Rng + ?Sized>(attack_log: &Grid, rng: &mut R) -> (usize, usize) {
    if attack_log.attacked().count_ones() >= GRID * GRID {
        return (rng.random_range(0..GRID), rng.random_range(0..GRID));
    }
    loop {
        let row = rng.random_range(0..GRID);
        let col = rng.random_range(0..GRID);
        if !attack_log.is_attacked(row, col).unwrap_or(true) {
            return (row, col);
        }
    }
}
