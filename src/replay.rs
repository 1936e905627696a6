#![cfg(feature = "std")]

//! Game history: an append-only move log on top of pre-game snapshots.
//!
//! A [`ReplayRecorder`] collects moves while a game is played and is then
//! finalized into an immutable [`Replay`]. Playback rebuilds both boards from
//! the snapshots and re-applies each move through the same
//! [`apply_shot`](crate::attack::apply_shot) used in live play.

use serde::{Deserialize, Serialize};

use crate::attack::apply_shot;
use crate::common::{BoardError, ShotResult};
use crate::config::{GRID, MAX_MOVES, TIMESTAMP_FORMAT};
use crate::player::Player;

/// Current local time in the replay timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One resolved shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player_name: String,
    pub row: u8,
    pub col: u8,
    pub hit: bool,
    pub sunk: bool,
    /// Length of the ship sunk by this move, zero otherwise.
    pub ship_length: u8,
    pub timestamp: String,
}

impl MoveRecord {
    pub fn target(&self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    pub fn outcome(&self) -> ShotResult {
        if self.hit {
            ShotResult::Hit {
                sunk: self.sunk,
                ship_length: self.ship_length as usize,
            }
        } else {
            ShotResult::Miss
        }
    }
}

/// Complete record of one game: both fleets as they stood before the first
/// shot, every move in order, the winner and the start and end times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    player1: Player,
    player2: Player,
    moves: Vec<MoveRecord>,
    winner: Option<String>,
    start_time: String,
    end_time: String,
}

impl Replay {
    /// Reject a decoded replay that no game could have produced.
    pub(crate) fn check_integrity(&self) -> Result<(), &'static str> {
        self.player1.check_integrity()?;
        self.player2.check_integrity()?;
        if self.player1.name() == self.player2.name() {
            return Err("both players have the same name");
        }
        if self.moves.len() > MAX_MOVES {
            return Err("more moves than a history holds");
        }
        if self.moves.iter().any(|mv| {
            let (row, col) = mv.target();
            row >= GRID || col >= GRID
        }) {
            return Err("move outside the grid");
        }
        Ok(())
    }

    /// Pre-game snapshots, player 1 first.
    pub fn players(&self) -> [&Player; 2] {
        [&self.player1, &self.player2]
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    /// Start stepping through the game from the first move.
    pub fn playback(&self) -> Playback<'_> {
        Playback::new(self)
    }
}

/// Collects the history of a game in progress.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    start_time: String,
    snapshots: Option<(Player, Player)>,
    moves: Vec<MoveRecord>,
}

impl ReplayRecorder {
    /// Start a new history stamped with the current time.
    pub fn begin() -> Self {
        Self {
            start_time: now_timestamp(),
            snapshots: None,
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    /// Store both players as they are before any shot is fired.
    pub fn capture(&mut self, player1: &Player, player2: &Player) {
        self.snapshots = Some((player1.clone(), player2.clone()));
    }

    /// Append a move. Beyond [`MAX_MOVES`] the move is dropped and
    /// `CapacityExceeded` returned; the game itself is unaffected.
    pub fn record(
        &mut self,
        player_name: &str,
        row: usize,
        col: usize,
        result: ShotResult,
    ) -> Result<(), BoardError> {
        if self.moves.len() >= MAX_MOVES {
            return Err(BoardError::CapacityExceeded);
        }
        let (hit, sunk, ship_length) = match result {
            ShotResult::Hit { sunk, ship_length } => (true, sunk, if sunk { ship_length } else { 0 }),
            ShotResult::Miss => (false, false, 0),
        };
        self.moves.push(MoveRecord {
            player_name: player_name.to_owned(),
            row: row as u8,
            col: col as u8,
            hit,
            sunk,
            ship_length: ship_length as u8,
            timestamp: now_timestamp(),
        });
        Ok(())
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Close the history with the winner's name and the end time.
    pub fn finalize(self, winner: Option<&str>) -> Replay {
        let (player1, player2) = self
            .snapshots
            .unwrap_or_else(|| (Player::new("player1"), Player::new("player2")));
        Replay {
            player1,
            player2,
            moves: self.moves,
            winner: winner.map(str::to_owned),
            start_time: self.start_time,
            end_time: now_timestamp(),
        }
    }
}

/// A move as re-applied during playback.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackStep<'a> {
    /// Zero-based position in the move log.
    pub index: usize,
    pub record: &'a MoveRecord,
    /// Index of the attacking player (0 or 1).
    pub attacker: usize,
}

/// Cursor replaying a [`Replay`] move by move.
///
/// Boards start from the stored snapshots with any residual hit cells turned
/// back into ship cells and both attack logs cleared. Moves are trusted and
/// applied without validation.
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    replay: &'a Replay,
    players: [Player; 2],
    cursor: usize,
}

impl<'a> Playback<'a> {
    fn new(replay: &'a Replay) -> Self {
        let mut players = [replay.player1.clone(), replay.player2.clone()];
        for player in players.iter_mut() {
            player.reset_battle_state();
        }
        Self {
            replay,
            players,
            cursor: 0,
        }
    }

    /// Both boards as of the last applied move.
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Number of moves still to apply.
    pub fn remaining(&self) -> usize {
        self.replay.moves.len() - self.cursor
    }

    /// Apply the next move, or return `None` at the end of the log.
    pub fn step(&mut self) -> Option<PlaybackStep<'a>> {
        let replay = self.replay;
        let record = replay.moves.get(self.cursor)?;
        let index = self.cursor;
        self.cursor += 1;

        let attacker = if record.player_name == self.players[0].name() { 0 } else { 1 };
        let [first, second] = &mut self.players;
        let (atk, def) = if attacker == 0 { (first, second) } else { (second, first) };
        let (row, col) = record.target();
        if let Err(err) = apply_shot(atk, def, row, col, record.hit) {
            log::warn!("skipping move {}: {}", index + 1, err);
        }
        Some(PlaybackStep {
            index,
            record,
            attacker,
        })
    }

    /// Apply every remaining move.
    pub fn run_to_end(&mut self) {
        while self.step().is_some() {}
    }
}
