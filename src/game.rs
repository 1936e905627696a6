#![cfg(feature = "std")]

use crate::{
    attack::{is_victory, resolve_attack},
    common::{BoardError, ShotResult},
    player::Player,
    replay::{Replay, ReplayRecorder},
    ship::Direction,
};

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// Index (0 or 1) of the player who sank the whole opposing fleet.
    Won(usize),
}

/// One game between two players.
///
/// Owns both players, the move history and the turn order. A hit lets the
/// same player fire again; a miss passes the turn.
#[derive(Debug, Clone)]
pub struct GameSession {
    players: [Player; 2],
    turn: usize,
    last_shot: [Option<(usize, usize)>; 2],
    recorder: ReplayRecorder,
    winner: Option<usize>,
}

impl GameSession {
    /// Start a game. Both fleets must be complete; their current state is
    /// captured as the replay's pre-game snapshot. Player one moves first.
    ///
    /// Moves are recorded by player name, so the names must differ.
    pub fn new(player1: Player, player2: Player) -> Result<Self, BoardError> {
        if !player1.is_fleet_complete() || !player2.is_fleet_complete() {
            return Err(BoardError::FleetIncomplete);
        }
        if player1.name() == player2.name() {
            return Err(BoardError::DuplicateName);
        }
        let mut recorder = ReplayRecorder::begin();
        recorder.capture(&player1, &player2);
        log::info!("game started: {} vs {}", player1.name(), player2.name());
        Ok(Self {
            players: [player1, player2],
            turn: 0,
            last_shot: [None; 2],
            recorder,
            winner: None,
        })
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Index of the player to move.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn current(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn opponent(&self) -> &Player {
        &self.players[1 - self.turn]
    }

    /// Last cell targeted by the player to move.
    pub fn last_shot(&self) -> Option<(usize, usize)> {
        self.last_shot[self.turn]
    }

    /// Last cell targeted by player `index`.
    pub fn last_shot_of(&self, index: usize) -> Option<(usize, usize)> {
        self.last_shot.get(index).copied().flatten()
    }

    /// Moves recorded so far.
    pub fn history(&self) -> &ReplayRecorder {
        &self.recorder
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(idx) => GameStatus::Won(idx),
            None => GameStatus::InProgress,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Fire the current player's shot at (`row`, `col`).
    ///
    /// Rejected shots (`OutOfBounds`, `AlreadyAttacked`) leave the game
    /// untouched and the same player to move.
    pub fn fire(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        if self.winner.is_some() {
            return Err(BoardError::GameOver);
        }
        let attacker_idx = self.turn;
        let [first, second] = &mut self.players;
        let (attacker, defender) = if attacker_idx == 0 {
            (first, second)
        } else {
            (second, first)
        };
        let result = resolve_attack(attacker, defender, row, col)?;
        self.last_shot[attacker_idx] = Some((row, col));
        log::debug!("{} fires at ({}, {}): {:?}", attacker.name(), row, col, result);

        if let Err(err) = self.recorder.record(attacker.name(), row, col, result) {
            log::warn!("move not recorded: {}", err);
        }
        if is_victory(defender) {
            log::info!("{} wins", attacker.name());
            self.winner = Some(attacker_idx);
        } else if !result.is_hit() {
            self.turn = 1 - attacker_idx;
        }
        Ok(result)
    }

    /// Fire one cell away from the current player's previous shot.
    ///
    /// When the step would leave the grid the error carries the previous
    /// shot's cell.
    pub fn fire_relative(&mut self, direction: Direction) -> Result<ShotResult, BoardError> {
        let (row, col) = self.last_shot().ok_or(BoardError::NoPreviousShot)?;
        match direction.step(row, col) {
            Some((r, c)) => self.fire(r, c),
            None => Err(BoardError::OutOfBounds { row, col }),
        }
    }

    /// End the game and hand back its history. A game abandoned before a
    /// winner emerged records no winner.
    pub fn finish(self) -> Replay {
        let winner = self.winner.map(|idx| self.players[idx].name());
        self.recorder.finalize(winner)
    }
}
