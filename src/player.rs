//! Players: a fleet plus the two grids each side keeps.

use alloc::string::String;
use rand::Rng;

use crate::common::BoardError;
use crate::config::{FLEET, FLEET_ATTEMPTS, GRID, NUM_SHIPS, SHIP_ATTEMPTS};
use crate::grid::Grid;
#[cfg(feature = "std")]
use crate::grid::BB;
use crate::ship::{Direction, Ship};

/// One side of a game.
///
/// `own_waters` holds the fleet and the opponent's hits on it; `attack_log`
/// holds this player's shots at the opponent. Ships are kept in placement
/// order in a fixed array; removal compacts the array.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    name: String,
    ships: [Option<Ship>; NUM_SHIPS],
    ship_count: usize,
    own_waters: Grid,
    attack_log: Grid,
    ships_sunk: usize,
    is_computer: bool,
}

impl Player {
    /// Create a human-controlled player with no ships placed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ships: [None; NUM_SHIPS],
            ship_count: 0,
            own_waters: Grid::new(),
            attack_log: Grid::new(),
            ships_sunk: 0,
            is_computer: false,
        }
    }

    /// Create a computer-controlled player with no ships placed.
    pub fn computer(name: impl Into<String>) -> Self {
        Self {
            is_computer: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_computer(&self) -> bool {
        self.is_computer
    }

    pub fn own_waters(&self) -> &Grid {
        &self.own_waters
    }

    pub fn attack_log(&self) -> &Grid {
        &self.attack_log
    }

    /// Ships placed so far, in fleet order.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships[..self.ship_count].iter().flatten()
    }

    pub fn ship(&self, index: usize) -> Option<&Ship> {
        self.ships.get(index).and_then(Option::as_ref)
    }

    pub fn ship_count(&self) -> usize {
        self.ship_count
    }

    pub fn is_fleet_complete(&self) -> bool {
        self.ship_count == NUM_SHIPS
    }

    /// Number of this player's ships that have been sunk.
    pub fn ships_sunk(&self) -> usize {
        self.ships_sunk
    }

    /// True once every ship of a full fleet is sunk.
    pub fn is_defeated(&self) -> bool {
        self.ships_sunk >= NUM_SHIPS
    }

    /// Length of the next ship to place, or `None` when the fleet is complete.
    ///
    /// This is the first prescribed length not yet represented, so a ship
    /// removed for editing is asked for again.
    pub fn next_length(&self) -> Option<usize> {
        if self.is_fleet_complete() {
            return None;
        }
        let mut placed = [0usize; GRID + 1];
        for ship in self.ships() {
            if let Some(count) = placed.get_mut(ship.length()) {
                *count += 1;
            }
        }
        FLEET.iter().map(|class| class.length()).find(|&len| {
            if placed[len] > 0 {
                placed[len] -= 1;
                false
            } else {
                true
            }
        })
    }

    /// Check whether a ship could be placed, without placing it.
    ///
    /// Rejects spans leaving the grid and any span whose one-cell halo
    /// touches an occupied cell, diagonals included.
    pub fn check_placement(
        &self,
        row: usize,
        col: usize,
        length: usize,
        direction: Direction,
    ) -> Result<Ship, BoardError> {
        if self.is_fleet_complete() {
            return Err(BoardError::FleetComplete);
        }
        let ship = Ship::new(row, col, length, direction)?;
        let halo = ship.mask().dilate();
        if !(self.own_waters.ship_mask() & halo).is_empty() {
            return Err(BoardError::TooClose);
        }
        Ok(ship)
    }

    /// Validate a placement and commit it to the end of the fleet.
    pub fn validate_and_place(
        &mut self,
        row: usize,
        col: usize,
        length: usize,
        direction: Direction,
    ) -> Result<(), BoardError> {
        let ship = self.check_placement(row, col, length, direction)?;
        self.commit(self.ship_count, ship);
        Ok(())
    }

    /// Place the next prescribed ship.
    pub fn place_next(&mut self, row: usize, col: usize, direction: Direction) -> Result<(), BoardError> {
        let length = self.next_length().ok_or(BoardError::FleetComplete)?;
        self.validate_and_place(row, col, length, direction)
    }

    /// Insert `ship` at `index`, shifting later ships back by one.
    fn commit(&mut self, index: usize, ship: Ship) {
        self.ships[index..=self.ship_count].rotate_right(1);
        self.ships[index] = Some(ship);
        self.ship_count += 1;
        self.own_waters.add_ships(ship.mask());
    }

    /// Lift the ship at `index` off the grid, keeping the others in order.
    pub fn remove_ship(&mut self, index: usize) -> Result<Ship, BoardError> {
        if index >= self.ship_count {
            return Err(BoardError::InvalidIndex);
        }
        let ship = self.ships[index].take().ok_or(BoardError::InvalidIndex)?;
        self.ships[index..self.ship_count].rotate_left(1);
        self.ship_count -= 1;
        self.own_waters.remove_ships(ship.mask());
        Ok(ship)
    }

    /// Move the ship at `index` to a new anchor and heading, keeping its
    /// length. On failure the original ship is put back where it was.
    pub fn edit_ship(
        &mut self,
        index: usize,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Result<(), BoardError> {
        let old = self.remove_ship(index)?;
        match self.check_placement(row, col, old.length(), direction) {
            Ok(ship) => {
                self.commit(self.ship_count, ship);
                Ok(())
            }
            Err(err) => {
                self.commit(index, old);
                Err(err)
            }
        }
    }

    /// Remove every ship and reset both grids.
    pub fn clear_fleet(&mut self) {
        self.ships = [None; NUM_SHIPS];
        self.ship_count = 0;
        self.ships_sunk = 0;
        self.own_waters.clear();
        self.attack_log.clear();
    }

    /// Lay out a complete prescribed fleet at random.
    pub fn place_random_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for _ in 0..FLEET_ATTEMPTS {
            self.clear_fleet();
            if self.try_random_fleet(rng) {
                return Ok(());
            }
        }
        self.clear_fleet();
        Err(BoardError::UnableToPlaceFleet)
    }

    fn try_random_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        for class in FLEET.iter() {
            let placed = (0..SHIP_ATTEMPTS).any(|_| {
                let row = rng.random_range(0..GRID);
                let col = rng.random_range(0..GRID);
                let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                self.validate_and_place(row, col, class.length(), direction).is_ok()
            });
            if !placed {
                return false;
            }
        }
        true
    }

    pub(crate) fn attack_log_mut(&mut self) -> &mut Grid {
        &mut self.attack_log
    }

    pub(crate) fn own_waters_mut(&mut self) -> &mut Grid {
        &mut self.own_waters
    }

    /// First unsunk ship whose span covers (`row`, `col`).
    pub(crate) fn afloat_ship_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Ship> {
        self.ships[..self.ship_count]
            .iter_mut()
            .flatten()
            .find(|ship| !ship.is_sunk() && ship.contains(row, col))
    }

    pub(crate) fn record_sinking(&mut self) {
        self.ships_sunk += 1;
    }

    /// Undo all battle damage: hit cells become ship cells again, the attack
    /// log is wiped and every ship is repaired.
    #[cfg(feature = "std")]
    pub(crate) fn reset_battle_state(&mut self) {
        self.own_waters.clear_shots();
        self.attack_log.clear();
        self.ships_sunk = 0;
        for ship in self.ships.iter_mut().flatten() {
            ship.repair();
        }
    }

    /// Check the invariants placement maintains. Players read back from a
    /// file go through this before anything indexes their fleet.
    #[cfg(feature = "std")]
    pub(crate) fn check_integrity(&self) -> Result<(), &'static str> {
        if self.ship_count > NUM_SHIPS {
            return Err("more ships than the fleet holds");
        }
        let (placed, free) = self.ships.split_at(self.ship_count);
        if placed.iter().any(Option::is_none) || free.iter().any(Option::is_some) {
            return Err("fleet slots do not match the ship count");
        }
        if !self.ships().all(Ship::is_well_formed) {
            return Err("ship with a bad length, position or damage");
        }
        if self.ships_sunk > self.ship_count {
            return Err("more ships sunk than placed");
        }
        let mask = self.ships().fold(BB::new(), |acc, ship| acc | ship.mask());
        if mask != self.own_waters.ship_mask() {
            return Err("ship cells do not match the fleet");
        }
        Ok(())
    }
}
