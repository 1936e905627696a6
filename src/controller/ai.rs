use crate::{
    ai::Hunter,
    common::{BoardError, ShotResult},
    config::GRID,
    player::Player,
};
use rand::rngs::SmallRng;

use super::{Controller, Target};

/// Computer side: random fleet placement and hunt/target shooting.
#[derive(Debug, Clone, Default)]
pub struct AiController {
    hunter: Hunter,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hunter(&self) -> &Hunter {
        &self.hunter
    }
}

impl Controller for AiController {
    fn place_fleet(&mut self, rng: &mut SmallRng, player: &mut Player) -> anyhow::Result<()> {
        player.place_random_fleet(rng).map_err(anyhow::Error::msg)
    }

    fn select_target(&mut self, rng: &mut SmallRng, me: &Player) -> anyhow::Result<Target> {
        let (row, col) = self.hunter.next_target(me.attack_log(), rng);
        Ok(Target::Cell(row, col))
    }

    fn handle_shot_result(&mut self, cell: (usize, usize), result: ShotResult) {
        self.hunter.observe(cell, result);
    }

    fn handle_rejected(&mut self, err: BoardError) {
        log::warn!("computer target refused: {}", err);
    }

    /// Every cell once; a computer that keeps missing the grid is stuck.
    fn retry_limit(&self) -> Option<usize> {
        Some(GRID * GRID)
    }
}
