//! Controller trait and implementations
//!
//! A controller decides for one side of the game:
//! - AiController: random placement and hunt/target shooting
//! - CliController: interactive terminal player

use rand::rngs::SmallRng;

use crate::{
    common::{BoardError, ShotResult},
    player::Player,
    ship::Direction,
};

/// Where a controller wants to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An absolute cell (row, col).
    Cell(usize, usize),
    /// One step from this side's previous shot.
    Relative(Direction),
}

/// Interface implemented by the sides of a game.
pub trait Controller {
    /// Lay out a complete fleet on `player`.
    fn place_fleet(&mut self, rng: &mut SmallRng, player: &mut Player) -> anyhow::Result<()>;

    /// Choose the next shot. `me` is the side to move, with its own waters
    /// and attack log.
    fn select_target(&mut self, rng: &mut SmallRng, me: &Player) -> anyhow::Result<Target>;

    /// Inform the controller of the result of its last shot.
    fn handle_shot_result(&mut self, _cell: (usize, usize), _result: ShotResult) {}

    /// Inform the controller that its chosen target was refused.
    fn handle_rejected(&mut self, _err: BoardError) {}

    /// How many refused targets [`take_turn`] accepts before giving up.
    /// `None` keeps asking, which suits a person at a prompt.
    fn retry_limit(&self) -> Option<usize> {
        None
    }
}

pub mod ai;
pub use ai::AiController;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::CliController;

#[cfg(feature = "std")]
mod turn {
    use rand::rngs::SmallRng;

    use super::{Controller, Target};
    use crate::common::ShotResult;
    use crate::game::GameSession;

    /// A resolved shot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Turn {
        /// Index of the player who fired.
        pub player: usize,
        pub cell: (usize, usize),
        pub result: ShotResult,
    }

    /// Ask `controller` for a shot on behalf of the side to move and fire it,
    /// asking again while the target is refused, up to the controller's
    /// [`Controller::retry_limit`].
    pub fn take_turn(
        game: &mut GameSession,
        controller: &mut dyn Controller,
        rng: &mut SmallRng,
    ) -> anyhow::Result<Turn> {
        let player = game.turn();
        let limit = controller.retry_limit();
        let mut refused = 0usize;
        while limit.map_or(true, |limit| refused < limit) {
            let target = controller.select_target(rng, game.current())?;
            let fired = match target {
                Target::Cell(row, col) => game.fire(row, col),
                Target::Relative(direction) => game.fire_relative(direction),
            };
            match fired {
                Ok(result) => {
                    let cell = game
                        .last_shot_of(player)
                        .ok_or_else(|| anyhow::anyhow!("shot fired without a target"))?;
                    controller.handle_shot_result(cell, result);
                    return Ok(Turn {
                        player,
                        cell,
                        result,
                    });
                }
                Err(err) => {
                    refused += 1;
                    controller.handle_rejected(err);
                }
            }
        }
        Err(anyhow::anyhow!(
            "{} kept choosing invalid targets",
            game.current().name()
        ))
    }
}

#[cfg(feature = "std")]
pub use turn::{take_turn, Turn};
