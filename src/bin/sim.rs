use std::path::PathBuf;

use broadside::{
    init_logging_with, take_turn, AiController, Controller, GameSession, GameStatus, Player,
    ReplayStore,
};
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Play one computer-vs-computer game and print a JSON summary.
#[derive(Parser)]
struct Args {
    seed1: u64,
    seed2: u64,
    /// Save the replay into this directory.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging_with(log::LevelFilter::Warn);
    let args = Args::parse();

    let mut rngs = [
        SmallRng::seed_from_u64(args.seed1),
        SmallRng::seed_from_u64(args.seed2),
    ];
    let mut controllers = [AiController::new(), AiController::new()];
    let mut players = [Player::computer("player1"), Player::computer("player2")];
    for i in 0..2 {
        controllers[i].place_fleet(&mut rngs[i], &mut players[i])?;
    }

    let [p1, p2] = players;
    let mut game = GameSession::new(p1, p2)?;
    let mut shots = [0usize; 2];
    let mut hits = [0usize; 2];
    while !game.is_over() {
        let idx = game.turn();
        let turn = take_turn(&mut game, &mut controllers[idx], &mut rngs[idx])?;
        shots[idx] += 1;
        if turn.result.is_hit() {
            hits[idx] += 1;
        }
    }

    let winner = match game.status() {
        GameStatus::Won(0) => Some("player1"),
        GameStatus::Won(_) => Some("player2"),
        GameStatus::InProgress => None,
    };
    let moves = game.history().moves().len();
    let replay = game.finish();

    let saved = match args.save {
        Some(dir) => Some(ReplayStore::new(dir).save_plain(&replay)?),
        None => None,
    };

    let result = json!({
        "player1": {"shots": shots[0], "hits": hits[0]},
        "player2": {"shots": shots[1], "hits": hits[1]},
        "moves": moves,
        "winner": winner,
        "replay": saved.map(|path| path.display().to_string()),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
