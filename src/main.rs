use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use broadside::{
    format_coord, init_logging, replay::Replay, store::ENCRYPTED_EXTENSION, take_turn,
    AiController, CliController, Controller, GameSession, GameStatus, Player, ReplayStore,
    ShotResult, DEFAULT_REPLAY_DIR,
};
use broadside::controller::cli::{read_secret, render_grid};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory where replays are saved and listed.
    #[arg(long, global = true, default_value = DEFAULT_REPLAY_DIR)]
    replay_dir: PathBuf,
    #[arg(long, global = true, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Play against the computer.
    Computer {
        #[arg(long, default_value = "Player")]
        name: String,
    },
    /// Two players taking turns at the same terminal.
    Versus {
        #[arg(long, default_value = "Player 1")]
        player1: String,
        #[arg(long, default_value = "Player 2")]
        player2: String,
    },
    /// Watch a saved replay.
    Replay {
        file: PathBuf,
        /// Wait for ENTER between moves.
        #[arg(long)]
        step: bool,
    },
    /// List saved replays.
    List,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let store = ReplayStore::new(&cli.replay_dir);

    match cli.command {
        Commands::Computer { name } => {
            distinct_names(&name, COMPUTER_NAME)?;
            let mut rng = seeded_rng(cli.seed);
            let replay = {
                let mut human = CliController::stdio();
                let mut computer = AiController::new();
                let mut controllers: [&mut dyn Controller; 2] = [&mut human, &mut computer];
                run_game(
                    [Player::new(name), Player::computer(COMPUTER_NAME)],
                    &mut controllers,
                    [0, 1],
                    &mut rng,
                )?
            };
            offer_save(&store, &replay)?;
        }
        Commands::Versus { player1, player2 } => {
            distinct_names(&player1, &player2)?;
            let mut rng = seeded_rng(cli.seed);
            let replay = {
                let mut terminal = CliController::stdio();
                let mut controllers: [&mut dyn Controller; 1] = [&mut terminal];
                run_game(
                    [Player::new(player1), Player::new(player2)],
                    &mut controllers,
                    [0, 0],
                    &mut rng,
                )?
            };
            offer_save(&store, &replay)?;
        }
        Commands::Replay { file, step } => {
            let replay = load_replay(&file)?;
            show_replay(&replay, step)?;
        }
        Commands::List => {
            let files = store.list()?;
            if files.is_empty() {
                println!("No replays in {}", store.dir().display());
            }
            for path in files {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

const COMPUTER_NAME: &str = "Computer";

/// Moves are logged by name, so the two sides must be told apart before
/// anyone places a ship.
fn distinct_names(first: &str, second: &str) -> anyhow::Result<()> {
    if first == second {
        anyhow::bail!("both players are named {:?}; pick another name", first);
    }
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

/// Place both fleets and play until one side is sunk. `seats[i]` picks the
/// controller for player `i`.
fn run_game(
    mut players: [Player; 2],
    controllers: &mut [&mut dyn Controller],
    seats: [usize; 2],
    rng: &mut SmallRng,
) -> anyhow::Result<Replay> {
    for (player, seat) in players.iter_mut().zip(seats) {
        controllers[seat].place_fleet(rng, player)?;
    }
    let [player1, player2] = players;
    let mut game = GameSession::new(player1, player2)?;

    let mut announced = None;
    while !game.is_over() {
        let idx = game.turn();
        if announced != Some(idx) {
            println!("\n--- {}'s turn ---", game.current().name());
            announced = Some(idx);
        }
        let turn = take_turn(&mut game, &mut *controllers[seats[idx]], rng)?;
        let shooter = &game.players()[turn.player];
        if shooter.is_computer() {
            println!(
                "{} fires at {}: {}",
                shooter.name(),
                format_coord(turn.cell.0, turn.cell.1),
                describe(turn.result)
            );
        }
    }
    if let GameStatus::Won(idx) = game.status() {
        let winner = &game.players()[idx];
        println!("\n{} wins after {} moves!", winner.name(), game.history().moves().len());
    }
    Ok(game.finish())
}

fn describe(result: ShotResult) -> &'static str {
    match result {
        ShotResult::Hit { sunk: true, .. } => "hit and sunk",
        ShotResult::Hit { .. } => "hit",
        ShotResult::Miss => "miss",
    }
}

fn prompt(text: &str) -> anyhow::Result<String> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("reading input")?;
    Ok(line.trim().to_owned())
}

fn read_password(text: &str) -> anyhow::Result<Zeroizing<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    read_secret(&mut io::stdin().lock())
}

fn offer_save(store: &ReplayStore, replay: &Replay) -> anyhow::Result<()> {
    let answer = prompt("Save replay? [e]ncrypted, [p]lain, [n]o: ")?;
    match answer.to_ascii_lowercase().as_str() {
        "e" | "encrypted" => loop {
            let password = read_password("Password: ")?;
            if password.is_empty() {
                println!("Password must not be empty.");
                continue;
            }
            let confirm = read_password("Repeat password: ")?;
            if *password != *confirm {
                println!("Passwords do not match.");
                continue;
            }
            let path = store.save_encrypted(replay, &password)?;
            println!("Replay saved to {}", path.display());
            return Ok(());
        },
        "p" | "plain" => {
            let path = store.save_plain(replay)?;
            println!("Replay saved to {}", path.display());
        }
        _ => println!("Replay discarded."),
    }
    Ok(())
}

fn load_replay(path: &Path) -> anyhow::Result<Replay> {
    let encrypted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == ENCRYPTED_EXTENSION);
    let replay = if encrypted {
        let password = read_password("Password: ")?;
        ReplayStore::load_encrypted(path, &password)?
    } else {
        ReplayStore::load_plain(path)?
    };
    Ok(replay)
}

fn show_replay(replay: &Replay, step: bool) -> anyhow::Result<()> {
    let [p1, p2] = replay.players();
    println!("{} vs {}", p1.name(), p2.name());
    println!("Started {}, ended {}", replay.start_time(), replay.end_time());

    let mut playback = replay.playback();
    while let Some(mv) = playback.step() {
        let record = mv.record;
        let (row, col) = record.target();
        let mut line = format!(
            "#{:<3} [{}] {} fires at {}: {}",
            mv.index + 1,
            record.timestamp,
            record.player_name,
            format_coord(row, col),
            describe(record.outcome())
        );
        if record.sunk {
            line.push_str(&format!(" (length {})", record.ship_length));
        }
        println!("{}", line);
        if step && playback.remaining() > 0 {
            prompt("")?;
        }
    }

    for player in playback.players() {
        println!("\n{}'s waters:\n{}", player.name(), render_grid(player.own_waters(), true));
    }
    match replay.winner() {
        Some(name) => println!("Winner: {}", name),
        None => println!("No winner (game abandoned)"),
    }
    Ok(())
}
