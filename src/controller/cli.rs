#![cfg(feature = "std")]

use std::fmt::Write as _;
use std::io::{self, BufRead, Read, StdinLock, Stdout, Write};
use std::mem;

use anyhow::{anyhow, Context};
use rand::rngs::SmallRng;
use zeroize::{Zeroize, Zeroizing};

use crate::{
    common::{BoardError, ShotResult},
    config::{class_name, GRID, MAX_PASSWORD_LEN, NUM_SHIPS},
    grid::{format_coord, parse_coord, row_label, CellState, Grid},
    layout::{load_layout, parse_placement, save_layout},
    player::Player,
    ship::Direction,
};

use super::{Controller, Target};

/// Read one line as a password.
///
/// Bytes go straight into a buffer of [`MAX_PASSWORD_LEN`] that is wiped on
/// drop and never grows; a longer line is consumed and refused. A trailing
/// `\r` is dropped.
pub fn read_secret<R: BufRead>(input: &mut R) -> anyhow::Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(MAX_PASSWORD_LEN));
    let mut too_long = false;
    let mut ended = false;
    for byte in input.bytes() {
        let byte = byte.context("reading password")?;
        if byte == b'\n' {
            ended = true;
            break;
        }
        if buf.len() == MAX_PASSWORD_LEN {
            too_long = true;
        } else {
            buf.push(byte);
        }
    }
    if !ended && buf.is_empty() {
        return Err(anyhow!("input closed"));
    }
    if too_long {
        return Err(anyhow!("password longer than {} bytes", MAX_PASSWORD_LEN));
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    match String::from_utf8(mem::take(&mut *buf)) {
        Ok(text) => Ok(Zeroizing::new(text)),
        Err(err) => {
            err.into_bytes().zeroize();
            Err(anyhow!("password is not valid UTF-8"))
        }
    }
}

/// Render a grid as text. Without `reveal`, unhit ship cells show as water.
pub fn render_grid(grid: &Grid, reveal: bool) -> String {
    let mut out = String::from("   ");
    for c in 1..=GRID {
        let _ = write!(out, "{:>3}", c);
    }
    out.push('\n');
    for r in 0..GRID {
        let _ = write!(out, "{}  ", row_label(r).unwrap_or('?'));
        for c in 0..GRID {
            let ch = match grid.cell(r, c) {
                Ok(CellState::Hit) => 'X',
                Ok(CellState::Miss) => 'o',
                Ok(CellState::Ship) if reveal => 'S',
                _ => '.',
            };
            let _ = write!(out, "{:>3}", ch);
        }
        out.push('\n');
    }
    out
}

/// Both boards of `player`: shots fired on top, own waters below.
pub fn render_player_view(player: &Player) -> String {
    format!(
        "Enemy waters:\n{}\nYour waters:\n{}",
        render_grid(player.attack_log(), false),
        render_grid(player.own_waters(), true)
    )
}

/// Placed ships, one per line, numbered from 1.
fn render_fleet(player: &Player) -> String {
    let mut out = String::new();
    for (i, ship) in player.ships().enumerate() {
        let (row, col) = ship.anchor();
        let _ = writeln!(
            out,
            "  {:>2}. {} ({}) at {} heading {}",
            i + 1,
            class_name(ship.length()).unwrap_or("Ship"),
            ship.length(),
            format_coord(row, col),
            ship.direction()
        );
    }
    out
}

fn parse_relative(input: &str) -> Option<Direction> {
    let digit: u8 = input.strip_prefix('+')?.parse().ok()?;
    Direction::from_index(digit.checked_sub(1)?)
}

/// Interactive terminal side.
pub struct CliController<R, W> {
    input: R,
    output: W,
}

impl CliController<StdinLock<'static>, Stdout> {
    /// Controller reading from stdin and writing to stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> CliController<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: impl AsRef<str>) -> anyhow::Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Prompt and read one trimmed line. A closed input is an error.
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).context("reading input")? == 0 {
            return Err(anyhow!("input closed"));
        }
        Ok(line.trim().to_owned())
    }

    /// Run one placement command against `player`.
    fn placement_command(
        &mut self,
        rng: &mut SmallRng,
        player: &mut Player,
        line: &str,
    ) -> anyhow::Result<()> {
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "show" => {
                let board = render_grid(player.own_waters(), true);
                let fleet = render_fleet(player);
                self.say(format!("{}{}", board, fleet))
            }
            "random" => match player.place_random_fleet(rng) {
                Ok(()) => self.say("Fleet placed at random."),
                Err(err) => self.say(format!("Error: {}", err)),
            },
            "load" if !rest.is_empty() => match load_layout(player, rest) {
                Ok(()) => self.say(format!("Layout loaded from {}.", rest)),
                Err(err) => self.say(format!("Error: {}", err)),
            },
            "save" if !rest.is_empty() => match save_layout(player, rest) {
                Ok(()) => self.say(format!("Layout saved to {}.", rest)),
                Err(err) => self.say(format!("Error: {}", err)),
            },
            "edit" => {
                let parsed = rest.split_once(char::is_whitespace).and_then(|(n, p)| {
                    let n: usize = n.parse().ok()?;
                    Some((n.checked_sub(1)?, parse_placement(p)?))
                });
                match parsed {
                    Some((index, p)) => match player.edit_ship(index, p.row, p.col, p.direction) {
                        Ok(()) => self.say("Ship moved."),
                        Err(err) => self.say(format!("Error: {}", err)),
                    },
                    None => self.say("Usage: edit <n> <coord> <0-3>"),
                }
            }
            "help" => self.say(PLACEMENT_HELP),
            _ => match parse_placement(line) {
                Some(p) => match player.place_next(p.row, p.col, p.direction) {
                    Ok(()) => self.say(format!("Placed at {}.", format_coord(p.row, p.col))),
                    Err(err) => self.say(format!("Error: {}", err)),
                },
                None => self.say("Unknown command. Type 'help' for the list."),
            },
        }
    }
}

const PLACEMENT_HELP: &str = "\
Commands:
  <coord> <dir>         place the next ship, e.g. `A1 3`
                        (0 = up, 1 = down, 2 = left, 3 = right)
  edit <n> <coord> <dir>  move ship n
  load <file>           load a layout file
  save <file>           save the current layout
  random                place the whole fleet at random
  show                  show your waters";

const TARGETING_HELP: &str = "\
Commands:
  <coord>   fire at a cell, e.g. `C7`
  +<1-4>    fire next to your last shot (1 = up, 2 = down, 3 = left, 4 = right)
  board     show both boards";

impl<R: BufRead, W: Write> Controller for CliController<R, W> {
    fn place_fleet(&mut self, rng: &mut SmallRng, player: &mut Player) -> anyhow::Result<()> {
        self.say(format!("\n{}, place your fleet. Type 'help' for commands.", player.name()))?;
        while !player.is_fleet_complete() {
            let prompt = match player.next_length() {
                Some(length) => format!(
                    "Ship {}/{}: {} (length {}) > ",
                    player.ship_count() + 1,
                    NUM_SHIPS,
                    class_name(length).unwrap_or("Ship"),
                    length
                ),
                None => "> ".to_owned(),
            };
            let line = self.ask(&prompt)?;
            if line.is_empty() {
                continue;
            }
            self.placement_command(rng, player, &line)?;
        }
        let board = render_grid(player.own_waters(), true);
        self.say(format!("{}All ships placed.", board))
    }

    fn select_target(&mut self, _rng: &mut SmallRng, me: &Player) -> anyhow::Result<Target> {
        loop {
            let line = self.ask(&format!("{}, target > ", me.name()))?;
            if line.eq_ignore_ascii_case("board") {
                let view = render_player_view(me);
                self.say(view)?;
            } else if line.eq_ignore_ascii_case("help") {
                self.say(TARGETING_HELP)?;
            } else if line.starts_with('+') {
                match parse_relative(&line) {
                    Some(direction) => return Ok(Target::Relative(direction)),
                    None => self.say("Use +1 (up), +2 (down), +3 (left) or +4 (right).")?,
                }
            } else if let Some((row, col)) = parse_coord(&line) {
                return Ok(Target::Cell(row, col));
            } else if !line.is_empty() {
                self.say("Invalid coordinate. Example: A5, J10")?;
            }
        }
    }

    fn handle_shot_result(&mut self, cell: (usize, usize), result: ShotResult) {
        let at = format_coord(cell.0, cell.1);
        let text = match result {
            ShotResult::Hit { sunk: true, ship_length } => format!(
                "{}: hit and sunk! ({}, length {}). Fire again.",
                at,
                class_name(ship_length).unwrap_or("Ship"),
                ship_length
            ),
            ShotResult::Hit { .. } => format!("{}: hit! Fire again.", at),
            ShotResult::Miss => format!("{}: miss.", at),
        };
        if let Err(err) = self.say(text) {
            log::warn!("cannot write to terminal: {}", err);
        }
    }

    fn handle_rejected(&mut self, err: BoardError) {
        let text = match err {
            BoardError::AlreadyAttacked => "You already fired there. Choose another cell.".to_owned(),
            BoardError::NoPreviousShot => "No previous shot to move from.".to_owned(),
            other => format!("Error: {}", other),
        };
        if let Err(err) = self.say(text) {
            log::warn!("cannot write to terminal: {}", err);
        }
    }
}
