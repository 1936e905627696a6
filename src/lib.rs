#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod attack;
mod bitboard;
mod common;
mod config;
pub mod controller;
mod grid;
mod player;
mod ship;
#[cfg(feature = "std")]
mod game;
#[cfg(feature = "std")]
pub mod layout;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod replay;
#[cfg(feature = "std")]
pub mod store;

pub use ai::*;
pub use attack::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use common::*;
pub use config::*;
pub use controller::{AiController, Controller, Target};
pub use grid::*;
pub use player::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use controller::{take_turn, CliController, Turn};
#[cfg(feature = "std")]
pub use game::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, LOG_ENV};
#[cfg(feature = "std")]
pub use replay::{MoveRecord, Playback, PlaybackStep, Replay, ReplayRecorder};
#[cfg(feature = "std")]
pub use store::{ReplayStore, StoreError};
