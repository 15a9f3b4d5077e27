//! HEXAI Player - Computer players built on the search engines
//!
//! This crate turns the engines into players:
//! - AI configuration (engine choice, time budget, workers, seed)
//! - Strategy selection per position (opening, mirroring, graph, rollouts)
//! - Self-play game runner
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: GameRunner::play_game (orchestration)
//! - Level 2: ComputerPlayer::decide (strategy and engine)
//! - Level 3: mirroring, concession checks
//! - Level 4: utilities, configuration

mod config;
mod game_runner;
mod selector;

pub use config::{AiConfig, AiType, DEFAULT_TIME_BUDGET_SECS, TIME_SAFETY_FACTOR};
pub use game_runner::{GameOutcome, GameRunner};
pub use selector::{mirror_cell, ComputerPlayer, Strategy};
