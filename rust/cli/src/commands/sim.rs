//! Simulation command handler: AI-vs-AI matches.
//!
//! Every match gets its own seed drawn from a ChaCha20 stream seeded with the
//! base seed, so a `--seed` run is reproducible game for game. With
//! `--output` each finished match is appended as one JSONL [`MatchRecord`].
//!
//! # Environment Variables
//!
//! - `FIVEPILES_SIM_BREAK_AFTER`: stop after N games and report an interruption

use crate::commands::ai_step;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui::{self, outcome_label};
use chrono::Utc;
use fivepiles_ai::{AIOpponent, create_ai_with_seed};
use fivepiles_engine::game::{Game, Role};
use fivepiles_engine::logger::{MatchLogger, MatchRecord};
use fivepiles_engine::scoring::Outcome;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::io::Write;
use std::path::Path;

pub const BREAK_AFTER_ENV: &str = "FIVEPILES_SIM_BREAK_AFTER";

/// Win/tie counts over a batch of matches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub player1: u32,
    pub player2: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Player1 => self.player1 += 1,
            Outcome::Player2 => self.player2 += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.player1 + self.player2 + self.ties
    }
}

/// Plays one match to the end with `p1` and `p2` seated in that order.
pub fn play_match(
    seed: u64,
    p1: &dyn AIOpponent,
    p2: &dyn AIOpponent,
) -> Result<Game, CliError> {
    let mut game = Game::new(Some(seed));
    game.join(Role::Player1, p1.name())?;
    game.join(Role::Player2, p2.name())?;
    game.start()?;

    while let Some(turn) = game.current_turn() {
        let ai = match turn {
            Role::Player1 => p1,
            Role::Player2 => p2,
        };
        ai_step(&mut game, turn, ai)?;
    }
    Ok(game)
}

/// Handle the sim command.
///
/// # Arguments
///
/// * `games` - Number of matches, at least 1
/// * `seed` - Base seed for the per-match seed stream and the AIs
/// * `p1`, `p2` - AI names for each seat
/// * `output` - Optional JSONL file, truncated first
pub fn handle_sim_command(
    games: u32,
    seed: u64,
    p1: &str,
    p2: &str,
    output: Option<&Path>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }

    let mut seeds = ChaCha20Rng::seed_from_u64(seed);
    let ai1 = create_ai_with_seed(p1, seeds.random())
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let ai2 = create_ai_with_seed(p2, seeds.random())
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let mut logger = match output {
        Some(path) => {
            if path.exists() {
                ui::display_warning(
                    err,
                    &format!("{} exists and will be overwritten", path.display()),
                )?;
            }
            ensure_parent_dir(path)?;
            MatchLogger::create(path)?
        }
        None => MatchLogger::in_memory(&Utc::now().format("%Y%m%d").to_string()),
    };

    let break_after = std::env::var(BREAK_AFTER_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok());

    writeln!(
        out,
        "sim: games={} seed={} p1={} p2={}",
        games,
        seed,
        ai1.name(),
        ai2.name()
    )?;

    let mut tally = Tally::default();
    for _ in 0..games {
        let game = play_match(seeds.random(), ai1.as_ref(), ai2.as_ref())?;
        let outcome = game.result()?.winner;
        tally.record(outcome);

        let record = MatchRecord::from_game(logger.next_id(), &game);
        logger.write(&record)?;

        if let Some(limit) = break_after
            && tally.total() == limit
            && limit < games
        {
            writeln!(out, "Interrupted: saved {}/{}", tally.total(), games)?;
            return Err(CliError::Interrupted(format!(
                "stopped after {}/{} games",
                tally.total(),
                games
            )));
        }
    }

    writeln!(out, "Simulated: {} games", tally.total())?;
    writeln!(out, "P1 ({}) wins: {}", ai1.name(), tally.player1)?;
    writeln!(out, "P2 ({}) wins: {}", ai2.name(), tally.player2)?;
    writeln!(out, "Ties: {}", tally.ties)?;
    let leader = if tally.player1 > tally.player2 {
        Outcome::Player1
    } else if tally.player2 > tally.player1 {
        Outcome::Player2
    } else {
        Outcome::Tie
    };
    writeln!(out, "Leader: {}", outcome_label(leader))?;
    if let Some(path) = output {
        writeln!(out, "Records: {}", path.display())?;
    }
    Ok(())
}
