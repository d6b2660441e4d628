//! Command-line definitions for the `fivepiles` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fivepiles",
    version,
    about = "Five Piles Poker: deal, evaluate, play and simulate matches"
)]
pub struct FivepilesCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the opening deal for a seed
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Classify a pile of one to five cards, optionally against a second pile
    Eval {
        /// Cards such as `Ah Kh Qh Jh Th` (commas also separate)
        #[arg(required = true)]
        cards: Vec<String>,
        /// Pile to compare against
        #[arg(long, num_args = 1..)]
        vs: Vec<String>,
    },
    /// Play a match on stdin against the AI or another human
    Play {
        #[arg(long, value_enum, default_value_t = Vs::Ai)]
        vs: Vs,
        /// Opponent type when playing against the AI
        #[arg(long, default_value = "baseline")]
        ai: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run AI-vs-AI matches and tally the outcomes
    Sim {
        #[arg(long)]
        games: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// AI seated as player1
        #[arg(long)]
        p1: Option<String>,
        /// AI seated as player2
        #[arg(long)]
        p2: Option<String>,
        /// Write one JSONL match record per game
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay JSONL match records and check their results
    Verify {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print the resolved configuration with the source of each value
    Cfg,
}

impl Commands {
    pub const NAMES: &'static [&'static str] = &["deal", "eval", "play", "sim", "verify", "cfg"];
}

/// Opponent type for the `play` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    /// Two people sharing one terminal
    Human,
    /// The AI plays player2
    Ai,
}

impl Vs {
    /// ```
    /// # use fivepiles_cli::Vs;
    /// assert_eq!(Vs::Ai.as_str(), "ai");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Ai => "ai",
        }
    }
}
