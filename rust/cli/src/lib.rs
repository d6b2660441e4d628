//! # Five Piles CLI Library
//!
//! Command-line front end for the Five Piles engine: deal and inspect
//! positions, classify piles, play interactively and run AI simulations whose
//! JSONL records can be verified by replay.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments, dispatches to a command handler and returns
//! the process exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["fivepiles", "sim", "--games", "10", "--seed", "7"];
//! let code = fivepiles_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Show the opening deal for a seed
//! - `eval`: Classify a pile and compare it with another
//! - `play`: Play a match on stdin against the AI or another human
//! - `sim`: Run AI-vs-AI matches and optionally record them
//! - `verify`: Replay recorded matches and check their results
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod ui;

use cli::{Commands, FivepilesCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command,
    handle_sim_command, handle_verify_command,
};

pub use cli::Vs;
pub use config::ConfigError;
pub use error::{BatchValidationError, CliError};

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// ```
/// use std::io;
/// let args = vec!["fivepiles", "eval", "Ah", "Kh", "Qh", "Jh", "Th"];
/// let mut out = Vec::new();
/// let code = fivepiles_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("Royal Flush"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match FivepilesCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Deal { seed } => {
            resolve_seed(seed).and_then(|seed| handle_deal_command(seed, out))
        }
        Commands::Eval { cards, vs } => handle_eval_command(&cards, &vs, out),
        Commands::Play { vs, ai, seed } => resolve_seed(seed).and_then(|seed| {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(vs, &ai, seed, out, err, &mut stdin_lock)
        }),
        Commands::Sim {
            games,
            seed,
            p1,
            p2,
            output,
        } => config::load().map_err(CliError::from).and_then(|cfg| {
            let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
            handle_sim_command(
                games.unwrap_or(cfg.games),
                seed,
                p1.as_deref().unwrap_or(&cfg.p1_ai),
                p2.as_deref().unwrap_or(&cfg.p2_ai),
                output.as_deref(),
                out,
                err,
            )
        }),
        Commands::Verify { input } => handle_verify_command(&input, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

/// Flag first, then configuration, then a random seed.
fn resolve_seed(flag: Option<u64>) -> Result<u64, CliError> {
    if let Some(seed) = flag {
        return Ok(seed);
    }
    let cfg = config::load()?;
    Ok(cfg.seed.unwrap_or_else(rand::random))
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut write_usage = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Five Piles Poker CLI")?;
        writeln!(err, "Usage: fivepiles <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in Commands::NAMES {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: fivepiles --help")
    };
    let _ = write_usage();
    exit_code::ERROR
}
