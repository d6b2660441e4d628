//! Eval command handler: classify a pile, optionally against another.

use crate::error::CliError;
use crate::ui::format_cards;
use fivepiles_engine::cards::{Card, parse_cards};
use fivepiles_engine::hand::{HandStrength, compare_hands, evaluate_hand};
use std::cmp::Ordering;
use std::io::Write;

/// Handle the eval command.
///
/// `cards` and `vs` are raw arguments; each may hold several cards separated
/// by commas. An empty `vs` evaluates the first pile alone.
pub fn handle_eval_command(
    cards: &[String],
    vs: &[String],
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let (first, first_strength) = classify(cards)?;
    writeln!(
        out,
        "Pile: {} => {}",
        format_cards(&first),
        first_strength.describe()
    )?;

    if vs.is_empty() {
        return Ok(());
    }

    let (second, second_strength) = classify(vs)?;
    writeln!(
        out,
        "Vs:   {} => {}",
        format_cards(&second),
        second_strength.describe()
    )?;
    let verdict = match compare_hands(&first_strength, &second_strength) {
        Ordering::Greater => "pile",
        Ordering::Less => "vs",
        Ordering::Equal => "tie",
    };
    writeln!(out, "Winner: {}", verdict)?;
    Ok(())
}

fn classify(args: &[String]) -> Result<(Vec<Card>, HandStrength), CliError> {
    let cards =
        parse_cards(&args.join(" ")).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let strength = evaluate_hand(&cards).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok((cards, strength))
}
