//! Deal command handler.
//!
//! Seats two players, starts a game and prints the opening position: both
//! hands, the exposed card, the deck size and who moves first.

use crate::error::CliError;
use crate::ui::{format_cards, seat_label};
use fivepiles_engine::game::{Game, Role};
use std::io::Write;

/// Handle the deal command.
///
/// The same seed always prints the same deal.
pub fn handle_deal_command(seed: u64, out: &mut dyn Write) -> Result<(), CliError> {
    let mut game = Game::new(Some(seed));
    game.join(Role::Player1, "P1")?;
    game.join(Role::Player2, "P2")?;
    game.start()?;

    let exposed = game
        .exposed()
        .ok_or_else(|| CliError::InvalidInput("no exposed card after the deal".into()))?;

    writeln!(out, "Seed: {}", game.seed())?;
    for role in Role::ALL {
        writeln!(
            out,
            "Hand {}: {}",
            seat_label(role),
            format_cards(game.hand(role))
        )?;
    }
    writeln!(out, "Exposed: {}", exposed)?;
    writeln!(out, "Deck: {}", game.deck_remaining())?;
    if let Some(turn) = game.current_turn() {
        writeln!(out, "First turn: {}", seat_label(turn))?;
    }
    Ok(())
}
