//! Command handler modules for the Five Piles CLI.
//!
//! Each command lives in its own file with the same shape:
//!
//! - Public handler: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin (`&mut dyn BufRead`) are
//!   passed in, so tests drive handlers with in-memory buffers
//! - Errors propagate as [`CliError`]

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod play;
pub mod sim;
pub mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
pub use verify::handle_verify_command;

use crate::error::CliError;
use fivepiles_ai::{AIOpponent, Move};
use fivepiles_engine::cards::Card;
use fivepiles_engine::errors::GameError;
use fivepiles_engine::game::{Game, Role};

/// Applies one move for `role`. Draws return the card taken.
pub(crate) fn apply_move(game: &mut Game, role: Role, mv: Move) -> Result<Option<Card>, GameError> {
    match mv {
        Move::Draw(source) => game.draw(role, source).map(Some),
        Move::Play { card, pile } => game.play(role, card, pile).map(|()| None),
    }
}

/// Asks `ai` for its move as `role` and applies it.
pub(crate) fn ai_step(
    game: &mut Game,
    role: Role,
    ai: &dyn AIOpponent,
) -> Result<(Move, Option<Card>), CliError> {
    let mv = ai.choose(&game.view(Some(role))).ok_or_else(|| {
        CliError::InvalidInput(format!("{} found no legal move as {}", ai.name(), role))
    })?;
    let drawn = apply_move(game, role, mv)?;
    Ok((mv, drawn))
}
