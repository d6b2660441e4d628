//! # fivepiles-ai: Automated Five Piles Opponents
//!
//! Opponents decide from a [`GameView`], the same projection a human player
//! gets, so they never see the other hand.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`baseline`] - Greedy pile builder
//! - [`random`] - Uniform choice over legal moves
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use fivepiles_ai::{create_ai, Move};
//! use fivepiles_engine::game::{Game, Role};
//!
//! let ai = create_ai("baseline").unwrap();
//!
//! let mut game = Game::new(Some(42));
//! game.join(Role::Player1, "ai").unwrap();
//! game.join(Role::Player2, "human").unwrap();
//! game.start().unwrap();
//!
//! let mv = ai.choose(&game.view(Some(Role::Player1)));
//! assert!(matches!(mv, Some(Move::Draw(_))));
//! ```
//!
//! ## AI Types
//!
//! - `"baseline"` - Builds the strongest piles it can, one card at a time
//! - `"random"` - Picks uniformly among legal moves

use fivepiles_engine::cards::Card;
use fivepiles_engine::game::{DrawSource, TurnStep};
use fivepiles_engine::view::GameView;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod baseline;
pub mod random;

/// One step of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Draw(DrawSource),
    Play { card: Card, pile: usize },
}

/// Trait defining the interface for AI opponents.
///
/// # Example Implementation
///
/// ```rust
/// use fivepiles_ai::{legal_moves, AIOpponent, Move};
/// use fivepiles_engine::view::GameView;
///
/// struct FirstLegal;
///
/// impl AIOpponent for FirstLegal {
///     fn choose(&self, view: &GameView) -> Option<Move> {
///         legal_moves(view).into_iter().next()
///     }
///
///     fn name(&self) -> &str {
///         "FirstLegal"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Next move for the viewer of `view`, or `None` when it is not their
    /// turn or the game is not running. A returned move is always legal.
    fn choose(&self, view: &GameView) -> Option<Move>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown AI type: {0} (expected one of: {expected})", expected = AI_NAMES.join(", "))]
pub struct UnknownOpponent(pub String);

pub const AI_NAMES: [&str; 2] = ["baseline", "random"];

/// Factory function to create AI opponents by type string.
///
/// ```rust
/// use fivepiles_ai::create_ai;
///
/// let ai = create_ai("baseline").unwrap();
/// assert_eq!(ai.name(), "BaselineAI");
/// assert!(create_ai("oracle").is_err());
/// ```
pub fn create_ai(ai_type: &str) -> Result<Box<dyn AIOpponent>, UnknownOpponent> {
    match ai_type.trim().to_ascii_lowercase().as_str() {
        "baseline" => Ok(Box::new(baseline::BaselineAI::new())),
        "random" => Ok(Box::new(random::RandomAI::new())),
        other => Err(UnknownOpponent(other.to_string())),
    }
}

/// Like [`create_ai`], but opponents that use randomness draw from a stream
/// seeded with `seed`, so simulations repeat exactly.
pub fn create_ai_with_seed(
    ai_type: &str,
    seed: u64,
) -> Result<Box<dyn AIOpponent>, UnknownOpponent> {
    match ai_type.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(Box::new(random::RandomAI::with_seed(seed))),
        _ => create_ai(ai_type),
    }
}

/// Every move the viewer may make right now.
pub fn legal_moves(view: &GameView) -> Vec<Move> {
    if !view.is_my_turn() {
        return Vec::new();
    }
    match view.turn_step {
        Some(TurnStep::MustDraw) => {
            let mut moves = Vec::with_capacity(2);
            if view.deck_size > 0 {
                moves.push(Move::Draw(DrawSource::Deck));
            }
            if view.exposed.is_some() {
                moves.push(Move::Draw(DrawSource::Exposed));
            }
            moves
        }
        Some(TurnStep::MustPlay) => {
            let (Some(hand), Some(piles)) = (view.hand.as_ref(), view.my_piles()) else {
                return Vec::new();
            };
            let open: Vec<usize> = piles
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.is_full())
                .map(|(i, _)| i)
                .collect();
            hand.iter()
                .flat_map(|&card| open.iter().map(move |&pile| Move::Play { card, pile }))
                .collect()
        }
        None => Vec::new(),
    }
}
