use thiserror::Error;

use crate::cards::Card;
use crate::game::{DrawSource, Role};

/// Rule rejections. Every variant is recoverable and is returned before any
/// state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("seat {0} is already taken")]
    RoleTaken(Role),
    #[error("seat {0} is empty")]
    SeatEmpty(Role),
    #[error("both seats must be filled before the game can start")]
    NotEnoughPlayers,
    #[error("game has not started")]
    NotStarted,
    #[error("game already started")]
    AlreadyStarted,
    #[error("game is finished")]
    GameFinished,
    #[error("game is not over yet")]
    NotOver,
    #[error("it's not {actual}'s turn (expected {expected})")]
    NotPlayersTurn { expected: Role, actual: Role },
    #[error("already drew a card this turn")]
    AlreadyDrawn,
    #[error("must draw a card before playing")]
    DrawRequired,
    #[error("cannot draw from the {0}: it is empty")]
    EmptySource(DrawSource),
    #[error("card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("pile index {0} is out of range (0-4)")]
    InvalidPile(usize),
    #[error("pile {pile} is full")]
    PileFull { pile: usize },
    #[error("cannot deal {requested} cards, only {remaining} remain")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("action {index}: recorded draw {recorded} but the deck gives {replayed}")]
    ReplayMismatch {
        index: usize,
        recorded: Card,
        replayed: Card,
    },
}

/// A broken structural invariant. Unlike [`GameError`] this always means a
/// bug in the caller or the engine, never a user mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("expected 52 cards in play, found {0}")]
    CardCount(usize),
    #[error("{role} pile {pile} holds {len} cards")]
    PileOverflow { role: Role, pile: usize, len: usize },
    #[error("exposed slot is empty while {0} cards remain in the deck")]
    ExposedEmptyWithDeck(usize),
}
