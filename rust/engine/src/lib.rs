//! # fivepiles-engine: Five Piles Poker Core
//!
//! Rules engine for Five Piles, a two-player card game where each player
//! builds five poker hands ("piles") one card per turn. The match is decided
//! by comparing the piles pairwise; whoever wins more pairs wins the match.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text encoding
//! - [`deck`] - Seeded deck shuffling with ChaCha20 RNG
//! - [`game`] - Turn state machine: seats, draws, plays, end of game
//! - [`hand`] - Poker hand evaluation for piles of one to five cards
//! - [`scoring`] - Pile-by-pile comparison and match outcome
//! - [`view`] - Per-player projections that hide the opponent's hand
//! - [`logger`] - JSONL match records and replay
//! - [`errors`] - Rule rejections and invariant violations
//!
//! ## Quick Start
//!
//! ```rust
//! use fivepiles_engine::game::{DrawSource, Game, Role};
//!
//! let mut game = Game::new(Some(42));
//! game.join(Role::Player1, "alice").unwrap();
//! game.join(Role::Player2, "bob").unwrap();
//! game.start().unwrap();
//!
//! while !game.is_over() {
//!     let turn = game.current_turn().unwrap();
//!     if !game.draw_pool_exhausted() {
//!         game.draw(turn, DrawSource::Deck).or_else(|_| game.draw(turn, DrawSource::Exposed)).unwrap();
//!     }
//!     let card = game.hand(turn)[0];
//!     let pile = game.piles(turn).iter().position(|p| !p.is_full()).unwrap();
//!     game.play(turn, card, pile).unwrap();
//! }
//! println!("winner: {:?}", game.result().unwrap().winner);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The same seed always produces the same deal:
//!
//! ```rust
//! use fivepiles_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert!(a.cards().eq(b.cards()));
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod scoring;
pub mod view;
