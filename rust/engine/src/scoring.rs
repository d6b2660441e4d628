use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{Pile, PileSet, Role};
use crate::hand::{compare_hands, evaluate_hand, Category, HandStrength};

/// Winner of a single pile pair or of the whole match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Player1,
    Player2,
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Role> {
        match self {
            Outcome::Player1 => Some(Role::Player1),
            Outcome::Player2 => Some(Role::Player2),
            Outcome::Tie => None,
        }
    }
}

impl From<Ordering> for Outcome {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Greater => Outcome::Player1,
            Ordering::Less => Outcome::Player2,
            Ordering::Equal => Outcome::Tie,
        }
    }
}

/// One side of a scored pile pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileHand {
    pub cards: Vec<Card>,
    pub description: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileResult {
    pub pile: usize,
    pub player1: PileHand,
    pub player2: PileHand,
    pub winner: Outcome,
}

/// Final artifact of a match: per-pile outcomes plus the overall winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub piles: Vec<PileResult>,
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub winner: Outcome,
}

/// Scores every pile pair where both sides hold at least one card and
/// awards the match to whoever won strictly more pairs.
///
/// # Panics
///
/// Panics if a pile holds more than five cards or a repeated card. Play and
/// deserialization both reject such piles, so only `Pile::from_cards` in
/// tests can build one.
pub fn score_piles(player1: &PileSet, player2: &PileSet) -> MatchResult {
    let mut piles = Vec::with_capacity(player1.len());
    let mut player1_wins = 0;
    let mut player2_wins = 0;

    for (index, (a, b)) in player1.iter().zip(player2.iter()).enumerate() {
        if a.is_empty() || b.is_empty() {
            continue;
        }
        let (hand_a, strength_a) = pile_hand(a);
        let (hand_b, strength_b) = pile_hand(b);
        let winner = Outcome::from(compare_hands(&strength_a, &strength_b));
        match winner {
            Outcome::Player1 => player1_wins += 1,
            Outcome::Player2 => player2_wins += 1,
            Outcome::Tie => {}
        }
        piles.push(PileResult {
            pile: index,
            player1: hand_a,
            player2: hand_b,
            winner,
        });
    }

    MatchResult {
        piles,
        player1_wins,
        player2_wins,
        winner: Outcome::from(player1_wins.cmp(&player2_wins)),
    }
}

fn pile_hand(pile: &Pile) -> (PileHand, HandStrength) {
    let strength = match evaluate_hand(pile.cards()) {
        Ok(strength) => strength,
        Err(err) => panic!("pile cannot be scored: {err}"),
    };
    let hand = PileHand {
        cards: pile.cards().to_vec(),
        description: strength.describe(),
        category: strength.category,
    };
    (hand, strength)
}
