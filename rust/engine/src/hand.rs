use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, Rank, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        };
        f.write_str(name)
    }
}

/// Ranking of a pile. Field order makes the derived `Ord` compare category
/// first, then kickers high to low.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks, zero padded
    pub kickers: [u8; 5],
}

impl HandStrength {
    pub fn describe(&self) -> String {
        if self.category == Category::StraightFlush && self.kickers[0] == Rank::Ace as u8 {
            "Royal Flush".to_string()
        } else {
            self.category.to_string()
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandError {
    #[error("cannot evaluate an empty pile")]
    Empty,
    #[error("a hand holds at most 5 cards, got {0}")]
    TooManyCards(usize),
    #[error("card {0} appears twice")]
    DuplicateCard(Card),
}

/// Classifies up to five cards.
///
/// Piles left short at an irregular game end still need a ranking, so fewer
/// than five cards are accepted; such hands can only pair up, never make a
/// straight or a flush.
///
/// ```
/// use fivepiles_engine::cards::parse_cards;
/// use fivepiles_engine::hand::{evaluate_hand, Category};
///
/// let quads = evaluate_hand(&parse_cards("2h 2d 2c 2s 9h").unwrap()).unwrap();
/// assert_eq!(quads.category, Category::FourOfAKind);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<HandStrength, HandError> {
    if cards.is_empty() {
        return Err(HandError::Empty);
    }
    if cards.len() > 5 {
        return Err(HandError::TooManyCards(cards.len()));
    }
    for (i, c) in cards.iter().enumerate() {
        if cards[..i].contains(c) {
            return Err(HandError::DuplicateCard(*c));
        }
    }

    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_counts = [0u8; 4];
    for &c in cards {
        rank_counts[rank_val(c.rank) as usize] += 1;
        suit_counts[suit_index(c.suit)] += 1;
    }

    let full = cards.len() == 5;
    let flush = full && suit_counts.iter().any(|&n| n == 5);
    let straight = if full {
        straight_high(&rank_counts)
    } else {
        None
    };

    if let (true, Some(high)) = (flush, straight) {
        return Ok(HandStrength {
            category: Category::StraightFlush,
            kickers: [high, 0, 0, 0, 0],
        });
    }

    let groups = grouped_ranks(&rank_counts);
    let shape: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
    let ranks: Vec<u8> = groups.iter().map(|&(_, rank)| rank).collect();

    let category = match shape.as_slice() {
        [4, ..] => Category::FourOfAKind,
        [3, 2] => Category::FullHouse,
        _ if flush => Category::Flush,
        _ if straight.is_some() => Category::Straight,
        [3, ..] => Category::ThreeOfAKind,
        [2, 2, ..] => Category::TwoPair,
        [2, ..] => Category::OnePair,
        _ => Category::HighCard,
    };

    let kickers = match (category, straight) {
        (Category::Straight, Some(high)) => [high, 0, 0, 0, 0],
        _ => pad(&ranks),
    };

    Ok(HandStrength { category, kickers })
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

fn rank_val(r: Rank) -> u8 {
    r as u8
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// (count, rank) pairs sorted by count then rank, both descending.
fn grouped_ranks(rank_counts: &[u8; 15]) -> Vec<(u8, u8)> {
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    groups
}

/// High card of a five-distinct-rank run; the wheel (A-2-3-4-5) is five high.
fn straight_high(rank_counts: &[u8; 15]) -> Option<u8> {
    let mut mask: u16 = 0;
    for r in 2..=14u16 {
        if rank_counts[r as usize] == 1 {
            mask |= 1 << r;
        }
    }
    if mask.count_ones() != 5 {
        return None;
    }
    // Ace also plays low
    if (mask & (1 << 14)) != 0 {
        mask |= 1 << 1;
    }
    for high in (5..=14u16).rev() {
        let window = 0b11111u16 << (high - 4);
        if (mask & window) == window {
            return Some(high as u8);
        }
    }
    None
}

fn pad(ranks: &[u8]) -> [u8; 5] {
    let mut k = [0u8; 5];
    for (slot, &r) in k.iter_mut().zip(ranks) {
        *slot = r;
    }
    k
}
