use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four suits in a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs (♣)
    Clubs,
    /// Diamonds (♦)
    Diamonds,
    /// Hearts (♥)
    Hearts,
    /// Spades (♠)
    Spades,
}

impl Suit {
    /// Lowercase letter used in the two-character card encoding.
    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Face value of a card from Two through Ace.
/// Discriminants equal the numeric rank so `rank as u8` orders cards for evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            // 2..=9 map onto their ASCII digit
            other => (b'0' + other as u8) as char,
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            d @ '2'..='9' => Rank::from_u8(d as u8 - b'0'),
            _ => None,
        }
    }
}

/// A single playing card. Immutable once created.
///
/// At every serialized boundary a card is its two-character encoding,
/// rank then lowercase suit: `"Ah"`, `"Td"`, `"2c"`.
///
/// ```
/// use fivepiles_engine::cards::{Card, Rank, Suit};
///
/// let card: Card = "Qs".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Queen, Suit::Spades));
/// assert_eq!(card.to_string(), "Qs");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// The suit of the card
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardParseError {
    #[error("card `{0}` must be a rank followed by a suit, e.g. `Ah`")]
    Malformed(String),
    #[error("unknown rank in card `{0}`")]
    UnknownRank(String),
    #[error("unknown suit in card `{0}`")]
    UnknownSuit(String),
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        // "10h" is accepted as an alias for "Th"
        let (rank_part, suit_part) = match raw.char_indices().last() {
            Some((idx, _)) if idx > 0 => raw.split_at(idx),
            _ => return Err(CardParseError::Malformed(raw.to_string())),
        };
        let rank = match rank_part {
            "10" => Rank::Ten,
            r if r.chars().count() == 1 => r
                .chars()
                .next()
                .and_then(Rank::from_char)
                .ok_or_else(|| CardParseError::UnknownRank(raw.to_string()))?,
            _ => return Err(CardParseError::Malformed(raw.to_string())),
        };
        let suit = suit_part
            .chars()
            .next()
            .and_then(Suit::from_char)
            .ok_or_else(|| CardParseError::UnknownSuit(raw.to_string()))?;
        Ok(Card { rank, suit })
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parses a whitespace- or comma-separated list such as `"Ah Kh, Qh"`.
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { rank: r, suit: s });
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn encoding_round_trips_for_every_card() {
        for card in full_deck() {
            let text = card.to_string();
            assert_eq!(text.len(), 2, "{text} should be two characters");
            assert_eq!(text.parse::<Card>().unwrap(), card);
        }
    }

    #[test]
    fn parses_ten_alias_and_uppercase_suit() {
        assert_eq!(
            "10H".parse::<Card>().unwrap(),
            Card::new(Rank::Ten, Suit::Hearts)
        );
        assert_eq!(
            "td".parse::<Card>().unwrap(),
            Card::new(Rank::Ten, Suit::Diamonds)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "A".parse::<Card>(),
            Err(CardParseError::Malformed(_))
        ));
        assert!(matches!(
            "1h".parse::<Card>(),
            Err(CardParseError::UnknownRank(_))
        ));
        assert!(matches!(
            "Ax".parse::<Card>(),
            Err(CardParseError::UnknownSuit(_))
        ));
    }

    #[test]
    fn serde_uses_text_encoding() {
        let card = Card::new(Rank::Seven, Suit::Clubs);
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"7c\"");
        let back: Card = serde_json::from_str("\"7c\"").unwrap();
        assert_eq!(back, card);
        assert!(serde_json::from_str::<Card>("\"7x\"").is_err());
    }

    #[test]
    fn parse_cards_accepts_mixed_separators() {
        let cards = parse_cards("Ah Kh,Qh ,  Jh\tTh").unwrap();
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[4], Card::new(Rank::Ten, Suit::Hearts));
    }

    #[test]
    fn full_deck_is_52_unique() {
        let deck = full_deck();
        let unique: HashSet<_> = deck.iter().collect();
        assert_eq!(deck.len(), 52);
        assert_eq!(unique.len(), 52);
    }
}
