//! Baseline AI implementation for Five Piles.
//!
//! Greedy and deterministic: every card goes where it raises a pile's value
//! the most, and the exposed card is taken only when it beats everything
//! already in hand.

use crate::{AIOpponent, Move, legal_moves};
use fivepiles_engine::cards::Card;
use fivepiles_engine::game::{DrawSource, Pile, PileSet, TurnStep};
use fivepiles_engine::hand::evaluate_hand;
use fivepiles_engine::view::GameView;

/// Simple baseline AI used as the default opponent and as a benchmark.
///
/// # Strategy
///
/// **Draw:** take the exposed card if placing it would gain more than the
/// best placement of any card already held, otherwise draw blind.
///
/// **Play:** score every (card, open pile) pair by how much the pile's value
/// rises and play the best one. Ties go to the lower pile index, then to
/// the card held longest.
///
/// # Example
///
/// ```rust
/// use fivepiles_ai::baseline::BaselineAI;
/// use fivepiles_ai::AIOpponent;
///
/// let ai = BaselineAI::new();
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselineAI;

impl BaselineAI {
    pub fn new() -> Self {
        Self
    }

    /// Made-hand value plus a bonus for partial piles that can still become
    /// a flush or a straight.
    fn pile_value(cards: &[Card]) -> i32 {
        let Ok(strength) = evaluate_hand(cards) else {
            return 0;
        };
        let mut value = strength.category as i32 * 100 + i32::from(strength.kickers[0]);
        let n = cards.len();
        if (2..5).contains(&n) {
            let suited = cards.iter().all(|c| c.suit == cards[0].suit);
            if suited {
                value += 15 * n as i32;
            }
            let ranks: Vec<u8> = cards.iter().map(|c| c.rank as u8).collect();
            let distinct = ranks
                .iter()
                .enumerate()
                .all(|(i, r)| !ranks[..i].contains(r));
            let (lo, hi) = (ranks.iter().min(), ranks.iter().max());
            if let (true, Some(lo), Some(hi)) = (distinct, lo, hi) {
                if hi - lo <= 4 {
                    value += 12 * n as i32;
                }
            }
        }
        value
    }

    fn gain(pile: &Pile, card: Card) -> i32 {
        let mut cards = pile.cards().to_vec();
        cards.push(card);
        Self::pile_value(&cards) - Self::pile_value(pile.cards())
    }

    /// Best (gain, pile) for `card`; `None` when every pile is full.
    fn best_placement(piles: &PileSet, card: Card) -> Option<(i32, usize)> {
        piles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_full())
            .map(|(i, p)| (Self::gain(p, card), i))
            // max by gain, lowest index on ties
            .fold(None, |best, (g, i)| match best {
                Some((bg, _)) if bg >= g => best,
                _ => Some((g, i)),
            })
    }

    fn decide_draw(view: &GameView, piles: &PileSet, hand: &[Card]) -> Option<Move> {
        let exposed_gain = view
            .exposed
            .and_then(|c| Self::best_placement(piles, c))
            .map(|(g, _)| g);
        let hand_gain = hand
            .iter()
            .filter_map(|&c| Self::best_placement(piles, c))
            .map(|(g, _)| g)
            .max();
        let take_exposed = match (exposed_gain, hand_gain) {
            (Some(e), Some(h)) => e > h,
            (Some(_), None) => true,
            _ => false,
        };
        if take_exposed || view.deck_size == 0 {
            view.exposed.map(|_| Move::Draw(DrawSource::Exposed))
        } else {
            Some(Move::Draw(DrawSource::Deck))
        }
    }

    fn decide_play(piles: &PileSet, hand: &[Card]) -> Option<Move> {
        let mut best: Option<(i32, Move)> = None;
        for &card in hand {
            if let Some((g, pile)) = Self::best_placement(piles, card) {
                if best.is_none_or(|(bg, _)| g > bg) {
                    best = Some((g, Move::Play { card, pile }));
                }
            }
        }
        best.map(|(_, mv)| mv)
    }
}

impl AIOpponent for BaselineAI {
    fn choose(&self, view: &GameView) -> Option<Move> {
        if !view.is_my_turn() {
            return None;
        }
        let hand = view.hand.as_deref()?;
        let piles = view.my_piles()?;
        let mv = match view.turn_step? {
            TurnStep::MustDraw => Self::decide_draw(view, piles, hand),
            TurnStep::MustPlay => Self::decide_play(piles, hand),
        };
        debug_assert!(mv.is_none_or(|m| legal_moves(view).contains(&m)));
        mv
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fivepiles_engine::cards::parse_cards;

    fn value(s: &str) -> i32 {
        BaselineAI::pile_value(&parse_cards(s).unwrap())
    }

    #[test]
    fn pairs_outvalue_draws_to_nothing() {
        assert!(value("9h 9d") > value("9h Kd"));
        assert!(value("9h Th Jh") > value("9h Td 2c"));
        assert!(value("Ah Ad Ac As 2h") > value("Kh Qh Jh Th 8h"));
        assert_eq!(value(""), 0);
    }

    #[test]
    fn pairs_up_with_existing_pile() {
        let piles: PileSet = serde_json::from_str(r#"[["2c"], ["9h"], ["Kd", "4s"], [], []]"#).unwrap();
        let hand = parse_cards("3d 9s Jc").unwrap();
        assert_eq!(
            BaselineAI::decide_play(&piles, &hand),
            Some(Move::Play {
                card: "9s".parse().unwrap(),
                pile: 1
            })
        );
    }

    #[test]
    fn takes_exposed_card_only_when_it_beats_the_hand() {
        let mut game = fivepiles_engine::game::Game::new(Some(3));
        game.join(fivepiles_engine::game::Role::Player1, "a").unwrap();
        game.join(fivepiles_engine::game::Role::Player2, "b").unwrap();
        game.start().unwrap();
        let mut view = game.view(Some(fivepiles_engine::game::Role::Player1));

        let piles: PileSet = serde_json::from_str(r#"[["Qh", "Qd"], ["Qc", "Qs"], ["5h", "5d"], ["8c", "8s"], []]"#).unwrap();
        let hand = parse_cards("2c 7d").unwrap();

        view.exposed = Some("2h".parse().unwrap());
        assert_eq!(
            BaselineAI::decide_draw(&view, &piles, &hand),
            Some(Move::Draw(DrawSource::Deck))
        );

        view.exposed = Some("5c".parse().unwrap());
        assert_eq!(
            BaselineAI::decide_draw(&view, &piles, &hand),
            Some(Move::Draw(DrawSource::Exposed))
        );
    }
}
