//! Terminal output helpers shared by the commands.

use std::io::Write;

use fivepiles_engine::cards::Card;
use fivepiles_engine::game::{PileSet, Role};
use fivepiles_engine::scoring::{MatchResult, Outcome};
use fivepiles_engine::view::GameView;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

pub fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn seat_label(role: Role) -> &'static str {
    match role {
        Role::Player1 => "P1",
        Role::Player2 => "P2",
    }
}

pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Player1 => "P1",
        Outcome::Player2 => "P2",
        Outcome::Tie => "tie",
    }
}

pub fn write_piles(out: &mut dyn Write, label: &str, piles: &PileSet) -> std::io::Result<()> {
    writeln!(out, "{} piles:", label)?;
    for (i, pile) in piles.iter().enumerate() {
        writeln!(out, "  [{}] {}", i, format_cards(pile.cards()))?;
    }
    Ok(())
}

/// Table seen from one seat: own hand and both rows of piles, never the
/// opponent's cards in hand.
pub fn write_table(out: &mut dyn Write, view: &GameView) -> std::io::Result<()> {
    let exposed = view
        .exposed
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "Deck: {}  Exposed: {}", view.deck_size, exposed)?;
    if let Some(you) = view.you {
        let opponent = you.opponent();
        write_piles(out, &format!("Opponent ({})", seat_label(opponent)), view.piles.get(opponent))?;
        write_piles(out, &format!("Your ({})", seat_label(you)), view.piles.get(you))?;
        if let Some(hand) = &view.hand {
            writeln!(out, "Hand: {}", format_cards(hand))?;
        }
    } else {
        for role in Role::ALL {
            write_piles(out, seat_label(role), view.piles.get(role))?;
        }
    }
    Ok(())
}

pub fn write_result(out: &mut dyn Write, result: &MatchResult) -> std::io::Result<()> {
    for pile in &result.piles {
        writeln!(
            out,
            "Pile {}: P1 {} ({}) vs P2 {} ({}) -> {}",
            pile.pile,
            format_cards(&pile.player1.cards),
            pile.player1.description,
            format_cards(&pile.player2.cards),
            pile.player2.description,
            outcome_label(pile.winner)
        )?;
    }
    writeln!(
        out,
        "Result: P1 {} - {} P2, winner: {}",
        result.player1_wins,
        result.player2_wins,
        outcome_label(result.winner)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fivepiles_engine::cards::parse_cards;
    use fivepiles_engine::game::Game;

    #[test]
    fn test_format_cards() {
        let cards = parse_cards("Ah 10d 2c").unwrap();
        assert_eq!(format_cards(&cards), "Ah Td 2c");
        assert_eq!(format_cards(&[]), "-");
    }

    #[test]
    fn test_write_error_and_warning_prefixes() {
        let mut buf = Vec::new();
        write_error(&mut buf, "boom").unwrap();
        display_warning(&mut buf, "careful").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Error: boom\nWARNING: careful\n");
    }

    #[test]
    fn test_table_hides_opponent_hand() {
        let mut game = Game::new(Some(3));
        game.join(Role::Player1, "me").unwrap();
        game.join(Role::Player2, "them").unwrap();
        game.start().unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &game.view(Some(Role::Player1))).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Deck: 41"));
        assert!(text.contains(&format!("Hand: {}", format_cards(game.hand(Role::Player1)))));
        for card in game.hand(Role::Player2) {
            assert!(!text.contains(&card.to_string()), "leaked {card}");
        }
    }
}
