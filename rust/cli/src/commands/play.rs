//! # Play Command
//!
//! Interactive Five Piles on stdin, either against an AI seated as player2
//! or hot-seat between two people sharing the terminal.
//!
//! Input, one command per line:
//!
//! - `d` draws the top card of the deck
//! - `x` takes the exposed card
//! - `p <card> <pile>` plays a card from hand onto pile 0-4
//! - `q` abandons the game
//!
//! Rejected moves print the reason and prompt again; the game is untouched.

use crate::cli::Vs;
use crate::commands::{ai_step, apply_move};
use crate::error::CliError;
use crate::io_utils::read_stdin_line;
use crate::ui::{self, seat_label};
use fivepiles_ai::{AIOpponent, Move, create_ai};
use fivepiles_engine::cards::Card;
use fivepiles_engine::game::{DrawSource, Game, Role, TurnStep};
use std::io::{BufRead, Write};

/// A parsed line of player input.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    Move(Move),
    Quit,
    Invalid(String),
}

/// Parses one input line.
///
/// ```rust
/// # use fivepiles_cli::commands::play::{parse_player_input, ParseResult};
/// use fivepiles_ai::Move;
/// use fivepiles_engine::game::DrawSource;
///
/// assert_eq!(parse_player_input("d"), ParseResult::Move(Move::Draw(DrawSource::Deck)));
/// assert_eq!(parse_player_input("q"), ParseResult::Quit);
/// assert!(matches!(
///     parse_player_input("p Qs 2"),
///     ParseResult::Move(Move::Play { pile: 2, .. })
/// ));
/// ```
pub fn parse_player_input(input: &str) -> ParseResult {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match first.to_ascii_lowercase().as_str() {
        "q" | "quit" => ParseResult::Quit,
        "d" | "deck" if parts.len() == 1 => ParseResult::Move(Move::Draw(DrawSource::Deck)),
        "x" | "exposed" if parts.len() == 1 => {
            ParseResult::Move(Move::Draw(DrawSource::Exposed))
        }
        "p" | "play" => {
            if parts.len() != 3 {
                return ParseResult::Invalid(
                    "Play needs a card and a pile (e.g., 'p Qs 2')".to_string(),
                );
            }
            let card: Card = match parts[1].parse() {
                Ok(card) => card,
                Err(e) => return ParseResult::Invalid(e.to_string()),
            };
            match parts[2].parse::<usize>() {
                Ok(pile) => ParseResult::Move(Move::Play { card, pile }),
                Err(_) => ParseResult::Invalid(format!("Invalid pile '{}'", parts[2])),
            }
        }
        _ => ParseResult::Invalid(format!(
            "Unrecognized command '{}'. Valid commands: d, x, p <card> <pile>, q",
            input.trim()
        )),
    }
}

/// Handle the play command.
///
/// Returns `CliError::Interrupted` when the player quits or input ends
/// before the game is over.
pub fn handle_play_command(
    vs: Vs,
    ai_name: &str,
    seed: u64,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let ai: Option<Box<dyn AIOpponent>> = match vs {
        Vs::Ai => Some(create_ai(ai_name).map_err(|e| CliError::InvalidInput(e.to_string()))?),
        Vs::Human => None,
    };

    let mut game = Game::new(Some(seed));
    game.join(Role::Player1, "you")?;
    let p2_name = ai.as_ref().map_or("P2", |a| a.name());
    game.join(Role::Player2, p2_name)?;
    game.start()?;

    writeln!(out, "play: vs={} seed={}", vs.as_str(), seed)?;
    if let Some(ai) = &ai {
        writeln!(out, "Opponent: {}", ai.name())?;
    }

    while !game.is_over() {
        let Some(turn) = game.current_turn() else {
            break;
        };

        if let Some(ai) = ai.as_deref()
            && turn == Role::Player2
        {
            let (mv, drawn) = ai_step(&mut game, turn, ai)?;
            write_move(out, "AI", mv, drawn)?;
            continue;
        }

        ui::write_table(out, &game.view(Some(turn)))?;
        let prompt = match game.turn_step() {
            Some(TurnStep::MustDraw) => "draw (d = deck, x = exposed, q = quit)",
            _ => "play (p <card> <pile>, q = quit)",
        };
        write!(out, "{} {}: ", seat_label(turn), prompt)?;
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            game.abort(turn)?;
            writeln!(out)?;
            return Err(CliError::Interrupted("input closed before the game ended".into()));
        };

        match parse_player_input(&line) {
            ParseResult::Move(mv) => match apply_move(&mut game, turn, mv) {
                Ok(drawn) => write_move(out, seat_label(turn), mv, drawn)?,
                Err(e) => ui::write_error(err, &e.to_string())?,
            },
            ParseResult::Quit => {
                game.abort(turn)?;
                writeln!(out, "Game abandoned.")?;
                return Err(CliError::Interrupted(format!(
                    "{} quit the game",
                    seat_label(turn)
                )));
            }
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }

    writeln!(out, "Game over.")?;
    let result = game.result()?;
    ui::write_result(out, result)?;
    Ok(())
}

fn write_move(
    out: &mut dyn Write,
    who: &str,
    mv: Move,
    drawn: Option<Card>,
) -> std::io::Result<()> {
    match (mv, drawn) {
        (Move::Draw(DrawSource::Exposed), Some(card)) => {
            writeln!(out, "{} takes the exposed {}", who, card)
        }
        (Move::Draw(DrawSource::Deck), Some(card)) if who != "AI" => {
            writeln!(out, "{} draws {}", who, card)
        }
        (Move::Draw(_), _) => writeln!(out, "{} draws from the deck", who),
        (Move::Play { card, pile }, _) => writeln!(out, "{} plays {} on pile {}", who, card, pile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Input that plays a whole game for player1: draw from the deck when
    /// allowed, then put the first hand card on the first open pile.
    fn scripted_game(seed: u64, ai: &str) -> String {
        let opponent = create_ai(ai).unwrap();
        let mut game = Game::new(Some(seed));
        game.join(Role::Player1, "you").unwrap();
        game.join(Role::Player2, opponent.name()).unwrap();
        game.start().unwrap();

        let mut script = String::new();
        while !game.is_over() {
            let turn = game.current_turn().unwrap();
            if turn == Role::Player2 {
                ai_step(&mut game, turn, opponent.as_ref()).unwrap();
                continue;
            }
            if game.turn_step() == Some(TurnStep::MustDraw) {
                let source = if game.deck_remaining() > 0 {
                    DrawSource::Deck
                } else {
                    DrawSource::Exposed
                };
                game.draw(turn, source).unwrap();
                script.push_str(if source == DrawSource::Deck { "d\n" } else { "x\n" });
            }
            let card = game.hand(turn)[0];
            let pile = game.piles(turn).iter().position(|p| !p.is_full()).unwrap();
            game.play(turn, card, pile).unwrap();
            script.push_str(&format!("p {} {}\n", card, pile));
        }
        script
    }

    #[test]
    fn test_parse_player_input() {
        assert_eq!(
            parse_player_input("X"),
            ParseResult::Move(Move::Draw(DrawSource::Exposed))
        );
        assert_eq!(
            parse_player_input("play 10h 4"),
            ParseResult::Move(Move::Play {
                card: "Th".parse().unwrap(),
                pile: 4
            })
        );
        assert!(matches!(parse_player_input(""), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_input("p Qs"), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_input("p Qs two"), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_input("p 1x 0"), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_input("d 3"), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_input("fold"), ParseResult::Invalid(_)));
    }

    #[test]
    fn test_play_quit_is_interrupted() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"q\n");

        let result = handle_play_command(Vs::Ai, "baseline", 42, &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::Interrupted(_))));

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("play: vs=ai seed=42"));
        assert!(output.contains("Opponent: BaselineAI"));
        assert!(output.contains("Game abandoned."));
    }

    #[test]
    fn test_play_eof_is_interrupted() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"");

        let result = handle_play_command(Vs::Human, "baseline", 1, &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::Interrupted(_))));
    }

    #[test]
    fn test_play_rejected_moves_reprompt() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        // play before drawing, nonsense, then quit
        let mut input = Cursor::new(b"p 2c 0\nbet 100\nq\n");

        let result = handle_play_command(Vs::Human, "baseline", 9, &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::Interrupted(_))));

        let errors = String::from_utf8(err).unwrap();
        let lines: Vec<&str> = errors.lines().collect();
        assert_eq!(lines.len(), 2, "{errors}");
        assert!(lines.iter().all(|l| l.starts_with("Error: ")));
        assert!(lines[1].contains("Unrecognized command"));
    }

    #[test]
    fn test_play_unknown_ai_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"");

        let result = handle_play_command(Vs::Ai, "gto", 1, &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_play_full_game_against_ai() {
        let script = scripted_game(2024, "baseline");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(script.into_bytes());

        handle_play_command(Vs::Ai, "baseline", 2024, &mut out, &mut err, &mut input).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Game over."));
        assert!(output.contains("Result: P1 "));
        assert_eq!(output.matches("AI plays ").count(), 25);
        assert!(err.is_empty(), "{}", String::from_utf8_lossy(&err));
    }

    #[test]
    fn test_ai_deck_draw_is_not_revealed() {
        let mut out = Vec::new();
        let card: Card = "Kd".parse().unwrap();
        write_move(&mut out, "AI", Move::Draw(DrawSource::Deck), Some(card)).unwrap();
        write_move(&mut out, "P1", Move::Draw(DrawSource::Deck), Some(card)).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "AI draws from the deck\nP1 draws Kd\n");
    }
}
