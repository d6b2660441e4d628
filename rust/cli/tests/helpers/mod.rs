//! Shared helpers for the CLI integration tests.
//!
//! - `cli_runner`: runs the compiled `fivepiles` binary in a scratch
//!   directory and captures exit code, stdout and stderr
//! - `scripted_input`: builds stdin that plays a whole game for player1

pub mod cli_runner;

use fivepiles_ai::create_ai;
use fivepiles_engine::game::{DrawSource, Game, Role, TurnStep};

/// Commands for player1 that finish a game against `ai` dealt from `seed`.
/// Player1 draws from the deck while it lasts and fills piles left to right.
#[allow(dead_code)]
pub fn scripted_input(seed: u64, ai: &str) -> String {
    let opponent = create_ai(ai).expect("known AI");
    let mut game = Game::new(Some(seed));
    game.join(Role::Player1, "you").unwrap();
    game.join(Role::Player2, opponent.name()).unwrap();
    game.start().unwrap();

    let mut script = String::new();
    while let Some(turn) = game.current_turn() {
        if turn == Role::Player2 {
            let mv = opponent.choose(&game.view(Some(turn))).expect("AI move");
            match mv {
                fivepiles_ai::Move::Draw(source) => {
                    game.draw(turn, source).unwrap();
                }
                fivepiles_ai::Move::Play { card, pile } => game.play(turn, card, pile).unwrap(),
            }
            continue;
        }
        if game.turn_step() == Some(TurnStep::MustDraw) {
            if game.deck_remaining() > 0 {
                game.draw(turn, DrawSource::Deck).unwrap();
                script.push_str("d\n");
            } else {
                game.draw(turn, DrawSource::Exposed).unwrap();
                script.push_str("x\n");
            }
        }
        let card = game.hand(turn)[0];
        let pile = game.piles(turn).iter().position(|p| !p.is_full()).unwrap();
        game.play(turn, card, pile).unwrap();
        script.push_str(&format!("p {} {}\n", card, pile));
    }
    script
}
