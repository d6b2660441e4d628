use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{Game, PileSet, Role, Status, TurnStep};
use crate::scoring::MatchResult;

/// A value held once per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerRole<T> {
    pub player1: T,
    pub player2: T,
}

impl<T> PerRole<T> {
    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Player1 => &self.player1,
            Role::Player2 => &self.player2,
        }
    }

    fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        Self {
            player1: f(Role::Player1),
            player2: f(Role::Player2),
        }
    }
}

/// What one participant is allowed to see of a game.
///
/// Piles, the exposed card and counts are public. Hand contents appear only
/// for the viewer's own seat; spectators see no hand at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub status: String,
    pub deck_size: usize,
    pub exposed: Option<Card>,
    pub you: Option<Role>,
    pub hand: Option<Vec<Card>>,
    pub opponent_hand_size: Option<usize>,
    pub hand_sizes: PerRole<usize>,
    pub piles: PerRole<PileSet>,
    pub current_turn: Option<Role>,
    pub turn_step: Option<TurnStep>,
    pub deck_exhausted: bool,
    pub seats: PerRole<Option<String>>,
    #[serde(default)]
    pub result: Option<MatchResult>,
}

impl GameView {
    /// True when the viewer holds the turn in a running game.
    pub fn is_my_turn(&self) -> bool {
        self.you.is_some() && self.you == self.current_turn
    }

    pub fn my_piles(&self) -> Option<&PileSet> {
        self.you.map(|r| self.piles.get(r))
    }
}

pub fn status_label(status: &Status) -> &'static str {
    match status {
        Status::WaitingForPlayers => "waiting_for_players",
        Status::Started { .. } => "started",
        Status::Over { .. } => "over",
        Status::Aborted { .. } => "aborted",
    }
}

impl Game {
    pub fn view(&self, viewer: Option<Role>) -> GameView {
        GameView {
            status: status_label(self.status()).to_string(),
            deck_size: self.deck_remaining(),
            exposed: self.exposed(),
            you: viewer,
            hand: viewer.map(|r| self.hand(r).to_vec()),
            opponent_hand_size: viewer.map(|r| self.hand(r.opponent()).len()),
            hand_sizes: PerRole::from_fn(|r| self.hand(r).len()),
            piles: PerRole::from_fn(|r| self.piles(r).clone()),
            current_turn: self.current_turn(),
            turn_step: self.turn_step(),
            deck_exhausted: self.draw_pool_exhausted(),
            seats: PerRole::from_fn(|r| self.occupant(r).map(str::to_string)),
            result: self.result().ok().cloned(),
        }
    }
}
