use std::collections::HashSet;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{GameError, InvariantViolation};
use crate::hand::HandError;
use crate::logger::{Action, ActionRecord};
use crate::scoring::{score_piles, MatchResult};

pub const PILE_COUNT: usize = 5;
pub const PILE_CAPACITY: usize = 5;
pub const OPENING_HAND: usize = 5;
const DECK_SIZE: usize = 52;

/// One of the two playing seats.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player1,
    Player2,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Player1, Role::Player2];

    pub fn opponent(self) -> Role {
        match self {
            Role::Player1 => Role::Player2,
            Role::Player2 => Role::Player1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Role::Player1 => 0,
            Role::Player2 => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Player1 => "player1",
            Role::Player2 => "player2",
        })
    }
}

/// Where a draw takes its card from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    Exposed,
}

impl fmt::Display for DrawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrawSource::Deck => "deck",
            DrawSource::Exposed => "exposed card",
        })
    }
}

/// Up to five cards placed face-up in order. Cards are never removed.
///
/// Deserializing goes through [`Pile::try_from`], so a pile read back from
/// JSON holds at most [`PILE_CAPACITY`] distinct cards just like one built
/// by play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Pile(Vec<Card>);

impl Pile {
    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= PILE_CAPACITY
    }

    fn push(&mut self, card: Card) {
        self.0.push(card);
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

impl TryFrom<Vec<Card>> for Pile {
    type Error = HandError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        if cards.len() > PILE_CAPACITY {
            return Err(HandError::TooManyCards(cards.len()));
        }
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
            return Err(HandError::DuplicateCard(*dup));
        }
        Ok(Self(cards))
    }
}

impl From<Pile> for Vec<Card> {
    fn from(pile: Pile) -> Self {
        pile.0
    }
}

pub type PileSet = [Pile; PILE_COUNT];

/// What the active player owes before the turn passes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStep {
    MustDraw,
    MustPlay,
}

/// Lifecycle of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    WaitingForPlayers,
    Started { turn: Role, drawn: bool },
    Over { result: MatchResult },
    Aborted { vacated: Role },
}

#[derive(Debug, Clone)]
struct Occupant {
    player_id: String,
    joined: u64,
}

/// Rules engine for one match of Five Piles.
///
/// Every operation validates completely before mutating, so a rejected action
/// leaves the game exactly as it was. The machine is not internally
/// synchronized; callers serialize access per game.
///
/// ```
/// use fivepiles_engine::game::{DrawSource, Game, Role, TurnStep};
///
/// let mut game = Game::new(Some(7));
/// game.join(Role::Player1, "alice").unwrap();
/// game.join(Role::Player2, "bob").unwrap();
/// game.start().unwrap();
/// assert_eq!(game.deck_remaining(), 41);
///
/// let turn = game.current_turn().unwrap();
/// assert_eq!(game.turn_step(), Some(TurnStep::MustDraw));
/// let card = game.draw(turn, DrawSource::Deck).unwrap();
/// game.play(turn, card, 0).unwrap();
/// assert_eq!(game.current_turn(), Some(turn.opponent()));
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    seed: u64,
    deck: Deck,
    exposed: Option<Card>,
    seats: [Option<Occupant>; 2],
    hands: [Vec<Card>; 2],
    piles: [PileSet; 2],
    status: Status,
    join_seq: u64,
    history: Vec<ActionRecord>,
}

impl Game {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            seed,
            deck: Deck::new_with_seed(seed),
            exposed: None,
            seats: [None, None],
            hands: [Vec::new(), Vec::new()],
            piles: Default::default(),
            status: Status::WaitingForPlayers,
            join_seq: 0,
            history: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn occupant(&self, role: Role) -> Option<&str> {
        self.seats[role.index()]
            .as_ref()
            .map(|o| o.player_id.as_str())
    }

    pub fn role_of(&self, player_id: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|r| self.occupant(*r) == Some(player_id))
    }

    pub fn is_ready(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    pub fn is_started(&self) -> bool {
        matches!(self.status, Status::Started { .. })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.status, Status::Aborted { .. })
    }

    pub fn current_turn(&self) -> Option<Role> {
        match self.status {
            Status::Started { turn, .. } => Some(turn),
            _ => None,
        }
    }

    pub fn turn_step(&self) -> Option<TurnStep> {
        match self.status {
            Status::Started { drawn, .. } => Some(if drawn || self.draw_pool_exhausted() {
                TurnStep::MustPlay
            } else {
                TurnStep::MustDraw
            }),
            _ => None,
        }
    }

    /// Deck and exposed slot both empty: draws are impossible from now on.
    pub fn draw_pool_exhausted(&self) -> bool {
        self.deck.is_empty() && self.exposed.is_none()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn exposed(&self) -> Option<Card> {
        self.exposed
    }

    pub fn hand(&self, role: Role) -> &[Card] {
        &self.hands[role.index()]
    }

    pub fn piles(&self, role: Role) -> &PileSet {
        &self.piles[role.index()]
    }

    pub fn result(&self) -> Result<&MatchResult, GameError> {
        match &self.status {
            Status::Over { result } => Ok(result),
            _ => Err(GameError::NotOver),
        }
    }

    /// Seats a player. Only possible while waiting for players.
    pub fn join(&mut self, role: Role, player_id: impl Into<String>) -> Result<Role, GameError> {
        self.ensure_waiting()?;
        if self.seats[role.index()].is_some() {
            return Err(GameError::RoleTaken(role));
        }
        self.join_seq += 1;
        let player_id = player_id.into();
        tracing::debug!(role = %role, player_id = %player_id, "player seated");
        self.seats[role.index()] = Some(Occupant {
            player_id,
            joined: self.join_seq,
        });
        Ok(role)
    }

    /// Shuffles, deals five cards to each seat in join order, turns up the
    /// exposed card and hands the first turn to whoever joined first.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.ensure_waiting()?;
        let order = self.join_order().ok_or(GameError::NotEnoughPlayers)?;

        let mut deck = Deck::new_with_seed(self.seed);
        deck.shuffle();
        let mut hands: [Vec<Card>; 2] = [Vec::new(), Vec::new()];
        for role in order {
            hands[role.index()] = deck.deal(OPENING_HAND)?;
        }
        let exposed = deck.deal(1)?.pop();

        self.deck = deck;
        self.hands = hands;
        self.exposed = exposed;
        self.piles = Default::default();
        self.history.clear();
        self.status = Status::Started {
            turn: order[0],
            drawn: false,
        };
        tracing::debug!(
            seed = self.seed,
            first_turn = %order[0],
            deck_remaining = self.deck.remaining(),
            "game started"
        );
        self.debug_check();
        Ok(())
    }

    /// Takes one card into the acting player's hand. Drawing the exposed card
    /// refills the slot from the deck top.
    pub fn draw(&mut self, role: Role, source: DrawSource) -> Result<Card, GameError> {
        let (turn, drawn) = self.active_turn()?;
        if role != turn {
            return Err(GameError::NotPlayersTurn {
                expected: turn,
                actual: role,
            });
        }
        if drawn {
            return Err(GameError::AlreadyDrawn);
        }
        let card = match source {
            DrawSource::Deck => self.deck.draw(),
            DrawSource::Exposed => {
                let card = self.exposed.take();
                if card.is_some() {
                    self.exposed = self.deck.draw();
                }
                card
            }
        }
        .ok_or(GameError::EmptySource(source))?;

        self.hands[role.index()].push(card);
        self.status = Status::Started { turn, drawn: true };
        self.history.push(ActionRecord {
            role,
            action: Action::Draw { source, card },
        });
        tracing::debug!(
            role = %role,
            source = %source,
            deck_remaining = self.deck.remaining(),
            exhausted = self.draw_pool_exhausted(),
            "card drawn"
        );
        self.debug_check();
        Ok(card)
    }

    /// Moves `card` from the acting player's hand onto their pile `pile`,
    /// passes the turn, and scores the match once the end condition holds.
    pub fn play(&mut self, role: Role, card: Card, pile: usize) -> Result<(), GameError> {
        let (turn, drawn) = self.active_turn()?;
        if role != turn {
            return Err(GameError::NotPlayersTurn {
                expected: turn,
                actual: role,
            });
        }
        if pile >= PILE_COUNT {
            return Err(GameError::InvalidPile(pile));
        }
        if !drawn && !self.draw_pool_exhausted() {
            return Err(GameError::DrawRequired);
        }
        let idx = role.index();
        let position = self.hands[idx]
            .iter()
            .position(|c| *c == card)
            .ok_or(GameError::CardNotInHand(card))?;
        if self.piles[idx][pile].is_full() {
            return Err(GameError::PileFull { pile });
        }

        self.hands[idx].remove(position);
        self.piles[idx][pile].push(card);
        self.history.push(ActionRecord {
            role,
            action: Action::Play { card, pile },
        });
        tracing::debug!(role = %role, card = %card, pile, "card played");

        if self.end_condition() {
            let result = score_piles(self.piles(Role::Player1), self.piles(Role::Player2));
            tracing::debug!(
                winner = ?result.winner,
                player1_wins = result.player1_wins,
                player2_wins = result.player2_wins,
                "game over"
            );
            self.status = Status::Over { result };
        } else {
            self.status = Status::Started {
                turn: turn.opponent(),
                drawn: false,
            };
        }
        self.debug_check();
        Ok(())
    }

    /// Removes a player. Mid-game this ends the match without a result.
    pub fn abort(&mut self, role: Role) -> Result<(), GameError> {
        match self.status {
            Status::Over { .. } | Status::Aborted { .. } => return Err(GameError::GameFinished),
            _ => {}
        }
        if self.seats[role.index()].take().is_none() {
            return Err(GameError::SeatEmpty(role));
        }
        if self.is_started() {
            self.status = Status::Aborted { vacated: role };
            tracing::debug!(role = %role, "game aborted");
        } else {
            tracing::debug!(role = %role, "player left before start");
        }
        Ok(())
    }

    /// Clears every seat and returns to `WaitingForPlayers` with the next seed
    /// in this game's stream.
    pub fn reset(&mut self) {
        let next_seed: u64 = ChaCha20Rng::seed_from_u64(self.seed).random();
        *self = Game::new(Some(next_seed));
    }

    /// Full structural check: the 52 cards are all accounted for exactly once
    /// and no pile exceeds capacity.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        let piled = self.piles.iter().flatten().flat_map(|p| p.cards());
        let all = self
            .deck
            .cards()
            .chain(self.exposed.iter())
            .chain(self.hands.iter().flatten())
            .chain(piled);
        for card in all {
            if !seen.insert(*card) {
                return Err(InvariantViolation::DuplicateCard(*card));
            }
        }
        if seen.len() != DECK_SIZE {
            return Err(InvariantViolation::CardCount(seen.len()));
        }
        for role in Role::ALL {
            for (pile, p) in self.piles(role).iter().enumerate() {
                if p.len() > PILE_CAPACITY {
                    return Err(InvariantViolation::PileOverflow {
                        role,
                        pile,
                        len: p.len(),
                    });
                }
            }
        }
        if !matches!(self.status, Status::WaitingForPlayers)
            && self.exposed.is_none()
            && !self.deck.is_empty()
        {
            return Err(InvariantViolation::ExposedEmptyWithDeck(
                self.deck.remaining(),
            ));
        }
        Ok(())
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            if let Err(violation) = self.check_invariants() {
                panic!("game invariant violated: {violation}");
            }
        }
    }

    fn end_condition(&self) -> bool {
        let all_full = self
            .piles
            .iter()
            .all(|set| set.iter().all(Pile::is_full));
        let nothing_left =
            self.draw_pool_exhausted() && self.hands.iter().all(|hand| hand.is_empty());
        all_full || nothing_left
    }

    fn ensure_waiting(&self) -> Result<(), GameError> {
        match self.status {
            Status::WaitingForPlayers => Ok(()),
            Status::Started { .. } => Err(GameError::AlreadyStarted),
            Status::Over { .. } | Status::Aborted { .. } => Err(GameError::GameFinished),
        }
    }

    fn active_turn(&self) -> Result<(Role, bool), GameError> {
        match self.status {
            Status::Started { turn, drawn } => Ok((turn, drawn)),
            Status::WaitingForPlayers => Err(GameError::NotStarted),
            Status::Over { .. } | Status::Aborted { .. } => Err(GameError::GameFinished),
        }
    }

    fn join_order(&self) -> Option<[Role; 2]> {
        let p1 = self.seats[0].as_ref()?.joined;
        let p2 = self.seats[1].as_ref()?.joined;
        Some(if p1 <= p2 {
            [Role::Player1, Role::Player2]
        } else {
            [Role::Player2, Role::Player1]
        })
    }

    #[cfg(test)]
    pub(crate) fn force_state(
        &mut self,
        deck_cards: usize,
        exposed: bool,
        hands: [Vec<Card>; 2],
        turn: Role,
    ) {
        let mut rest = crate::cards::full_deck();
        rest.retain(|c| !hands.iter().flatten().any(|h| h == c));
        let deck_part = rest.split_off(rest.len() - deck_cards);
        self.exposed = if exposed { rest.pop() } else { None };
        self.deck = Deck::from_cards(deck_part);
        // everything else is spread over the piles, player1 first
        self.piles = Default::default();
        for (slot, card) in rest.into_iter().enumerate() {
            self.piles[slot % 2][(slot / 2) % PILE_COUNT].push(card);
        }
        self.hands = hands;
        self.status = Status::Started { turn, drawn: false };
    }
}
