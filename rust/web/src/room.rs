use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::events::{EventBus, GameEvent};
use fivepiles_ai::{create_ai, AIOpponent, Move, UnknownOpponent};
use fivepiles_engine::cards::Card;
use fivepiles_engine::errors::GameError;
use fivepiles_engine::game::{DrawSource, Game, Role};
use fivepiles_engine::scoring::MatchResult;
use fivepiles_engine::view::{status_label, GameView, PerRole};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;
use warp::http::StatusCode;

pub type RoomId = String;
pub type PlayerToken = String;

pub const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(30 * 60);

/// Seat an AI opponent always takes.
const AI_ROLE: Role = Role::Player2;

// 42 draws and 50 plays is the longest possible game
const MAX_AI_STEPS: usize = 92;

/// Registry of live rooms. Each room serializes its own game behind a mutex;
/// distinct rooms never contend.
#[derive(Debug)]
pub struct RoomManager {
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,
    event_bus: Arc<EventBus>,
    room_ttl: Duration,
}

impl RoomManager {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self::with_ttl(event_bus, DEFAULT_ROOM_TTL)
    }

    pub fn with_ttl(event_bus: Arc<EventBus>, ttl: Duration) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            event_bus,
            room_ttl: ttl,
        }
    }

    pub fn room_ttl(&self) -> Duration {
        self.room_ttl
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn create_room(&self, config: RoomConfig) -> Result<RoomSummary, RoomError> {
        let ai = match &config.opponent_type {
            OpponentType::Ai(name) => Some(create_ai(name)?),
            OpponentType::Human => None,
        };
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            room_id = %id,
            opponent_type = %config.opponent_type.as_str(),
            seed = ?config.seed,
            "creating room"
        );

        let room = Arc::new(Room::new(id.clone(), config, ai)?);
        let summary = room.summary()?;
        self.rooms
            .write()
            .map_err(|_| RoomError::StoragePoisoned)?
            .insert(id, room);
        Ok(summary)
    }

    pub fn get_room(&self, room_id: &str) -> Result<Arc<Room>, RoomError> {
        let guard = self.rooms.read().map_err(|_| RoomError::StoragePoisoned)?;
        guard
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))
    }

    pub fn summary(&self, room_id: &str) -> Result<RoomSummary, RoomError> {
        self.live_room(room_id)?.summary()
    }

    /// Takes a seat (or a spectator slot) and returns the token used for
    /// every later action. The game starts once both seats are filled.
    pub fn join(&self, room_id: &str, request: JoinRequest) -> Result<JoinResponse, RoomError> {
        let room = self.live_room(room_id)?;
        let mut inner = room.lock()?;
        let token = Uuid::new_v4().to_string();

        let Some(role) = request.role.role() else {
            inner.tokens.insert(token.clone(), Participant::Spectator);
            tracing::info!(room_id = %room.id, "spectator joined");
            return Ok(JoinResponse {
                room_id: room.id.clone(),
                player_id: token,
                role: request.role,
                game_started: inner.game.is_started(),
            });
        };

        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| role.to_string());
        inner.game.join(role, name.clone())?;
        inner.tokens.insert(token.clone(), Participant::Player(role));
        tracing::info!(room_id = %room.id, role = %role, name = %name, "player joined");
        self.event_bus.broadcast(
            &room.id,
            GameEvent::PlayerJoined {
                room_id: room.id.clone(),
                role,
                name,
            },
        );

        if inner.game.is_ready() {
            self.start_game(&room, &mut inner)?;
        }

        Ok(JoinResponse {
            room_id: room.id.clone(),
            player_id: token,
            role: request.role,
            game_started: inner.game.is_started(),
        })
    }

    pub fn draw(
        &self,
        room_id: &str,
        token: &str,
        source: DrawSource,
    ) -> Result<DrawResponse, RoomError> {
        let room = self.live_room(room_id)?;
        let mut inner = room.lock()?;
        let role = inner.player_role(token)?;
        let card = inner.game.draw(role, source)?;
        self.announce_draw(&room, &inner.game, role, source, card);
        Ok(DrawResponse {
            card,
            exposed: inner.game.exposed(),
            deck_size: inner.game.deck_remaining(),
        })
    }

    /// Plays a card, then lets the AI opponent (if any) take its turns.
    /// A finished game is scored, announced and reset before this returns.
    pub fn play(
        &self,
        room_id: &str,
        token: &str,
        card: Card,
        pile: usize,
    ) -> Result<PlayResponse, RoomError> {
        let room = self.live_room(room_id)?;
        let mut inner = room.lock()?;
        let role = inner.player_role(token)?;
        inner.game.play(role, card, pile)?;
        self.announce_play(&room, role, card, pile);

        let result = match self.finish_if_over(&room, &mut inner)? {
            Some(result) => Some(result),
            None => self.ai_reply(&room, &mut inner),
        };
        Ok(PlayResponse {
            game_over: result.is_some(),
            result,
        })
    }

    /// Player-specific view for a token, or the spectator view without one.
    pub fn view(&self, room_id: &str, token: Option<&str>) -> Result<GameView, RoomError> {
        let room = self.live_room(room_id)?;
        let inner = room.lock()?;
        let viewer = match token {
            None => None,
            Some(token) => match inner.tokens.get(token) {
                Some(Participant::Player(role)) => Some(*role),
                Some(Participant::Spectator) => None,
                None => return Err(RoomError::UnknownPlayer(token.to_string())),
            },
        };
        Ok(inner.game.view(viewer))
    }

    /// Releases a token. A seated player leaving mid-game aborts the match
    /// without a result and resets the room.
    pub fn leave(&self, room_id: &str, token: &str) -> Result<(), RoomError> {
        let room = self.live_room(room_id)?;
        let mut inner = room.lock()?;
        let participant = inner
            .tokens
            .get(token)
            .copied()
            .ok_or_else(|| RoomError::UnknownPlayer(token.to_string()))?;

        let role = match participant {
            Participant::Spectator => {
                inner.tokens.remove(token);
                return Ok(());
            }
            Participant::Player(role) => role,
        };

        let game_aborted = inner.game.is_started();
        inner.game.abort(role)?;
        inner.tokens.remove(token);
        self.event_bus.broadcast(
            &room.id,
            GameEvent::PlayerDisconnected {
                room_id: room.id.clone(),
                role,
                game_aborted,
            },
        );

        if game_aborted {
            tracing::warn!(room_id = %room.id, role = %role, "player left mid-game, match aborted");
            self.reset_room(&room, &mut inner)?;
        } else {
            tracing::info!(room_id = %room.id, role = %role, "player left before start");
        }
        Ok(())
    }

    /// Result of the most recently completed game in the room.
    pub fn result(&self, room_id: &str) -> Result<MatchResult, RoomError> {
        let room = self.live_room(room_id)?;
        let inner = room.lock()?;
        inner
            .last_result
            .clone()
            .ok_or_else(|| RoomError::NoResult(room_id.to_string()))
    }

    pub fn delete_room(&self, room_id: &str) -> Result<(), RoomError> {
        match self.remove_room(room_id, "deleted")? {
            Some(_) => Ok(()),
            None => Err(RoomError::NotFound(room_id.to_string())),
        }
    }

    pub fn active_rooms(&self) -> Vec<RoomSummary> {
        let rooms: Vec<Arc<Room>> = match self.rooms.read() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(_) => return Vec::new(),
        };
        let mut summaries: Vec<RoomSummary> =
            rooms.iter().filter_map(|room| room.summary().ok()).collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    /// Drops rooms idle for longer than the TTL. Returns how many went.
    pub fn cleanup_expired_rooms(&self) -> usize {
        let mut expired = Vec::new();
        {
            let mut guard = match self.rooms.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, room| {
                if room.is_expired(self.room_ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for id in &expired {
            tracing::info!(room_id = %id, "room expired");
            self.close_room(id, "expired");
        }
        expired.len()
    }

    fn live_room(&self, room_id: &str) -> Result<Arc<Room>, RoomError> {
        let room = self.get_room(room_id)?;
        if room.is_expired(self.room_ttl) {
            self.remove_room(room_id, "expired")?;
            return Err(RoomError::Expired(room_id.to_string()));
        }
        room.touch();
        Ok(room)
    }

    fn remove_room(&self, room_id: &str, reason: &str) -> Result<Option<Arc<Room>>, RoomError> {
        let removed = match self.rooms.write() {
            Ok(mut guard) => guard.remove(room_id),
            Err(_) => return Err(RoomError::StoragePoisoned),
        };
        if removed.is_some() {
            tracing::info!(room_id = %room_id, reason = reason, "room closed");
            self.close_room(&room_id.to_string(), reason);
        }
        Ok(removed)
    }

    fn close_room(&self, room_id: &RoomId, reason: &str) {
        self.event_bus.broadcast(
            room_id,
            GameEvent::RoomClosed {
                room_id: room_id.clone(),
                reason: reason.to_string(),
            },
        );
        self.event_bus.drop_room(room_id);
    }

    fn start_game(&self, room: &Room, inner: &mut RoomInner) -> Result<(), RoomError> {
        inner.game.start()?;
        let first_turn = inner.game.current_turn().ok_or_else(|| {
            RoomError::Internal("started game has no current turn".to_string())
        })?;
        tracing::info!(
            room_id = %room.id,
            seed = inner.game.seed(),
            first_turn = %first_turn,
            "game started"
        );
        self.event_bus.broadcast(
            &room.id,
            GameEvent::GameStarted {
                room_id: room.id.clone(),
                first_turn,
                exposed: inner.game.exposed(),
                deck_size: inner.game.deck_remaining(),
            },
        );
        self.ai_reply(room, inner);
        Ok(())
    }

    /// Runs [`Self::drive_ai`] after a human action that is already applied.
    /// A failing AI leaves the game on its turn and is reported on the event
    /// stream; the human's action still succeeds.
    fn ai_reply(&self, room: &Room, inner: &mut RoomInner) -> Option<MatchResult> {
        match self.drive_ai(room, inner) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(room_id = %room.id, error = %err, "AI opponent stalled");
                self.event_bus.broadcast(
                    &room.id,
                    GameEvent::Error {
                        room_id: room.id.clone(),
                        message: format!("AI opponent stalled: {err}"),
                    },
                );
                None
            }
        }
    }

    /// Plays AI turns until a human is to move or the game ends.
    fn drive_ai(
        &self,
        room: &Room,
        inner: &mut RoomInner,
    ) -> Result<Option<MatchResult>, RoomError> {
        let Some(ai) = room.ai.as_deref() else {
            return Ok(None);
        };

        for _ in 0..MAX_AI_STEPS {
            match inner.game.current_turn() {
                Some(turn) if turn == AI_ROLE => {}
                _ => return Ok(None),
            }
            let view = inner.game.view(Some(AI_ROLE));
            let Some(mv) = ai.choose(&view) else {
                return Err(RoomError::Internal(format!(
                    "{} returned no move on its turn",
                    ai.name()
                )));
            };
            tracing::debug!(room_id = %room.id, ai = ai.name(), mv = ?mv, "AI move");
            match mv {
                Move::Draw(source) => {
                    let card = inner.game.draw(AI_ROLE, source)?;
                    self.announce_draw(room, &inner.game, AI_ROLE, source, card);
                }
                Move::Play { card, pile } => {
                    inner.game.play(AI_ROLE, card, pile)?;
                    self.announce_play(room, AI_ROLE, card, pile);
                    if let Some(result) = self.finish_if_over(room, inner)? {
                        return Ok(Some(result));
                    }
                }
            }
        }
        Ok(None)
    }

    fn finish_if_over(
        &self,
        room: &Room,
        inner: &mut RoomInner,
    ) -> Result<Option<MatchResult>, RoomError> {
        if !inner.game.is_over() {
            return Ok(None);
        }
        let result = inner.game.result()?.clone();
        tracing::info!(
            room_id = %room.id,
            winner = ?result.winner,
            player1_wins = result.player1_wins,
            player2_wins = result.player2_wins,
            "game over"
        );
        self.event_bus.broadcast(
            &room.id,
            GameEvent::GameOver {
                room_id: room.id.clone(),
                result: result.clone(),
            },
        );
        inner.last_result = Some(result.clone());
        inner.games_completed += 1;
        self.reset_room(room, inner)?;
        Ok(Some(result))
    }

    /// Fresh game with every seat empty; player tokens die, spectators stay.
    fn reset_room(&self, room: &Room, inner: &mut RoomInner) -> Result<(), RoomError> {
        inner.game.reset();
        inner
            .tokens
            .retain(|_, p| matches!(p, Participant::Spectator));
        room.seat_ai(&mut inner.game)?;
        tracing::debug!(room_id = %room.id, seed = inner.game.seed(), "room reset");
        Ok(())
    }

    fn announce_draw(&self, room: &Room, game: &Game, role: Role, source: DrawSource, card: Card) {
        self.event_bus.broadcast(
            &room.id,
            GameEvent::CardDrawn {
                room_id: room.id.clone(),
                role,
                source,
                card: (source == DrawSource::Exposed).then_some(card),
                exposed: game.exposed(),
                deck_size: game.deck_remaining(),
            },
        );
    }

    fn announce_play(&self, room: &Room, role: Role, card: Card, pile: usize) {
        self.event_bus.broadcast(
            &room.id,
            GameEvent::CardPlayed {
                room_id: room.id.clone(),
                role,
                card,
                pile,
            },
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Participant {
    Player(Role),
    Spectator,
}

struct RoomInner {
    game: Game,
    tokens: HashMap<PlayerToken, Participant>,
    last_result: Option<MatchResult>,
    games_completed: u64,
}

impl RoomInner {
    fn player_role(&self, token: &str) -> Result<Role, RoomError> {
        match self.tokens.get(token) {
            Some(Participant::Player(role)) => Ok(*role),
            Some(Participant::Spectator) => Err(RoomError::SpectatorCannotAct),
            None => Err(RoomError::UnknownPlayer(token.to_string())),
        }
    }
}

pub struct Room {
    id: RoomId,
    config: RoomConfig,
    inner: Mutex<RoomInner>,
    ai: Option<Box<dyn AIOpponent>>,
    created_at: String,
    last_active: Mutex<Instant>,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("created_at", &self.created_at)
            .field(
                "ai",
                &self.ai.as_ref().map(|ai| ai.name()).unwrap_or("none"),
            )
            .finish()
    }
}

impl Room {
    fn new(
        id: RoomId,
        config: RoomConfig,
        ai: Option<Box<dyn AIOpponent>>,
    ) -> Result<Self, RoomError> {
        let room = Self {
            id,
            inner: Mutex::new(RoomInner {
                game: Game::new(config.seed),
                tokens: HashMap::new(),
                last_result: None,
                games_completed: 0,
            }),
            config,
            ai,
            created_at: chrono::Utc::now().to_rfc3339(),
            last_active: Mutex::new(Instant::now()),
        };
        {
            let mut inner = room.lock()?;
            room.seat_ai(&mut inner.game)?;
        }
        Ok(room)
    }

    pub fn summary(&self) -> Result<RoomSummary, RoomError> {
        let inner = self.lock()?;
        Ok(RoomSummary {
            room_id: self.id.clone(),
            opponent_type: self.config.opponent_type.clone(),
            seed: self.config.seed,
            status: status_label(inner.game.status()).to_string(),
            seats: PerRole {
                player1: inner.game.occupant(Role::Player1).map(str::to_string),
                player2: inner.game.occupant(Role::Player2).map(str::to_string),
            },
            spectators: inner
                .tokens
                .values()
                .filter(|p| matches!(p, Participant::Spectator))
                .count(),
            games_completed: inner.games_completed,
            created_at: self.created_at.clone(),
        })
    }

    fn seat_ai(&self, game: &mut Game) -> Result<(), RoomError> {
        if let Some(ai) = &self.ai {
            game.join(AI_ROLE, format!("ai:{}", ai.name()))?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RoomInner>, RoomError> {
        self.inner.lock().map_err(|_| RoomError::StoragePoisoned)
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl Room {
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub opponent_type: OpponentType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpponentType {
    #[default]
    Human,
    Ai(String),
}

impl OpponentType {
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            OpponentType::Human => Cow::Borrowed("human"),
            OpponentType::Ai(name) => Cow::Owned(format!("ai:{name}")),
        }
    }
}

impl Serialize for OpponentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for OpponentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("human") {
            return Ok(OpponentType::Human);
        }
        if raw.eq_ignore_ascii_case("ai") {
            return Ok(OpponentType::Ai("baseline".into()));
        }
        if let Some(rest) = raw.strip_prefix("ai:") {
            if rest.is_empty() {
                return Ok(OpponentType::Ai("baseline".into()));
            }
            return Ok(OpponentType::Ai(rest.to_string()));
        }

        Err(serde::de::Error::custom(format!(
            "invalid opponent type: {raw}"
        )))
    }
}

/// Seat requested on join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatRequest {
    Player1,
    Player2,
    Spectator,
}

impl SeatRequest {
    pub fn role(self) -> Option<Role> {
        match self {
            SeatRequest::Player1 => Some(Role::Player1),
            SeatRequest::Player2 => Some(Role::Player2),
            SeatRequest::Spectator => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinRequest {
    pub role: SeatRequest,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinResponse {
    pub room_id: RoomId,
    /// Secret token identifying this participant in later requests
    pub player_id: PlayerToken,
    pub role: SeatRequest,
    pub game_started: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawResponse {
    pub card: Card,
    pub exposed: Option<Card>,
    pub deck_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayResponse {
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub opponent_type: OpponentType,
    pub seed: Option<u64>,
    pub status: String,
    pub seats: PerRole<Option<String>>,
    pub spectators: usize,
    pub games_completed: u64,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Room not found: {0}")]
    NotFound(RoomId),
    #[error("Room expired: {0}")]
    Expired(RoomId),
    #[error("Unknown player token: {0}")]
    UnknownPlayer(String),
    #[error("Spectators cannot act")]
    SpectatorCannotAct,
    #[error("No completed game in room {0}")]
    NoResult(RoomId),
    #[error(transparent)]
    Rule(#[from] GameError),
    #[error(transparent)]
    UnknownOpponent(#[from] UnknownOpponent),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Room storage poisoned")]
    StoragePoisoned,
}

fn rule_code(err: &GameError) -> &'static str {
    match err {
        GameError::RoleTaken(_) => "role_taken",
        GameError::SeatEmpty(_) => "seat_empty",
        GameError::NotEnoughPlayers => "not_enough_players",
        GameError::NotStarted => "game_not_started",
        GameError::AlreadyStarted => "game_already_started",
        GameError::GameFinished => "game_finished",
        GameError::NotOver => "game_not_over",
        GameError::NotPlayersTurn { .. } => "not_your_turn",
        GameError::AlreadyDrawn => "already_drawn",
        GameError::DrawRequired => "draw_required",
        GameError::EmptySource(_) => "empty_source",
        GameError::CardNotInHand(_) => "card_not_in_hand",
        GameError::InvalidPile(_) => "invalid_pile",
        GameError::PileFull { .. } => "pile_full",
        GameError::DeckExhausted { .. } => "deck_exhausted",
        GameError::ReplayMismatch { .. } => "replay_mismatch",
    }
}

impl IntoErrorResponse for RoomError {
    fn status_code(&self) -> StatusCode {
        match self {
            RoomError::NotFound(_) | RoomError::UnknownPlayer(_) | RoomError::NoResult(_) => {
                StatusCode::NOT_FOUND
            }
            RoomError::Expired(_) => StatusCode::GONE,
            RoomError::Rule(GameError::InvalidPile(_)) | RoomError::UnknownOpponent(_) => {
                StatusCode::BAD_REQUEST
            }
            RoomError::Rule(GameError::DeckExhausted { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            RoomError::Rule(_) | RoomError::SpectatorCannotAct => StatusCode::CONFLICT,
            RoomError::Internal(_) | RoomError::StoragePoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RoomError::NotFound(_) => "room_not_found",
            RoomError::Expired(_) => "room_expired",
            RoomError::UnknownPlayer(_) => "player_not_found",
            RoomError::SpectatorCannotAct => "spectator_cannot_act",
            RoomError::NoResult(_) => "no_result",
            RoomError::Rule(err) => rule_code(err),
            RoomError::UnknownOpponent(_) => "unknown_opponent",
            RoomError::Internal(_) => "internal_error",
            RoomError::StoragePoisoned => "room_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            RoomError::NotFound(id) | RoomError::NoResult(id) => {
                Some(serde_json::json!({ "room_id": id }))
            }
            RoomError::Expired(id) => Some(serde_json::json!({
                "room_id": id,
                "reason": "Room expired due to inactivity"
            })),
            RoomError::Rule(GameError::NotPlayersTurn { expected, .. }) => {
                Some(serde_json::json!({ "current_turn": expected }))
            }
            RoomError::Rule(GameError::PileFull { pile }) => {
                Some(serde_json::json!({ "pile": pile }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            RoomError::StoragePoisoned => ErrorSeverity::Critical,
            RoomError::Internal(_) | RoomError::Rule(GameError::DeckExhausted { .. }) => {
                ErrorSeverity::Server
            }
            _ => ErrorSeverity::Client,
        }
    }
}
