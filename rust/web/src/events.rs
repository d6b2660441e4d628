//! Per-room fan-out of [`GameEvent`]s to server-sent event streams.

use crate::room::RoomId;
use fivepiles_engine::cards::Card;
use fivepiles_engine::game::{DrawSource, Role};
use fivepiles_engine::scoring::MatchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Per-subscriber queue depth. A subscriber whose queue is full is dropped
/// rather than slowing the room down.
const EVENT_CHANNEL_BUFFER: usize = 256;

type RoomSubscribers = HashMap<u64, mpsc::Sender<GameEvent>>;

/// Live feed for one room. Dropping it (or just its guard) unsubscribes.
pub struct EventSubscription {
    pub guard: SubscriptionGuard,
    pub receiver: mpsc::Receiver<GameEvent>,
}

pub struct SubscriptionGuard {
    bus: EventBus,
    room_id: RoomId,
    id: u64,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.room_id, self.id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    rooms: Arc<Mutex<HashMap<RoomId, RoomSubscribers>>>,
    ids: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, room_id: RoomId) -> EventSubscription {
        let (tx, receiver) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.ids.fetch_add(1, Ordering::Relaxed);
        self.rooms()
            .entry(room_id.clone())
            .or_default()
            .insert(id, tx);
        tracing::info!(room_id = %room_id, subscriber_id = id, "event stream opened");

        EventSubscription {
            guard: SubscriptionGuard {
                bus: self.clone(),
                room_id,
                id,
            },
            receiver,
        }
    }

    /// Never blocks: closed or saturated subscribers are removed on the spot.
    pub fn broadcast(&self, room_id: &RoomId, event: GameEvent) {
        let mut rooms = self.rooms();
        let Some(subscribers) = rooms.get_mut(room_id) else {
            return;
        };
        tracing::debug!(
            room_id = %room_id,
            event_type = event.kind(),
            subscribers = subscribers.len(),
            "broadcasting room event"
        );

        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(room_id = %room_id, subscriber_id = *id, error = %e, "dropping event subscriber");
                false
            }
        });
        if subscribers.is_empty() {
            rooms.remove(room_id);
        }
    }

    pub fn unsubscribe(&self, room_id: &RoomId, id: u64) {
        let mut rooms = self.rooms();
        if let Some(subscribers) = rooms.get_mut(room_id) {
            subscribers.remove(&id);
            if subscribers.is_empty() {
                rooms.remove(room_id);
            }
        }
    }

    /// Forgets every subscriber of a room; their streams end.
    pub fn drop_room(&self, room_id: &RoomId) {
        self.rooms().remove(room_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.rooms().values().map(HashMap::len).sum()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<RoomId, RoomSubscribers>> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Everything a room announces. Hand contents never appear here; a drawn
/// card is included only when it came from the face-up slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        room_id: RoomId,
        role: Role,
        name: String,
    },
    GameStarted {
        room_id: RoomId,
        first_turn: Role,
        exposed: Option<Card>,
        deck_size: usize,
    },
    CardDrawn {
        room_id: RoomId,
        role: Role,
        source: DrawSource,
        card: Option<Card>,
        exposed: Option<Card>,
        deck_size: usize,
    },
    CardPlayed {
        room_id: RoomId,
        role: Role,
        card: Card,
        pile: usize,
    },
    GameOver {
        room_id: RoomId,
        result: MatchResult,
    },
    PlayerDisconnected {
        room_id: RoomId,
        role: Role,
        game_aborted: bool,
    },
    RoomClosed {
        room_id: RoomId,
        reason: String,
    },
    Error {
        room_id: RoomId,
        message: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::CardDrawn { .. } => "card_drawn",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::GameOver { .. } => "game_over",
            GameEvent::PlayerDisconnected { .. } => "player_disconnected",
            GameEvent::RoomClosed { .. } => "room_closed",
            GameEvent::Error { .. } => "error",
        }
    }
}
