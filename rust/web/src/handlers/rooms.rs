use crate::errors::IntoErrorResponse;
use crate::room::{JoinRequest, OpponentType, RoomConfig, RoomError, RoomId, RoomManager};
use fivepiles_engine::cards::Card;
use fivepiles_engine::game::DrawSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{self, StatusCode};
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Default, Deserialize)]
pub struct CreateRoomRequest {
    pub seed: Option<u64>,
    pub opponent_type: Option<OpponentType>,
}

impl CreateRoomRequest {
    fn into_config(self) -> RoomConfig {
        let mut config = RoomConfig::default();
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(opponent_type) = self.opponent_type {
            config.opponent_type = opponent_type;
        }
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    pub player_id: String,
    pub source: DrawSource,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub player_id: String,
    pub card: Card,
    pub pile: usize,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub player_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StateQuery {
    pub player_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoomList<T> {
    rooms: Vec<T>,
}

/// Creates a room and, for AI rooms, seats the opponent as `player2`.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/rooms`
///
/// # Request Format
/// ```json
/// {
///   "seed": 12345,                 // Optional: shuffle seed
///   "opponent_type": "ai:baseline" // Optional: "human" (default) or "ai:<name>"
/// }
/// ```
///
/// # Response Format
/// - **Success (201 Created)**: room summary
/// - **Error (400 Bad Request)**: `unknown_opponent`
pub async fn create_room(rooms: Arc<RoomManager>, request: CreateRoomRequest) -> Response {
    match rooms.create_room(request.into_config()) {
        Ok(summary) => success_response(StatusCode::CREATED, summary),
        Err(err) => room_error(err),
    }
}

pub async fn list_rooms(rooms: Arc<RoomManager>) -> Response {
    success_response(
        StatusCode::OK,
        RoomList {
            rooms: rooms.active_rooms(),
        },
    )
}

pub async fn get_room(rooms: Arc<RoomManager>, room_id: RoomId) -> Response {
    match rooms.summary(&room_id) {
        Ok(summary) => success_response(StatusCode::OK, summary),
        Err(err) => room_error(err),
    }
}

/// Closes a room and ends every event stream attached to it.
///
/// # HTTP Method and Path
/// - **Method**: DELETE
/// - **Path**: `/api/rooms/{room_id}`
///
/// # Response Format
/// - **Success (204 No Content)**: empty body
/// - **Error (404 Not Found)**: `room_not_found`
pub async fn delete_room(rooms: Arc<RoomManager>, room_id: RoomId) -> Response {
    match rooms.delete_room(&room_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => room_error(err),
    }
}

/// Takes a seat or a spectator slot.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/rooms/{room_id}/join`
///
/// # Request Format
/// ```json
/// { "role": "player1", "name": "alice" }
/// ```
///
/// # Response Format
/// - **Success (200 OK)**: `{ room_id, player_id, role, game_started }`.
///   `player_id` is the token every later request must carry.
/// - **Error (409 Conflict)**: `role_taken`, `game_already_started`
pub async fn join(rooms: Arc<RoomManager>, room_id: RoomId, request: JoinRequest) -> Response {
    match rooms.join(&room_id, request) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => room_error(err),
    }
}

/// Draws for the token's seat. Responds with the drawn card, which only
/// the drawing player ever sees.
pub async fn draw(rooms: Arc<RoomManager>, room_id: RoomId, request: DrawRequest) -> Response {
    match rooms.draw(&room_id, &request.player_id, request.source) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => room_error(err),
    }
}

/// Plays a card onto one of the token's piles.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/rooms/{room_id}/play`
///
/// # Request Format
/// ```json
/// { "player_id": "token", "card": "Qs", "pile": 2 }
/// ```
///
/// # Response Format
/// - **Success (200 OK)**: `{ "game_over": false }`, or with `result` when
///   this play (or the AI reply it triggered) ended the game
/// - **Error (400 Bad Request)**: `invalid_pile`
/// - **Error (409 Conflict)**: `not_your_turn`, `draw_required`,
///   `card_not_in_hand`, `pile_full`
pub async fn play(rooms: Arc<RoomManager>, room_id: RoomId, request: PlayRequest) -> Response {
    match rooms.play(&room_id, &request.player_id, request.card, request.pile) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => room_error(err),
    }
}

pub async fn leave(rooms: Arc<RoomManager>, room_id: RoomId, request: LeaveRequest) -> Response {
    match rooms.leave(&room_id, &request.player_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => room_error(err),
    }
}

/// Game view for `?player_id=`; spectator view without it.
pub async fn get_state(rooms: Arc<RoomManager>, room_id: RoomId, query: StateQuery) -> Response {
    match rooms.view(&room_id, query.player_id.as_deref()) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => room_error(err),
    }
}

pub async fn get_result(rooms: Arc<RoomManager>, room_id: RoomId) -> Response {
    match rooms.result(&room_id) {
        Ok(result) => success_response(StatusCode::OK, result),
        Err(err) => room_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    let mut response = http::Response::new(warp::hyper::Body::empty());
    *response.status_mut() = status;
    response
}

fn room_error(err: RoomError) -> Response {
    err.into_http_response()
}
