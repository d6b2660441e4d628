//! HTTP room server for Five Piles.
//!
//! Rooms hold one game each. Clients join a seat, act with the token they
//! get back, and follow the room over server-sent events.

pub mod errors;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod room;
pub mod server;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, EventSubscription, GameEvent};
pub use logging::{LogEntry, TestLogSubscriber, init_logging};
pub use room::{
    DrawResponse, JoinRequest, JoinResponse, OpponentType, PlayResponse, RoomConfig, RoomError,
    RoomId, RoomManager, RoomSummary, SeatRequest,
};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
