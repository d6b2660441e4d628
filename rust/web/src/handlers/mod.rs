pub mod health;
pub mod rooms;
pub mod sse;

pub use health::health;
pub use rooms::{
    CreateRoomRequest, DrawRequest, LeaveRequest, PlayRequest, StateQuery, create_room,
    delete_room, draw, get_result, get_room, get_state, join, leave, list_rooms, play,
};
pub use sse::stream_events;
