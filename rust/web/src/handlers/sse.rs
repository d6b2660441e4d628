use crate::errors::IntoErrorResponse;
use crate::events::{EventSubscription, GameEvent};
use crate::room::{RoomId, RoomManager};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use warp::http::header::CACHE_CONTROL;
use warp::reply::Response;
use warp::sse::{self, Event};
use warp::Reply;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// `GET /api/rooms/{id}/events`: one SSE message per [`GameEvent`], named
/// after its `type`.
pub async fn stream_events(room_id: RoomId, rooms: Arc<RoomManager>) -> Response {
    if let Err(err) = rooms.summary(&room_id) {
        return err.into_http_response();
    }

    let events = event_stream(rooms.event_bus().subscribe(room_id));
    let body = sse::keep_alive().interval(KEEP_ALIVE).stream(events);
    warp::reply::with_header(sse::reply(body), CACHE_CONTROL, "no-cache").into_response()
}

// Moving the guard into the closure ties the subscription to the connection.
fn event_stream(subscription: EventSubscription) -> impl Stream<Item = Result<Event, Infallible>> {
    let EventSubscription { guard, receiver } = subscription;
    ReceiverStream::new(receiver).filter_map(move |event| {
        let _subscribed = &guard;
        to_sse(&event).map(Ok)
    })
}

fn to_sse(event: &GameEvent) -> Option<Event> {
    match Event::default().event(event.kind()).json_data(event) {
        Ok(rendered) => Some(rendered),
        Err(err) => {
            tracing::error!(error = %err, event_type = event.kind(), "skipping unserializable room event");
            None
        }
    }
}
