use crate::errors::ErrorResponse;
use crate::events::EventBus;
use crate::handlers;
use crate::middleware::with_request_logging;
use crate::room::{JoinRequest, RoomManager, DEFAULT_ROOM_TTL};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Reply;
use warp::{Filter, Rejection};

// Request bodies are tiny JSON objects.
const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    room_ttl: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            room_ttl: DEFAULT_ROOM_TTL,
        }
    }

    pub fn with_room_ttl(mut self, ttl: Duration) -> Self {
        self.room_ttl = ttl;
        self
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn room_ttl(&self) -> Duration {
        self.room_ttl
    }

    /// Expired rooms are swept this often; at most once a minute, at least
    /// once a second.
    fn cleanup_interval(&self) -> Duration {
        (self.room_ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60))
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    event_bus: Arc<EventBus>,
    rooms: Arc<RoomManager>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let rooms = Arc::new(RoomManager::with_ttl(
            Arc::clone(&event_bus),
            config.room_ttl(),
        ));
        Self::new_with_dependencies(config, event_bus, rooms)
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        event_bus: Arc<EventBus>,
        rooms: Arc<RoomManager>,
    ) -> Self {
        Self {
            config,
            event_bus,
            rooms,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn rooms(&self) -> Arc<RoomManager> {
        Arc::clone(&self.rooms)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot resolve listen address `{0}`")]
    Address(String),
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Owns the room state and serves it once [`WebServer::start`] is awaited.
#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self::from_context(AppContext::new(config))
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Binds the listener, then serves on a background task together with
    /// the expired-room sweeper. Port 0 picks a free port; the handle reports
    /// the one chosen.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let context = self.context;
        let bind_addr = Self::bind_addr(context.config())?;
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr,
                source,
            })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind {
                addr: bind_addr,
                source,
            })?;

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serving = warp::serve(Self::routes(&context)).serve_incoming_with_graceful_shutdown(
            TcpListenerStream::new(listener),
            async move {
                let _ = stop_rx.await;
            },
        );

        let ttl = context.config().room_ttl();
        tracing::info!(%addr, room_ttl_secs = ttl.as_secs(), "room server listening");

        let sweeper = Self::spawn_cleanup(context.rooms(), context.config().cleanup_interval());
        let task = tokio::spawn(async move {
            serving.await;
            sweeper.abort();
            tracing::info!(%addr, "room server stopped");
        });

        Ok(ServerHandle {
            addr,
            stop: Some(stop_tx),
            task: Some(task),
            context,
        })
    }

    fn spawn_cleanup(rooms: Arc<RoomManager>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // the first tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = rooms.cleanup_expired_rooms();
                if removed > 0 {
                    tracing::info!(removed, "swept expired rooms");
                }
            }
        })
    }

    /// Accepts `ip:port`, a bare ip or a resolvable host name.
    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        if let Ok(addr) = config.host().parse::<SocketAddr>() {
            return Ok(addr);
        }
        (config.host(), config.port())
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ServerError::Address(format!("{}:{}", config.host(), config.port())))
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route(context);
        let room_routes = Self::room_routes(context);
        let action_routes = Self::action_routes(context);
        let sse_routes = Self::sse_routes(context);

        let api = health
            .or(room_routes)
            .unify()
            .or(action_routes)
            .unify()
            .or(sse_routes)
            .unify()
            .recover(Self::handle_rejection)
            .unify();

        with_request_logging(api).boxed()
    }

    fn health_route(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .and(Self::with_rooms(context.rooms()))
            .map(|rooms: Arc<RoomManager>| handlers::health(&rooms).into_response())
            .boxed()
    }

    fn room_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let rooms = context.rooms();

        let list = warp::path!("api" / "rooms")
            .and(warp::get())
            .and(Self::with_rooms(rooms.clone()))
            .and_then(|rooms: Arc<RoomManager>| async move {
                Ok::<_, Infallible>(handlers::list_rooms(rooms).await)
            });

        let create = warp::path!("api" / "rooms")
            .and(warp::post())
            .and(Self::with_rooms(rooms.clone()))
            .and(Self::json_body())
            .and_then(
                |rooms: Arc<RoomManager>, request: handlers::CreateRoomRequest| async move {
                    Ok::<_, Infallible>(handlers::create_room(rooms, request).await)
                },
            );

        let info = warp::path!("api" / "rooms" / String)
            .and(warp::get())
            .and(Self::with_rooms(rooms.clone()))
            .and_then(|room_id: String, rooms: Arc<RoomManager>| async move {
                Ok::<_, Infallible>(handlers::get_room(rooms, room_id).await)
            });

        let delete = warp::path!("api" / "rooms" / String)
            .and(warp::delete())
            .and(Self::with_rooms(rooms.clone()))
            .and_then(|room_id: String, rooms: Arc<RoomManager>| async move {
                Ok::<_, Infallible>(handlers::delete_room(rooms, room_id).await)
            });

        let state = warp::path!("api" / "rooms" / String / "state")
            .and(warp::get())
            .and(warp::query::<handlers::StateQuery>())
            .and(Self::with_rooms(rooms.clone()))
            .and_then(
                |room_id: String, query: handlers::StateQuery, rooms: Arc<RoomManager>| async move {
                    Ok::<_, Infallible>(handlers::get_state(rooms, room_id, query).await)
                },
            );

        let result = warp::path!("api" / "rooms" / String / "result")
            .and(warp::get())
            .and(Self::with_rooms(rooms))
            .and_then(|room_id: String, rooms: Arc<RoomManager>| async move {
                Ok::<_, Infallible>(handlers::get_result(rooms, room_id).await)
            });

        list.or(create)
            .unify()
            .or(state)
            .unify()
            .or(result)
            .unify()
            .or(info)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    fn action_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let rooms = context.rooms();

        let join = warp::path!("api" / "rooms" / String / "join")
            .and(warp::post())
            .and(Self::with_rooms(rooms.clone()))
            .and(Self::json_body())
            .and_then(
                |room_id: String, rooms: Arc<RoomManager>, request: JoinRequest| async move {
                    Ok::<_, Infallible>(handlers::join(rooms, room_id, request).await)
                },
            );

        let draw = warp::path!("api" / "rooms" / String / "draw")
            .and(warp::post())
            .and(Self::with_rooms(rooms.clone()))
            .and(Self::json_body())
            .and_then(
                |room_id: String, rooms: Arc<RoomManager>, request: handlers::DrawRequest| async move {
                    Ok::<_, Infallible>(handlers::draw(rooms, room_id, request).await)
                },
            );

        let play = warp::path!("api" / "rooms" / String / "play")
            .and(warp::post())
            .and(Self::with_rooms(rooms.clone()))
            .and(Self::json_body())
            .and_then(
                |room_id: String, rooms: Arc<RoomManager>, request: handlers::PlayRequest| async move {
                    Ok::<_, Infallible>(handlers::play(rooms, room_id, request).await)
                },
            );

        let leave = warp::path!("api" / "rooms" / String / "leave")
            .and(warp::post())
            .and(Self::with_rooms(rooms))
            .and(Self::json_body())
            .and_then(
                |room_id: String, rooms: Arc<RoomManager>, request: handlers::LeaveRequest| async move {
                    Ok::<_, Infallible>(handlers::leave(rooms, room_id, request).await)
                },
            );

        join.or(draw)
            .unify()
            .or(play)
            .unify()
            .or(leave)
            .unify()
            .boxed()
    }

    fn sse_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        warp::path!("api" / "rooms" / String / "events")
            .and(warp::get())
            .and(Self::with_rooms(context.rooms()))
            .and_then(|room_id: String, rooms: Arc<RoomManager>| async move {
                Ok::<_, Infallible>(handlers::stream_events(room_id, rooms).await)
            })
            .boxed()
    }

    /// Turns warp's own rejections (unknown path, bad JSON, wrong method)
    /// into the same error body the handlers produce.
    async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
        let (status, code, message) = if err.is_not_found() {
            (StatusCode::NOT_FOUND, "not_found", "Resource not found".to_string())
        } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
            (StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
        } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
            (StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
        } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "Request body too large".to_string(),
            )
        } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
            (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                "Expected application/json".to_string(),
            )
        } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "Method not allowed".to_string(),
            )
        } else {
            tracing::error!(rejection = ?err, "unhandled rejection");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        };

        Ok(ErrorResponse::new(code, message).into_response(status))
    }

    fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
    where
        T: serde::de::DeserializeOwned + Send,
    {
        warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
    }

    fn with_rooms(
        rooms: Arc<RoomManager>,
    ) -> impl Filter<Extract = (Arc<RoomManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&rooms))
    }
}

/// A running server. Dropping it stops serving without waiting.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Stops accepting connections and waits for in-flight ones to finish.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match self.task.take() {
            Some(task) => Ok(task.await?),
            None => Ok(()),
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
