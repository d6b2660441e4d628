use std::convert::Infallible;
use std::time::Instant;
use tracing::Level;
use warp::http::{Method, StatusCode};
use warp::reply::Response;
use warp::Filter;

/// Wraps a fully recovered route tree and logs one line per response, at a
/// level that follows the status class.
pub fn with_request_logging<F>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone
where
    F: Filter<Extract = (Response,), Error = Infallible> + Clone + Send + Sync + 'static,
{
    warp::path::full()
        .and(warp::method())
        .map(|path: warp::path::FullPath, method: Method| {
            (path.as_str().to_string(), method, Instant::now())
        })
        .and(filter)
        .map(
            |(path, method, start): (String, Method, Instant), response: Response| {
                log_response(
                    response.status(),
                    &path,
                    method.as_str(),
                    start.elapsed().as_millis(),
                );
                response
            },
        )
}

/// Server errors log at ERROR, client errors at WARN, everything else at INFO.
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    let status = status.as_u16();
    macro_rules! emit {
        ($level:expr, $msg:literal) => {
            tracing::event!($level, status, path, method, duration_ms, $msg)
        };
    }
    match status {
        500..=599 => emit!(Level::ERROR, "server error"),
        400..=499 => emit!(Level::WARN, "client error"),
        _ => emit!(Level::INFO, "response sent"),
    }
}
