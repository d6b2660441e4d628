//! HTTP error rendering shared by every handler.
//!
//! Each layer's error type implements [`IntoErrorResponse`]; the trait picks
//! the status code and log level and renders the common JSON body:
//!
//! ```json
//! { "error": "pile_full", "message": "pile 3 is full", "details": { "pile": 3 } }
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Stable snake_case code clients branch on
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error, message)
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// How loudly a rejected request is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad request or rule rejection; part of normal play
    Client,
    Server,
    /// Shared state can no longer be trusted
    Critical,
}

pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    /// Defaults to the status class: 5xx is `Server`, everything else `Client`.
    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self.error_details() {
            Some(details) => {
                ErrorResponse::with_details(self.error_code(), self.error_message(), details)
            }
            None => ErrorResponse::new(self.error_code(), self.error_message()),
        }
    }

    /// Logs at the level matching [`IntoErrorResponse::severity`] and renders
    /// the JSON reply.
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let body = self.to_error_response();
        log_rejection(self.severity(), status, &body);
        body.into_response(status)
    }
}

fn log_rejection(severity: ErrorSeverity, status: StatusCode, body: &ErrorResponse) {
    let status = status.as_u16();
    match severity {
        ErrorSeverity::Client => {
            tracing::info!(status, code = %body.error, message = %body.message, "request rejected")
        }
        ErrorSeverity::Server => {
            tracing::error!(status, code = %body.error, message = %body.message, "request failed")
        }
        ErrorSeverity::Critical => tracing::error!(
            status,
            code = %body.error,
            message = %body.message,
            critical = true,
            "shared state failure"
        ),
    }
}
