//! Request failure categories

use crate::http::response::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures a request can end in.
///
/// Only `RouteNotFound` and `ContentNotFound` come out of the router itself.
/// The rest are raised by request handling around it.
#[derive(Debug, Error)]
pub enum ServerError {
    /// No extension entry matches the request path
    #[error("no route for {path}")]
    RouteNotFound { path: String },

    /// The resolved file could not be read
    #[error("content not found at {}: {source}", .path.display())]
    ContentNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session expired")]
    ExpiredSession,

    #[error("not authorized")]
    NotAuthorized,

    #[error("validation failed: {0}")]
    Validation(String),

    /// Anything unexpected
    #[error("server fault: {0}")]
    ServerFault(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::RouteNotFound { .. } | ServerError::ContentNotFound { .. } => {
                StatusCode::NotFound
            }
            ServerError::ExpiredSession => StatusCode::Unauthorized,
            ServerError::NotAuthorized => StatusCode::Forbidden,
            ServerError::Validation(_) => StatusCode::BadRequest,
            ServerError::ServerFault(_) => StatusCode::InternalServerError,
        }
    }
}
