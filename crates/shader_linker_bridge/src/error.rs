// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the bridge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shader_linker_graph::host::SnapshotError;

/// Errors starting or configuring the bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The HTTP port could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The server runtime or thread could not be created
    #[error("Failed to start server runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The config file is not valid RON
    #[error("Invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised on the host side while collecting
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host snapshot could not be loaded
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors answering a `/link` request
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The host main loop is gone
    #[error("host is not accepting requests")]
    HostUnavailable,

    /// The host main loop did not answer in time
    #[error("host did not answer within {0} ms")]
    Timeout(u64),

    /// Collection failed on the host side
    #[error("collection failed: {0}")]
    Collect(#[from] HostError),

    /// The document could not be encoded
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let status = match self {
            LinkError::HostUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            LinkError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            LinkError::Collect(_) | LinkError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!("Link request failed: {}", self);

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
