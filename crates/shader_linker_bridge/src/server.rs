// SPDX-License-Identifier: MIT OR Apache-2.0
//! HTTP server exposing the collected document.
//!
//! The server runs on its own thread with a current-thread tokio runtime so
//! the host's main loop is never blocked by network IO. Requests reach the
//! host graph only through the [`CollectHandle`].

use crate::config::BridgeConfig;
use crate::dispatch::CollectHandle;
use crate::error::{BridgeError, LinkError};
use crate::notify::{BridgeStatus, Notifier};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::oneshot;

/// Path serving the document
pub const LINK_PATH: &str = "/link";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Shared state of the request handlers
#[derive(Debug, Clone)]
pub struct LinkState {
    handle: CollectHandle,
    timeout: Duration,
}

impl LinkState {
    /// State forwarding requests through `handle`
    pub fn new(handle: CollectHandle, timeout: Duration) -> Self {
        Self { handle, timeout }
    }
}

/// Build the bridge router
pub fn router(state: LinkState) -> Router {
    Router::new()
        .route(LINK_PATH, get(get_link))
        .fallback(not_found)
        .with_state(state)
}

async fn get_link(State(state): State<LinkState>) -> Result<Response, LinkError> {
    let document = state.handle.collect(state.timeout).await?;
    let body = document.to_json_bytes()?;
    tracing::debug!("Served {} nodes, {} links", document.nodes.len(), document.links.len());
    Ok(([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not found",
        })),
    )
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    thread: JoinHandle<()>,
}

/// Start/stop handle for the HTTP server
pub struct BridgeServer {
    config: BridgeConfig,
    handle: CollectHandle,
    notifier: Notifier,
    running: Option<RunningServer>,
}

impl BridgeServer {
    /// Create a stopped server
    pub fn new(config: BridgeConfig, handle: CollectHandle) -> Self {
        let notifier = Notifier::new(config.host.clone(), config.udp_port);
        Self {
            config,
            handle,
            notifier,
            running: None,
        }
    }

    /// Whether the server thread is running
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bound address while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.addr)
    }

    /// Bind and start serving. Does nothing if already running.
    pub fn start(&mut self) -> Result<(), BridgeError> {
        if self.running.is_some() {
            tracing::debug!("Bridge server already running");
            return Ok(());
        }

        let addr = self.config.http_addr();
        let listener = std::net::TcpListener::bind(&addr).map_err(|source| BridgeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BridgeError::Runtime)?;

        let app = router(LinkState::new(self.handle.clone(), self.config.request_timeout()));
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("shader-linker-http".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::from_std(listener) {
                        Ok(listener) => listener,
                        Err(err) => {
                            tracing::error!("Failed to register listener: {}", err);
                            return;
                        }
                    };

                    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    });
                    if let Err(err) = serve.await {
                        tracing::error!("HTTP server error: {}", err);
                    }
                });
            })
            .map_err(BridgeError::Runtime)?;

        self.running = Some(RunningServer {
            addr: local_addr,
            shutdown,
            thread,
        });

        tracing::info!("Bridge server listening on http://{}{}", local_addr, LINK_PATH);
        self.notifier.send(BridgeStatus::Started);
        Ok(())
    }

    /// Stop serving and wait for the server thread. Does nothing if not running.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        // The server task may already be gone if it failed
        let _ = running.shutdown.send(());
        if running.thread.join().is_err() {
            tracing::error!("HTTP server thread panicked");
        }

        tracing::info!("Bridge server on {} stopped", running.addr);
        self.notifier.send(BridgeStatus::Stopped);
    }
}

impl Drop for BridgeServer {
    fn drop(&mut self) {
        self.stop();
    }
}
