// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process-wide bridge instance.
//!
//! The host registers and unregisters the bridge through these functions;
//! at most one server exists per process.

use crate::config::BridgeConfig;
use crate::dispatch::CollectHandle;
use crate::error::BridgeError;
use crate::server::BridgeServer;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::OnceLock;

static BRIDGE: OnceLock<Mutex<Option<BridgeServer>>> = OnceLock::new();

fn bridge() -> &'static Mutex<Option<BridgeServer>> {
    BRIDGE.get_or_init(|| Mutex::new(None))
}

/// Start the process-wide server. Does nothing if it is already running.
pub fn launch_server(config: BridgeConfig, handle: CollectHandle) -> Result<(), BridgeError> {
    let mut slot = bridge().lock();
    if slot.as_ref().is_some_and(BridgeServer::is_running) {
        tracing::debug!("Bridge already launched");
        return Ok(());
    }

    let mut server = BridgeServer::new(config, handle);
    server.start()?;
    *slot = Some(server);
    Ok(())
}

/// Stop the process-wide server. Does nothing if it is not running.
pub fn stop_server() {
    // Take the server out first so the lock is not held while joining
    let server = bridge().lock().take();
    if let Some(mut server) = server {
        server.stop();
    }
}

/// Whether the process-wide server is running
pub fn is_running() -> bool {
    bridge().lock().as_ref().is_some_and(BridgeServer::is_running)
}

/// Address of the process-wide server while running
pub fn local_addr() -> Option<SocketAddr> {
    bridge().lock().as_ref().and_then(BridgeServer::local_addr)
}
