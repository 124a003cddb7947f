// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standalone Shader Linker bridge.
//!
//! Stands in for the host application: the active material is read from a
//! JSON snapshot on every request and served on `/link` until Ctrl-C.
//!
//! ```text
//! shader_linker [CONFIG.ron]
//! ```

use shader_linker_bridge::{lifecycle, main_context_queue, BridgeConfig, BridgeError, CollectHandle, SnapshotSource};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shader_linker=info,shader_linker_bridge=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shader Linker v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Bridge failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), BridgeError> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = BridgeConfig::discover(config_path.as_deref())?;

    match &config.snapshot {
        Some(path) => tracing::info!("Serving host snapshot {:?}", path),
        None => tracing::info!("No snapshot configured, serving an empty document"),
    }
    let source = SnapshotSource::new(config.snapshot.clone());

    let (handle, mut queue) = main_context_queue();
    lifecycle::launch_server(config, handle.clone())?;
    spawn_interrupt_watcher(handle)?;

    // This thread plays the host's main loop until shutdown
    queue.run(|| source.collect());

    lifecycle::stop_server();
    tracing::info!("Shader Linker stopped");
    Ok(())
}

/// Post a shutdown task when Ctrl-C is pressed
fn spawn_interrupt_watcher(handle: CollectHandle) -> Result<(), BridgeError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(BridgeError::Runtime)?;

    std::thread::Builder::new()
        .name("shader-linker-signal".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Interrupt received, shutting down");
                        handle.request_shutdown();
                    }
                    Err(err) => tracing::error!("Failed to listen for Ctrl-C: {}", err),
                }
            });
        })
        .map_err(BridgeError::Runtime)?;

    Ok(())
}
