// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader Linker bridge.
//!
//! Serves the host's active material graph to a game engine importer:
//!
//! - `GET /link` on the configured HTTP port answers with the document built
//!   by [`shader_linker_graph::Collector`]
//! - a UDP datagram `{"status": "started"|"stopped"}` announces each server
//!   start and stop
//!
//! ## Architecture
//!
//! The host graph may only be read on the host's main thread. The HTTP
//! server runs on its own thread and forwards every request through a
//! [`CollectHandle`]; the host drains the matching [`MainContextQueue`]
//! from its main loop, either with [`MainContextQueue::pump`] from a timer
//! or by handing the thread over to [`MainContextQueue::run`].
//!
//! [`lifecycle`] keeps the one server instance of the process.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod server;
pub mod snapshot;

pub use config::BridgeConfig;
pub use dispatch::{main_context_queue, CollectHandle, CollectResult, MainContextQueue, MainContextTask};
pub use error::{BridgeError, HostError, LinkError};
pub use notify::{BridgeStatus, Notifier, StatusMessage};
pub use server::{router, BridgeServer, LinkState, LINK_PATH};
pub use snapshot::SnapshotSource;
