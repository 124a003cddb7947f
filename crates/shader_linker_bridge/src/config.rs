// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bridge configuration.
//!
//! Read once at startup; the running bridge is never reconfigured.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE_NAME: &str = "shader_linker.ron";

/// Environment variable overriding the snapshot path
pub const SNAPSHOT_ENV: &str = "SHADER_LINKER_SNAPSHOT";

/// Network and host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Address the HTTP server binds and notifications are sent to
    pub host: String,
    /// HTTP port serving `/link`
    pub http_port: u16,
    /// UDP port of the consumer's status listener
    pub udp_port: u16,
    /// Host graph snapshot served by the standalone bridge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    /// How long a request waits for the host main loop
    pub request_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8765,
            udp_port: 8766,
            snapshot: None,
            request_timeout_ms: 5000,
        }
    }
}

impl BridgeConfig {
    /// Parse RON config text
    pub fn from_ron(content: &str) -> Result<Self, BridgeError> {
        Ok(ron::from_str(content)?)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the config for this process.
    ///
    /// An explicit path must exist; otherwise [`CONFIG_FILE_NAME`] in the
    /// working directory is used when present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, BridgeError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(CONFIG_FILE_NAME).exists() => Self::load(Path::new(CONFIG_FILE_NAME))?,
            None => Self::default(),
        };
        Ok(config.with_snapshot_override(std::env::var_os(SNAPSHOT_ENV).map(PathBuf::from)))
    }

    /// Replace the snapshot path when an override is given
    pub fn with_snapshot_override(mut self, snapshot: Option<PathBuf>) -> Self {
        if let Some(snapshot) = snapshot {
            self.snapshot = Some(snapshot);
        }
        self
    }

    /// `host:port` of the HTTP server
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
