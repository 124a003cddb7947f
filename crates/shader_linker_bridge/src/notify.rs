// SPDX-License-Identifier: MIT OR Apache-2.0
//! Start/stop notifications to the consumer.
//!
//! Each notification is a single UDP datagram carrying
//! `{"status": "started"}` or `{"status": "stopped"}`. Delivery is best
//! effort; nobody has to be listening.

use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Bridge status announced to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeStatus {
    /// The HTTP server is accepting requests
    Started,
    /// The HTTP server has shut down
    Stopped,
}

/// Notification payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// New status
    pub status: BridgeStatus,
}

/// Sends status datagrams to `host:port`
#[derive(Debug, Clone)]
pub struct Notifier {
    host: String,
    port: u16,
}

impl Notifier {
    /// Notifier targeting `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Send `status`. Failures are logged and otherwise ignored.
    pub fn send(&self, status: BridgeStatus) {
        match self.try_send(status) {
            Ok(target) => tracing::debug!("Sent {:?} notification to {}", status, target),
            Err(err) => tracing::warn!(
                "Failed to send {:?} notification to {}:{}: {}",
                status,
                self.host,
                self.port,
                err
            ),
        }
    }

    fn try_send(&self, status: BridgeStatus) -> std::io::Result<SocketAddr> {
        let target = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "host did not resolve"))?;

        let bind: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let payload = serde_json::to_vec(&StatusMessage { status })?;
        UdpSocket::bind(bind)?.send_to(&payload, target)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_message_format() {
        let started = serde_json::to_string(&StatusMessage {
            status: BridgeStatus::Started,
        })
        .unwrap();
        assert_eq!(started, r#"{"status":"started"}"#);

        let stopped: StatusMessage = serde_json::from_str(r#"{"status":"stopped"}"#).unwrap();
        assert_eq!(stopped.status, BridgeStatus::Stopped);
    }

    #[test]
    fn test_datagram_is_received() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let port = listener.local_addr().unwrap().port();

        Notifier::new("127.0.0.1", port).send(BridgeStatus::Started);

        let mut buf = [0u8; 256];
        let len = listener.recv(&mut buf).unwrap();
        let message: StatusMessage = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(message.status, BridgeStatus::Started);
    }

    #[test]
    fn test_unresolvable_host_does_not_panic() {
        Notifier::new("invalid host name", 9).send(BridgeStatus::Stopped);
    }
}
