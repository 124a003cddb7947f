// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main-context marshaling.
//!
//! The host graph may only be read from the thread that owns it. Request
//! handlers never touch it directly: they post a [`MainContextTask`] through
//! a [`CollectHandle`] and wait for the owning thread, which drains the
//! [`MainContextQueue`], to send the result back.

use crate::error::{HostError, LinkError};
use shader_linker_graph::PortableDocument;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Result of one collection on the main context
pub type CollectResult = Result<PortableDocument, HostError>;

/// Work posted to the main context
#[derive(Debug)]
pub enum MainContextTask {
    /// Collect the active material and send the document back
    Collect(oneshot::Sender<CollectResult>),
    /// Stop draining the queue
    Shutdown,
}

/// Create a connected handle/queue pair
pub fn main_context_queue() -> (CollectHandle, MainContextQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (CollectHandle { sender }, MainContextQueue { receiver })
}

/// Cloneable sender side, used from request handlers
#[derive(Debug, Clone)]
pub struct CollectHandle {
    sender: mpsc::UnboundedSender<MainContextTask>,
}

impl CollectHandle {
    /// Ask the main context for a fresh document and wait up to `timeout`
    pub async fn collect(&self, timeout: Duration) -> Result<PortableDocument, LinkError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(MainContextTask::Collect(reply))
            .map_err(|_| LinkError::HostUnavailable)?;

        match tokio::time::timeout(timeout, response).await {
            Ok(Ok(result)) => Ok(result?),
            // The main context dropped the request without answering
            Ok(Err(_)) => Err(LinkError::HostUnavailable),
            Err(_) => Err(LinkError::Timeout(timeout.as_millis() as u64)),
        }
    }

    /// Ask the main context to stop draining; returns false if it is already gone
    pub fn request_shutdown(&self) -> bool {
        self.sender.send(MainContextTask::Shutdown).is_ok()
    }
}

/// Receiver side, drained on the thread that owns the host graph
#[derive(Debug)]
pub struct MainContextQueue {
    receiver: mpsc::UnboundedReceiver<MainContextTask>,
}

impl MainContextQueue {
    /// Run every pending task without blocking.
    ///
    /// Meant to be called from a host timer or idle callback. Returns false
    /// once a shutdown was requested.
    pub fn pump<F>(&mut self, mut collect: F) -> bool
    where
        F: FnMut() -> CollectResult,
    {
        while let Ok(task) = self.receiver.try_recv() {
            if !Self::execute(task, &mut collect) {
                return false;
            }
        }
        true
    }

    /// Block the calling thread, running tasks until shutdown is requested
    /// or every handle is dropped.
    pub fn run<F>(&mut self, mut collect: F)
    where
        F: FnMut() -> CollectResult,
    {
        while let Some(task) = self.receiver.blocking_recv() {
            if !Self::execute(task, &mut collect) {
                break;
            }
        }
        tracing::debug!("Main context queue stopped");
    }

    fn execute<F>(task: MainContextTask, collect: &mut F) -> bool
    where
        F: FnMut() -> CollectResult,
    {
        match task {
            MainContextTask::Collect(reply) => {
                let result = collect();
                if let Err(err) = &result {
                    tracing::error!("Collection failed: {}", err);
                }
                // The requester may have timed out already
                let _ = reply.send(result);
                true
            }
            MainContextTask::Shutdown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shader_linker_graph::host::SnapshotError;

    #[tokio::test]
    async fn test_collect_round_trip_through_queue() {
        let (handle, mut queue) = main_context_queue();

        let worker = std::thread::spawn(move || {
            let mut calls = 0;
            queue.run(|| {
                calls += 1;
                Ok(PortableDocument::new())
            });
            calls
        });

        let document = handle.collect(Duration::from_secs(5)).await.unwrap();
        assert!(document.is_empty());
        handle.collect(Duration::from_secs(5)).await.unwrap();

        assert!(handle.request_shutdown());
        assert_eq!(worker.join().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_host_error_is_forwarded() {
        let (handle, mut queue) = main_context_queue();

        let worker = std::thread::spawn(move || {
            queue.run(|| {
                let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
                Err(HostError::Snapshot(SnapshotError::Io(err)))
            });
        });

        let result = handle.collect(Duration::from_secs(5)).await;
        assert!(matches!(result, Err(LinkError::Collect(_))));

        handle.request_shutdown();
        worker.join().unwrap();
    }

    #[tokio::test]
    async fn test_timeout_when_queue_not_drained() {
        let (handle, _queue) = main_context_queue();
        let result = handle.collect(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(LinkError::Timeout(20))));
    }

    #[tokio::test]
    async fn test_unavailable_when_queue_dropped() {
        let (handle, queue) = main_context_queue();
        drop(queue);
        let result = handle.collect(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(LinkError::HostUnavailable)));
        assert!(!handle.request_shutdown());
    }

    #[test]
    fn test_pump_is_non_blocking() {
        let (handle, mut queue) = main_context_queue();
        let mut calls = 0;
        assert!(queue.pump(|| {
            calls += 1;
            Ok(PortableDocument::new())
        }));
        assert_eq!(calls, 0);

        handle.request_shutdown();
        assert!(!queue.pump(|| Ok(PortableDocument::new())));
    }
}
