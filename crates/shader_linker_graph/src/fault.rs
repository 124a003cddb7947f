// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node fault isolation.
//!
//! One malformed node must never cost the consumer the whole document. Every
//! handler invocation runs inside a [`FaultBoundary`]: a returned error or a
//! panic is logged, the node's info and params are restored to what the
//! collector had filled in, and collection continues with the next node.

use crate::handlers::{HandlerContext, NodeHandler};
use crate::host::HostNode;
use crate::node::NodeInfo;
use crate::value::ParamMap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// How a single handler invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler ran to completion
    Applied,
    /// No handler is registered for the node type
    Skipped,
    /// The handler returned an error; generic fields were kept
    Failed(String),
    /// The handler panicked; generic fields were kept
    Panicked(String),
}

impl HandlerOutcome {
    /// Whether the node was emitted with generic fields after a failure
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Panicked(_))
    }
}

/// Runs handlers with errors and panics contained
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultBoundary;

impl FaultBoundary {
    /// Run `handler` for one node.
    ///
    /// On failure `info` and `params` are rolled back to their state before
    /// the call.
    pub fn run(
        &self,
        node_id: &str,
        handler: &dyn NodeHandler,
        node: &dyn HostNode,
        info: &mut NodeInfo,
        params: &mut ParamMap,
        ctx: &HandlerContext<'_>,
    ) -> HandlerOutcome {
        let info_before = info.clone();
        let params_before = params.clone();

        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(node, info, params, ctx)))
            .map_err(panic_message);

        let outcome = match result {
            Ok(Ok(())) => return HandlerOutcome::Applied,
            Ok(Err(err)) => {
                tracing::warn!("Handler for {} failed, exporting generic fields: {}", node_id, err);
                HandlerOutcome::Failed(err.to_string())
            }
            Err(message) => {
                tracing::warn!("Handler for {} panicked, exporting generic fields: {}", node_id, message);
                HandlerOutcome::Panicked(message)
            }
        };

        *info = info_before;
        *params = params_before;
        outcome
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
