// SPDX-License-Identifier: MIT OR Apache-2.0
//! Separate XYZ (`ShaderNodeSeparateXYZ`).
//!
//! One `Vector` input and no parameters of its own; an unconnected vector
//! reaches the consumer through the collector's socket defaults.

use super::{HandlerContext, HandlerError, NodeHandler};
use crate::host::HostNode;
use crate::node::NodeInfo;
use crate::value::ParamMap;

/// Handler for separate XYZ nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparateXyzHandler;

impl NodeHandler for SeparateXyzHandler {
    fn handle(
        &self,
        _node: &dyn HostNode,
        info: &mut NodeInfo,
        _params: &mut ParamMap,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        info.set_inputs(["Vector"]);
        Ok(())
    }
}
