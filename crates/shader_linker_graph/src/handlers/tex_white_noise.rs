// SPDX-License-Identifier: MIT OR Apache-2.0
//! White Noise Texture (`ShaderNodeTexWhiteNoise`).

use super::{HandlerContext, HandlerError, NodeHandler};
use crate::host::{HostNode, HostValue};
use crate::node::NodeInfo;
use crate::probe::{lookup, Probe};
use crate::value::{ParamMap, ParamValue};

const DIMENSIONS: [(&str, i64); 4] = [("1D", 0), ("2D", 1), ("3D", 2), ("4D", 3)];

/// Dimension index used when the host value cannot be resolved (3D)
pub const DEFAULT_DIMENSIONS: i64 = 2;

/// Handler for white noise texture nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct TexWhiteNoiseHandler;

impl NodeHandler for TexWhiteNoiseHandler {
    fn handle(
        &self,
        node: &dyn HostNode,
        _info: &mut NodeInfo,
        params: &mut ParamMap,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        let dimensions = Probe::new()
            .fields(
                &["noise_dimensions", "noise_dimensionality", "dimensions"],
                dimension_index,
            )
            .first_present(node)
            .unwrap_or(DEFAULT_DIMENSIONS);

        params.insert("dimensions".to_string(), ParamValue::Int(dimensions));
        Ok(())
    }
}

/// Integer indices pass through as given; otherwise a `"1D"`..`"4D"` identifier
fn dimension_index(value: &HostValue) -> Option<i64> {
    match value {
        HostValue::Int(index) => Some(*index),
        HostValue::String(name) => lookup(&DIMENSIONS, &name.to_uppercase()),
        _ => None,
    }
}
