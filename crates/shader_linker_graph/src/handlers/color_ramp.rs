// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color Ramp (`ShaderNodeValToRGB`).
//!
//! Emits `stops` as `[position, [r, g, b, a]]` in the host's element order
//! (not re-sorted by position) and `mode`, which is `"CONSTANT"` or
//! `"LINEAR"`: every smooth interpolation collapses to linear on the
//! consumer side.

use super::{HandlerContext, HandlerError, NodeHandler};
use crate::host::{HostNode, HostValue, PropertySource};
use crate::node::NodeInfo;
use crate::probe::{number, Probe};
use crate::value::{ParamMap, ParamValue};

/// Class name the consumer registers color ramps under
pub const CLASS: &str = "ColorRampModule";

const MODE_CONSTANT: &str = "CONSTANT";
const MODE_LINEAR: &str = "LINEAR";

/// Handler for color ramp nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorRampHandler;

impl NodeHandler for ColorRampHandler {
    fn handle(
        &self,
        node: &dyn HostNode,
        info: &mut NodeInfo,
        params: &mut ParamMap,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        info.class = CLASS.to_string();
        info.set_inputs(["Fac"]);
        info.set_outputs(["Color", "Alpha"]);

        let Some(ramp) = node.property("color_ramp").filter(|v| !v.is_null()) else {
            return Ok(());
        };
        let elements = match ramp.property("elements") {
            Some(HostValue::List(elements)) if !elements.is_empty() => elements,
            _ => return Ok(()),
        };

        // All or nothing: a half-read ramp would shift colors on the consumer side
        let Some(stops) = elements.iter().map(read_stop).collect::<Option<Vec<_>>>() else {
            tracing::debug!("Color ramp {:?} has malformed elements, skipping stops", node.name());
            return Ok(());
        };

        params.insert("stops".to_string(), ParamValue::List(stops));
        params.insert("mode".to_string(), ParamValue::from(interpolation_mode(&ramp)));
        Ok(())
    }
}

/// Collapse the host interpolation to one of the two portable modes
fn interpolation_mode(ramp: &HostValue) -> &'static str {
    let interpolation = Probe::new()
        .fields(&["interpolation", "ipotype"], |v| {
            v.as_str().map(str::to_uppercase)
        })
        .first_present(ramp);

    match interpolation.as_deref() {
        Some(MODE_CONSTANT) => MODE_CONSTANT,
        _ => MODE_LINEAR,
    }
}

/// Read one element as `[position, [r, g, b, a]]`
fn read_stop(element: &HostValue) -> Option<ParamValue> {
    if !matches!(element, HostValue::Object(_)) {
        return None;
    }

    let position = match Probe::new().fields(&["position", "pos"], number).present(element) {
        None => 0.0,
        Some(position) => position?,
    };

    let color = Probe::new()
        .field("color", rgba)
        .first_match(element)
        .map_or_else(|| legacy_rgba(element), Some)?;

    Some(ParamValue::List(vec![
        ParamValue::Float(position),
        ParamValue::floats(&color),
    ]))
}

/// Vector color field
fn rgba(value: &HostValue) -> Option<[f64; 4]> {
    match value.as_floats()?.as_slice() {
        [r, g, b, a, ..] => Some([*r, *g, *b, *a]),
        _ => None,
    }
}

/// Separate `r`/`g`/`b`/`a` fields of older hosts
fn legacy_rgba(element: &HostValue) -> Option<[f64; 4]> {
    let channel = |name: &str, default: f64| match element.property(name) {
        None => Some(default),
        Some(value) => value.as_f64(),
    };

    Some([
        channel("r", 0.0)?,
        channel("g", 0.0)?,
        channel("b", 0.0)?,
        channel("a", 1.0)?,
    ])
}
