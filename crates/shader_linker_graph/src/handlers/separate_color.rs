// SPDX-License-Identifier: MIT OR Apache-2.0
//! Separate Color (`ShaderNodeSeparateColor`).

use super::{HandlerContext, HandlerError, NodeHandler};
use crate::host::{HostNode, HostValue};
use crate::node::NodeInfo;
use crate::probe::Probe;
use crate::value::{ParamMap, ParamValue};

/// Mode index when nothing can be classified (RGB)
pub const DEFAULT_MODE: i64 = 0;

/// Substring to mode index, checked in order
const MODES: [(&str, i64); 3] = [("RGB", 0), ("HSV", 1), ("HSL", 2)];

/// Handler for separate color nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparateColorHandler;

impl NodeHandler for SeparateColorHandler {
    fn handle(
        &self,
        node: &dyn HostNode,
        info: &mut NodeInfo,
        params: &mut ParamMap,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        let mode = Probe::new()
            .fields(&["mode", "color_space", "space"], classify)
            .first_match(node)
            .unwrap_or(DEFAULT_MODE);

        params.insert("mode".to_string(), ParamValue::Int(mode));
        info.set_inputs(["Color"]);
        Ok(())
    }
}

fn classify(value: &HostValue) -> Option<i64> {
    let text = value.to_text()?.to_uppercase();
    MODES
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, index)| *index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::run;
    use crate::host::MemoryNode;

    fn separate(field: &str, value: &str) -> MemoryNode {
        MemoryNode::new("Separate Color", "ShaderNodeSeparateColor").with_property(field, value)
    }

    #[test]
    fn test_mode_classification() {
        let cases = [
            ("mode", "RGB", 0),
            ("mode", "HSV_something", 1),
            ("mode", "hsl", 2),
            ("color_space", "HSV", 1),
            ("space", "HSL", 2),
        ];
        for (field, value, expected) in cases {
            let (_, params) = run(&SeparateColorHandler, &separate(field, value));
            assert_eq!(params.get("mode"), Some(&ParamValue::Int(expected)), "{field}={value}");
        }
    }

    #[test]
    fn test_defaults_to_rgb() {
        let (info, params) = run(
            &SeparateColorHandler,
            &MemoryNode::new("Separate Color", "ShaderNodeSeparateColor"),
        );
        assert_eq!(params.get("mode"), Some(&ParamValue::Int(0)));
        assert_eq!(info.inputs, vec!["Color"]);

        let (_, params) = run(&SeparateColorHandler, &separate("mode", "XYZ"));
        assert_eq!(params.get("mode"), Some(&ParamValue::Int(0)));
    }

    #[test]
    fn test_unrecognized_field_falls_through() {
        let node = separate("mode", "LAB").with_property("color_space", "HSV");
        let (_, params) = run(&SeparateColorHandler, &node);
        assert_eq!(params.get("mode"), Some(&ParamValue::Int(1)));

        let node = separate("mode", "LAB").with_property("space", "XYZ");
        let (_, params) = run(&SeparateColorHandler, &node);
        assert_eq!(params.get("mode"), Some(&ParamValue::Int(0)));
    }
}
