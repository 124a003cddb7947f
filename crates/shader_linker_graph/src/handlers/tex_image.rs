// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image Texture (`ShaderNodeTexImage`).
//!
//! Enumerated sampling settings are sent as indices into fixed tables the
//! consumer shares. Unknown values fall back to each table's default index.
//! The image itself is referenced by absolute path with forward slashes;
//! `image_path` is omitted when no image (or no file) is assigned.

use super::{HandlerContext, HandlerError, NodeHandler};
use crate::host::{HostNode, HostValue, PropertySource};
use crate::node::NodeInfo;
use crate::probe::{lookup, number, text, Probe};
use crate::value::{ParamMap, ParamValue};

const INTERPOLATION: [(&str, i64); 3] = [("Linear", 0), ("Closest", 1), ("Cubic", 2)];
const PROJECTION: [(&str, i64); 4] = [("FLAT", 0), ("BOX", 1), ("SPHERE", 2), ("TUBE", 3)];
const EXTENSION: [(&str, i64); 4] = [("REPEAT", 0), ("EXTEND", 1), ("CLIP", 2), ("MIRROR", 3)];
const ALPHA_MODE: [(&str, i64); 4] = [
    ("STRAIGHT", 0),
    ("PREMULTIPLIED", 1),
    ("CHANNEL_PACKED", 2),
    ("NONE", 3),
];
const COLOR_SPACE: [(&str, i64); 3] = [("SRGB", 0), ("NON-COLOR", 1), ("NONE", 1)];

/// Color space index for sRGB, also used when nothing is set
pub const COLOR_SPACE_SRGB: i64 = 0;
/// Color space index for everything that is not sRGB
pub const COLOR_SPACE_NON_COLOR: i64 = 1;

/// Handler for image texture nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct TexImageHandler;

impl NodeHandler for TexImageHandler {
    fn handle(
        &self,
        node: &dyn HostNode,
        _info: &mut NodeInfo,
        params: &mut ParamMap,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), HandlerError> {
        let image = node.property("image").filter(|v| !v.is_null());

        params.insert("interpolation".into(), enum_index(node, "interpolation", &INTERPOLATION).into());
        params.insert("projection".into(), enum_index(node, "projection", &PROJECTION).into());

        let box_blend = Probe::new()
            .field("projection_blend", number)
            .first_present(node)
            .unwrap_or(0.0);
        params.insert("box_blend".into(), ParamValue::Float(box_blend));

        params.insert("extension".into(), enum_index(node, "extension", &EXTENSION).into());
        params.insert("color_space".into(), ParamValue::Int(color_space(node, image.as_ref())));

        // Older hosts keep the alpha mode on the node, newer ones on the image
        let alpha_mode = Probe::new()
            .field("alpha_mode", text)
            .first_present(node)
            .or_else(|| image.as_ref().and_then(|img| Probe::new().field("alpha_mode", text).first_present(img)))
            .and_then(|mode| lookup(&ALPHA_MODE, &mode))
            .unwrap_or(0);
        params.insert("alpha_mode".into(), ParamValue::Int(alpha_mode));

        if let Some(path) = image.as_ref().and_then(|img| image_path(img, ctx)) {
            params.insert("image_path".into(), ParamValue::String(path));
        }

        Ok(())
    }
}

/// Table index of an enum field; index 0 when absent or unknown
fn enum_index(node: &dyn HostNode, field: &'static str, table: &[(&str, i64)]) -> i64 {
    Probe::new()
        .field(field, text)
        .first_present(node)
        .and_then(|value| lookup(table, &value))
        .unwrap_or(0)
}

/// Name of a colorspace settings object, or a bare colorspace name
fn colorspace_name(value: &HostValue) -> Option<String> {
    match value {
        HostValue::String(name) => Some(name.clone()),
        HostValue::Object(_) => value.property("name").and_then(|name| name.to_text()),
        _ => None,
    }
}

/// The image's own colorspace wins over the node's; sRGB when neither is set
fn color_space(node: &dyn HostNode, image: Option<&HostValue>) -> i64 {
    let probe = Probe::new().field("colorspace_settings", colorspace_name);
    let name = image
        .and_then(|img| probe.first_match(img))
        .or_else(|| probe.first_match(node));

    let Some(name) = name else {
        return COLOR_SPACE_SRGB;
    };
    lookup(&COLOR_SPACE, &name.to_uppercase()).unwrap_or(COLOR_SPACE_NON_COLOR)
}

/// Absolute, forward-slashed path of the image file
fn image_path(image: &HostValue, ctx: &HandlerContext<'_>) -> Option<String> {
    let filepath = image.property("filepath")?;
    let filepath = filepath.as_str().filter(|p| !p.is_empty())?;

    let absolute = ctx.host.absolute_path(filepath)?.replace('\\', "/");
    (!absolute.is_empty()).then_some(absolute)
}
