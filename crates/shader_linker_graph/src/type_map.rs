// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host node type to portable class name mapping.

/// Namespace prefix of built-in host shader node types.
pub const HOST_TYPE_PREFIX: &str = "ShaderNode";

/// Suffix appended to every portable class name.
pub const CLASS_SUFFIX: &str = "Module";

/// Portable class name for a host type id.
///
/// `ShaderNodeTexImage` becomes `TexImageModule`; ids outside the host
/// namespace keep their full text (`CustomNode` becomes `CustomNodeModule`).
pub fn class_name_for(host_type_id: &str) -> String {
    let core = host_type_id
        .strip_prefix(HOST_TYPE_PREFIX)
        .unwrap_or(host_type_id);
    format!("{core}{CLASS_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_host_prefix() {
        assert_eq!(class_name_for("ShaderNodeTexImage"), "TexImageModule");
        assert_eq!(class_name_for("ShaderNodeMath"), "MathModule");
        assert_eq!(class_name_for("ShaderNodeValToRGB"), "ValToRGBModule");
    }

    #[test]
    fn test_foreign_ids_kept_whole() {
        assert_eq!(class_name_for("CustomNode"), "CustomNodeModule");
        assert_eq!(class_name_for("NodeReroute"), "NodeRerouteModule");
        assert_eq!(class_name_for(""), "Module");
        // Prefix only matches at the start
        assert_eq!(class_name_for("MyShaderNodeX"), "MyShaderNodeXModule");
    }
}
