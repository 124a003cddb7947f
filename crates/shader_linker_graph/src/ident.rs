// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stable identifiers for portable nodes.
//!
//! Host node names are free text ("Mix Color.001", "Principled BSDF"). The
//! consumer uses node ids as dictionary keys and script identifiers, so they
//! are reduced to `[0-9A-Za-z_]` and suffixed with a per-document index.

/// Reduce arbitrary text to `[0-9A-Za-z_]*`.
///
/// Spaces and periods become underscores one-for-one, then every run of other
/// characters outside the allowed set collapses into a single underscore.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for ch in text.chars() {
        let ch = match ch {
            ' ' | '.' => '_',
            other => other,
        };

        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    out
}

/// Build the portable id for the node at `index` in host order.
///
/// The index is zero-padded to at least three digits and never truncated.
pub fn make_node_id(name: &str, index: usize) -> String {
    format!("{}_{:03}", sanitize(name), index)
}

/// Key under which an unconnected socket's literal value is stored in `params`.
pub fn socket_param_key(socket_name: &str) -> String {
    sanitize(socket_name).to_ascii_lowercase()
}
