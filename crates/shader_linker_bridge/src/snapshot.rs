// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot-backed host for the standalone bridge.

use crate::error::HostError;
use shader_linker_graph::host::{MemoryHost, SnapshotError};
use shader_linker_graph::{Collector, PortableDocument};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Serves documents from a host snapshot on disk.
///
/// The file is reread on every collection so edits show up on the next
/// request, like a live host graph would.
pub struct SnapshotSource {
    path: Option<PathBuf>,
    collector: Collector,
}

impl SnapshotSource {
    /// Source reading `path`; `None` behaves like a host with no active material
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            collector: Collector::default(),
        }
    }

    /// Collect the current snapshot
    pub fn collect(&self) -> Result<PortableDocument, HostError> {
        let host = match &self.path {
            Some(path) => match MemoryHost::load(path) {
                Ok(host) => host,
                Err(SnapshotError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                    tracing::debug!("Snapshot {:?} does not exist, no active material", path);
                    MemoryHost::new()
                }
                Err(err) => return Err(err.into()),
            },
            None => MemoryHost::new(),
        };

        let (document, stats) = self.collector.collect_with_stats(&host);
        tracing::debug!(
            "Collected {} nodes, {} links ({} degraded, {} links dropped)",
            stats.nodes,
            stats.links,
            stats.degraded,
            stats.dropped_links
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn temp_snapshot(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("shader_linker_{}_{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_no_path_is_empty_document() {
        let document = SnapshotSource::new(None).collect().unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_document() {
        let path = Path::new("/nonexistent/shader_linker_snapshot.json").to_path_buf();
        let document = SnapshotSource::new(Some(path)).collect().unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_invalid_snapshot_is_error() {
        let path = temp_snapshot("invalid", "{ not json");
        let result = SnapshotSource::new(Some(path.clone())).collect();
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(HostError::Snapshot(SnapshotError::Json(_)))));
    }

    #[test]
    fn test_snapshot_is_reread() {
        let path = temp_snapshot("reread", r#"{ "active_material": { "name": "M", "nodes": [], "links": [] } }"#);
        let source = SnapshotSource::new(Some(path.clone()));
        assert!(source.collect().unwrap().is_empty());

        std::fs::write(
            &path,
            r#"{ "active_material": { "name": "M", "nodes": [
                { "name": "Separate XYZ", "type": "ShaderNodeSeparateXYZ", "location": [10.0, 20.0] }
            ], "links": [] } }"#,
        )
        .unwrap();

        let document = source.collect().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(document.nodes.len(), 1);
        assert_eq!(document.nodes[0].id, "Separate_XYZ_000");
        assert_eq!(document.nodes[0].class, "SeparateXYZModule");
    }
}
