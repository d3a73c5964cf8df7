//! JSON snapshot files standing in for the task service.

use crate::errors::{CliError, Result};
use async_trait::async_trait;
use kanflow_flowchart::{EdgeIndex, FetchResult, FlowChartSource, TaskId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of a snapshot file.
///
/// Either one fetch result served for every focus, or a map from focus id
/// to the fetch result the service would return for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Single(FetchResult),
    ByFocus(BTreeMap<String, FetchResult>),
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CliError::snapshot_read(path, e))?;
        let snapshot: Self =
            serde_json::from_str(&raw).map_err(|e| CliError::snapshot_parse(path, e))?;

        tracing::debug!(
            path = %path.display(),
            entries = snapshot.entry_count(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    fn entry_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::ByFocus(entries) => entries.len(),
        }
    }

    /// The fetch result for `focus`, if the snapshot has one.
    pub fn fetch_for(&self, focus: TaskId) -> Option<&FetchResult> {
        match self {
            Self::Single(fetch) => Some(fetch),
            Self::ByFocus(entries) => entries.get(&focus.to_string()),
        }
    }

    /// Distinct statuses across every task in the snapshot, sorted.
    pub fn statuses(&self) -> Vec<String> {
        let tasks = match self {
            Self::Single(fetch) => fetch.tasks.clone(),
            Self::ByFocus(entries) => entries
                .values()
                .flat_map(|fetch| fetch.tasks.iter().cloned())
                .collect(),
        };
        EdgeIndex::build(tasks, &[]).available_statuses()
    }
}

/// Serves fetches out of a loaded [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub const fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl FlowChartSource for SnapshotSource {
    async fn fetch_flow_chart(&self, focus: TaskId) -> kanflow_flowchart::Result<FetchResult> {
        self.snapshot.fetch_for(focus).cloned().ok_or_else(|| {
            kanflow_flowchart::Error::source(focus, "snapshot has no entry for this task")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SINGLE: &str = r#"{
        "tasks": [
            {"id": 1, "ticket": "KAN-1", "title": "Epic", "status": "open"},
            {"id": 2, "ticket": "KAN-2", "title": "Story", "status": "done"}
        ],
        "relationships": [
            {"sourceTaskId": 1, "targetTaskId": 2, "kind": "parent"}
        ]
    }"#;

    fn write_snapshot(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_single_snapshot_serves_every_focus() {
        let file = write_snapshot(SINGLE);
        let snapshot = Snapshot::load(file.path()).await.unwrap();

        assert!(matches!(snapshot, Snapshot::Single(_)));
        assert!(snapshot.fetch_for(TaskId(2)).is_some());
        assert!(snapshot.fetch_for(TaskId(99)).is_some());
        assert_eq!(snapshot.statuses(), vec!["done", "open"]);
    }

    #[tokio::test]
    async fn test_by_focus_snapshot() {
        let contents = format!(r#"{{"2": {SINGLE}, "7": {{"tasks": [], "relationships": []}}}}"#);
        let file = write_snapshot(&contents);
        let snapshot = Snapshot::load(file.path()).await.unwrap();

        assert!(matches!(snapshot, Snapshot::ByFocus(_)));
        assert_eq!(snapshot.fetch_for(TaskId(2)).map(|f| f.tasks.len()), Some(2));
        assert_eq!(snapshot.fetch_for(TaskId(7)).map(|f| f.tasks.len()), Some(0));
        assert!(snapshot.fetch_for(TaskId(3)).is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::SnapshotRead { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let file = write_snapshot("{\"tasks\": 3}");
        let err = Snapshot::load(file.path()).await.unwrap_err();
        assert!(matches!(err, CliError::SnapshotParse { .. }));
    }

    #[tokio::test]
    async fn test_source_reports_unknown_focus() {
        let snapshot = Snapshot::ByFocus(BTreeMap::new());
        let source = SnapshotSource::new(snapshot);
        let err = source.fetch_flow_chart(TaskId(5)).await.unwrap_err();
        assert!(matches!(
            err,
            kanflow_flowchart::Error::Source { focus: TaskId(5), .. }
        ));
    }
}
