//! CLI error types rendered through miette

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the kanflow binary
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to read snapshot {}", path.display())]
    #[diagnostic(
        code(kanflow::cli::snapshot_read),
        help("Check that the snapshot path exists and is readable")
    )]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {} is not valid JSON: {source}", path.display())]
    #[diagnostic(
        code(kanflow::cli::snapshot_parse),
        help(
            "Expected either {{\"tasks\": [...], \"relationships\": [...]}} or an object keyed by focus task id"
        )
    )]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot has no entry for task {focus}")]
    #[diagnostic(code(kanflow::cli::unknown_focus))]
    UnknownFocus { focus: u64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] kanflow_flowchart::Error),

    #[error("Failed to write output: {0}")]
    #[diagnostic(code(kanflow::cli::output))]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize chart: {0}")]
    #[diagnostic(code(kanflow::cli::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn snapshot_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SnapshotRead {
            path: path.into(),
            source,
        }
    }

    pub fn snapshot_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::SnapshotParse {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
