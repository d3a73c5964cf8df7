//! Error types for flow-chart operations.
//!
//! Degenerate graphs (cycles, missing ids, oversized fan-out) are never
//! errors; they are pruned during tree building. Errors only cover the
//! collaborators around the engine: the fetch boundary and configuration.

use crate::TaskId;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for flow-chart operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around flow-chart construction.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The external data source failed to deliver tasks for a focus task.
    #[error("Failed to fetch flow chart for task {focus}: {message}")]
    #[diagnostic(
        code(kanflow::source::fetch_failed),
        help("The flow chart is not shown; retry once the task data is reachable")
    )]
    Source {
        /// The focus task the fetch was issued for.
        focus: TaskId,
        /// Description of the failure reported by the source.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kanflow::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(kanflow::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// Malformed task or relationship payload.
    #[error("Parse error: {message}")]
    #[diagnostic(code(kanflow::parse))]
    Parse {
        /// What could not be parsed and why.
        message: String,
    },
}

impl Error {
    /// Create a fetch failure for the given focus task.
    pub fn source(focus: TaskId, message: impl Into<String>) -> Self {
        Self::Source {
            focus,
            message: message.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(|p| p.into_boxed_path()),
            operation: operation.into(),
        }
    }

    /// Create a parse error with a message
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
