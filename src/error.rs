//! Error types for snapshot loading, extraction preconditions and per-feature failures.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a snapshot from disk.
#[derive(Debug, Error)]
pub enum GraphError {
    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed edge line.
    #[error("Parse error in {} line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Snapshot-level failures. Anything finer than this is a [`FeatureError`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Engine only accepts a connected graph (the LCC).
    #[error("graph is disconnected ({components} components); pass the largest component")]
    Disconnected { components: usize },
}

/// Failure of a single feature group. Never escapes the orchestrator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeatureError {
    #[error("{what} did not converge within {iterations} iterations")]
    NonConvergence { what: &'static str, iterations: usize },

    #[error("undefined for this graph: {0}")]
    Degenerate(String),

    /// Explicitly not computed at this scale.
    #[error("excluded at this scale: {0}")]
    ScaleExcluded(&'static str),

    #[error("disabled: {0}")]
    Disabled(&'static str),

    /// A feature this one depends on is unavailable.
    #[error("missing dependency: {0}")]
    Missing(&'static str),
}

pub type FeatureResult<T> = Result<T, FeatureError>;
