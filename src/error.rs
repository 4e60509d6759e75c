use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a report or building its view.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report text is not valid JSON or does not match the report layout.
    #[error("malformed benchmark report: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// Raw per-iteration samples are only accepted one at a time.
    #[error(
        "fixture '{fixture}', step '{step}': {samples} entries in fullDuration list, only a single entry is supported"
    )]
    UnsupportedAggregation {
        fixture: String,
        step: String,
        samples: usize,
    },

    /// A step was requested that the fixture has no timing for.
    #[error("fixture '{fixture}' has no timing for step '{step}'")]
    MissingStep { fixture: String, step: String },

    /// Fixture failed, so it carries no timing at all.
    #[error("fixture '{fixture}' failed and has no timing data")]
    NoTiming { fixture: String },

    /// Nothing to render.
    #[error("no benchmark reports found in the given inputs")]
    NoInputs,
}

pub type Result<T> = std::result::Result<T, ReportError>;
