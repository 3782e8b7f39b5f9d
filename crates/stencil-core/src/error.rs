//! Error taxonomy for the scaffolding pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a scaffolding run
///
/// User-declined input is not an error: an empty project name surfaces as
/// `PipelineStatus::Aborted` and the run exits cleanly. Conflict skips are
/// per-file outcomes, not errors.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// An existing manifest could not be parsed. Recovered locally by
    /// ConfigStore (logged, defaults discarded); never aborts the run.
    #[error("failed to parse existing manifest {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// I/O failure while copying template files. Fatal to the run.
    #[error("failed to materialize {path}: {source}")]
    Materialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool (install/build) exited nonzero. Fatal to the run.
    #[error("{stage} step failed with exit code {code}")]
    ExternalStep { stage: String, code: i32 },

    /// An external tool could not be spawned at all.
    #[error("{stage} step could not be started: {source}")]
    ExternalSpawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },
}
