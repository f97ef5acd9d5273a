/// Error types for the SizeSleuth core.
///
/// Transient filesystem failures (permission denied, entries vanishing
/// mid-walk) are *not* errors at this level: the walker and aggregator skip
/// them and count them in the scan outcome. Only conditions that prevent a
/// scan from starting, or that break the scan machinery itself, surface here.
use std::path::PathBuf;
use thiserror::Error;

/// Invalid scan configuration, detected before any traversal begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The scan root does not exist or cannot be inspected.
    #[error("directory '{}' does not exist or cannot be read", .0.display())]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory.
    #[error("'{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    /// An extension in the allow-list is empty or contains a path separator.
    #[error("invalid file extension '{0}'")]
    InvalidExtension(String),
}

/// Failures of the scan machinery.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The producer thread could not be spawned.
    #[error("failed to spawn walker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The producer thread panicked; partial results are discarded.
    #[error("walker thread panicked")]
    WalkerPanicked,
}

/// Interactive control errors. Reported back to the controller, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Input that is not one of the recognised commands.
    #[error("unrecognised command '{0}' (expected p/pause, r/resume or q/quit)")]
    UnknownCommand(String),

    /// A command that is not valid from the current state, e.g. resume while running.
    #[error("cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: &'static str,
    },
}

/// Failures writing a report sink (output file or history log).
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV report: {0}")]
    Csv(#[from] csv::Error),
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
