/// SizeSleuth Core — scanning, ranking and reporting.
///
/// This crate contains all business logic with no terminal I/O of its own.
/// Frontends drive a scan through [`scanner::Scanner::run`], steer it with a
/// [`scanner::control::ScanControl`] and receive updates through a
/// [`scanner::progress::ScanObserver`].
///
/// # Modules
///
/// - [`model`] — Scan entries, configuration and size formatting.
/// - [`analysis`] — Important-file classification and streaming top-N.
/// - [`scanner`] — Walker, size aggregator, producer/consumer coordinator.
/// - [`report`] — Text report, history log and JSON/CSV export.
/// - [`error`] — Error types.
pub mod analysis;
pub mod error;
pub mod model;
pub mod report;
pub mod scanner;

pub use error::{ConfigError, ControlError, ScanError, SinkError};
pub use model::{EntryKind, ResourceLevel, ScanConfig, ScanEntry, ScanMode};
pub use scanner::{ScanOutcome, Scanner};
