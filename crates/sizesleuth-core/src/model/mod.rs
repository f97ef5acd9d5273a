/// Data model for SizeSleuth scans.
///
/// Re-exports the scan entry, configuration and size formatting helpers.
pub mod config;
pub mod entry;
pub mod size;

pub use config::{ResourceLevel, ScanConfig, ScanMode};
pub use entry::{EntryKind, ScanEntry};
