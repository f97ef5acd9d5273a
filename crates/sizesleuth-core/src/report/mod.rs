/// Report rendering — turns a [`ScanOutcome`] into text for the console,
/// an output file or the history log.
///
/// Rendering is pure string building; only [`export::write_report`] and
/// [`history::HistoryLog`] touch the filesystem.
pub mod export;
pub mod history;

use crate::model::size::format_size;
use crate::model::{EntryKind, ScanConfig, ScanEntry};
use crate::scanner::progress::ProgressSnapshot;
use crate::scanner::ScanOutcome;
use std::fmt::Write;

pub use export::{write_report, ReportFormat};
pub use history::HistoryLog;

/// Everything a sink needs to describe one finished (or quit) scan.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub config: &'a ScanConfig,
    pub num_results: usize,
    pub outcome: &'a ScanOutcome,
}

impl<'a> Report<'a> {
    pub fn new(config: &'a ScanConfig, num_results: usize, outcome: &'a ScanOutcome) -> Self {
        Self {
            config,
            num_results,
            outcome,
        }
    }

    /// The ranked files and folders blocks.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        render_block(&mut out, "Files", self.num_results, &self.outcome.files);
        render_block(&mut out, "Folders", self.num_results, &self.outcome.folders);
        out
    }
}

fn render_block(out: &mut String, title: &str, n: usize, entries: &[ScanEntry]) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "\nTop {n} Largest {title}:");
    for entry in entries {
        let _ = writeln!(out, "{}", render_entry_line(entry));
    }
}

/// `File (Important System File): name - Size: 1.00 KB`
pub fn render_entry_line(entry: &ScanEntry) -> String {
    let qualifier = match (entry.kind, entry.is_important) {
        (EntryKind::File, true) => " (Important System File)",
        (EntryKind::Directory, true) => " (Important System Folder)",
        (_, false) => "",
    };
    format!(
        "{}{qualifier}: {} - Size: {}",
        entry.kind.label(),
        entry.name,
        format_size(entry.size)
    )
}

/// One progress line, as printed during the scan and appended to history.
pub fn render_progress_line(snapshot: &ProgressSnapshot) -> String {
    format!(
        "Progress: {}/{} entries scanned. Estimated time remaining: {:.2} seconds",
        snapshot.scanned,
        snapshot.total,
        snapshot.remaining.as_secs_f64()
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::ScanMode;
    use std::path::PathBuf;
    use std::time::Duration;

    pub(crate) fn sample_outcome() -> ScanOutcome {
        ScanOutcome {
            files: vec![
                ScanEntry::file(PathBuf::from("/r/sub/d"), 4096),
                ScanEntry::file(PathBuf::from("/r/x.DLL"), 2048),
            ],
            folders: vec![ScanEntry::directory(PathBuf::from("/r/sub"), 4096)],
            scanned: 5,
            total: 5,
            directories: 2,
            errors: 0,
            duration: Duration::from_millis(12),
            completed: true,
        }
    }

    #[test]
    fn entry_lines_carry_importance_qualifiers() {
        let outcome = sample_outcome();
        assert_eq!(
            render_entry_line(&outcome.files[0]),
            "File: d - Size: 4.00 KB"
        );
        assert_eq!(
            render_entry_line(&outcome.files[1]),
            "File (Important System File): x.DLL - Size: 2.00 KB"
        );
        assert_eq!(
            render_entry_line(&outcome.folders[0]),
            "Folder (Important System Folder): sub - Size: 4.00 KB"
        );
    }

    #[test]
    fn text_report_has_both_blocks() {
        let outcome = sample_outcome();
        let config = ScanConfig::new("/r", ScanMode::Full);
        let text = Report::new(&config, 2, &outcome).render_text();
        assert_eq!(
            text,
            "\nTop 2 Largest Files:\n\
             File: d - Size: 4.00 KB\n\
             File (Important System File): x.DLL - Size: 2.00 KB\n\
             \nTop 2 Largest Folders:\n\
             Folder (Important System Folder): sub - Size: 4.00 KB\n"
        );
    }

    #[test]
    fn progress_line_format() {
        let snap = ProgressSnapshot {
            scanned: 3,
            total: 10,
            elapsed: Duration::from_secs(1),
            remaining: Duration::from_millis(2_500),
        };
        assert_eq!(
            render_progress_line(&snap),
            "Progress: 3/10 entries scanned. Estimated time remaining: 2.50 seconds"
        );
    }
}
