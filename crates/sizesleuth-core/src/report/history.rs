/// Append-only run history log.
///
/// During a scan every progress snapshot is appended as one line; when the
/// scan ends a summary block follows. The file is opened in append mode and
/// is never truncated or rotated here.
use super::{render_progress_line, Report};
use crate::error::SinkError;
use crate::scanner::progress::ProgressSnapshot;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default history file name, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "sizesleuth_history.log";

pub struct HistoryLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl HistoryLog {
    /// Open (creating if needed) the history file for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_progress(&mut self, snapshot: &ProgressSnapshot) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", render_progress_line(snapshot))
            .map_err(|e| SinkError::io(&self.path, e))
    }

    /// Append the summary block and flush everything to disk.
    pub fn record_summary(
        &mut self,
        report: &Report<'_>,
        output_file: Option<&Path>,
    ) -> Result<(), SinkError> {
        let block = render_summary(report, output_file, Local::now());
        self.writer
            .write_all(block.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| SinkError::io(&self.path, e))
    }
}

/// Text of one summary block.
pub fn render_summary(
    report: &Report<'_>,
    output_file: Option<&Path>,
    timestamp: DateTime<Local>,
) -> String {
    let outcome = report.outcome;
    let status = if outcome.completed {
        "completed"
    } else {
        "quit early (partial results)"
    };
    let output = output_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "console only".to_string());

    format!(
        "\n=== Scan summary ===\n\
         Timestamp: {}\n\
         Directory: {}\n\
         Scan type: {}\n\
         Number of files displayed: {}\n\
         Output file: {}\n\
         Resource level: {}\n\
         Status: {}\n\
         Entries scanned: {}/{}\n\
         {}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        report.config.root.display(),
        report.config.mode,
        report.num_results,
        output,
        report.config.resource_level,
        status,
        outcome.scanned,
        outcome.total,
        report.render_text(),
    )
}
