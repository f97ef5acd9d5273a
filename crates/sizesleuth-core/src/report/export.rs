/// Output-file sink: plain-text report, or JSON/CSV chosen by extension.
use super::Report;
use crate::error::SinkError;
use crate::model::size::format_size;
use crate::model::{EntryKind, ScanEntry, ScanMode};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    /// `.json` and `.csv` (any case) select structured output; anything
    /// else gets the plain-text report.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    mode: ScanMode,
    num_results: usize,
    completed: bool,
    scanned: u64,
    total: u64,
    errors: u64,
    duration_secs: f64,
    files: &'a [ScanEntry],
    folders: &'a [ScanEntry],
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    kind: EntryKind,
    name: &'a str,
    path: String,
    size_bytes: u64,
    size: String,
    important: bool,
}

/// Write the report to `path`, truncating any previous content.
pub fn write_report(path: &Path, report: &Report<'_>) -> Result<(), SinkError> {
    let file = File::create(path).map_err(|e| SinkError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    match ReportFormat::from_path(path) {
        ReportFormat::Text => {
            writer
                .write_all(report.render_text().as_bytes())
                .map_err(|e| SinkError::io(path, e))?;
        }
        ReportFormat::Json => {
            let outcome = report.outcome;
            let json = JsonReport {
                root: &report.config.root,
                mode: report.config.mode,
                num_results: report.num_results,
                completed: outcome.completed,
                scanned: outcome.scanned,
                total: outcome.total,
                errors: outcome.errors,
                duration_secs: outcome.duration.as_secs_f64(),
                files: &outcome.files,
                folders: &outcome.folders,
            };
            serde_json::to_writer_pretty(&mut writer, &json)?;
            writeln!(writer).map_err(|e| SinkError::io(path, e))?;
        }
        ReportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            let ranked = report
                .outcome
                .files
                .iter()
                .enumerate()
                .chain(report.outcome.folders.iter().enumerate());
            for (i, entry) in ranked {
                csv_writer.serialize(CsvRow {
                    rank: i + 1,
                    kind: entry.kind,
                    name: &entry.name,
                    path: entry.path.to_string_lossy().into_owned(),
                    size_bytes: entry.size,
                    size: format_size(entry.size),
                    important: entry.is_important,
                })?;
            }
            csv_writer.flush().map_err(|e| SinkError::io(path, e))?;
        }
    }

    writer.flush().map_err(|e| SinkError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanConfig;
    use crate::report::tests::sample_outcome;
    use tempfile::TempDir;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("r.JSON")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("r.csv")), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_path(Path::new("r.txt")), ReportFormat::Text);
        assert_eq!(ReportFormat::from_path(Path::new("report")), ReportFormat::Text);
    }

    #[test]
    fn text_file_matches_console_report() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        let outcome = sample_outcome();
        let config = ScanConfig::new("/r", ScanMode::Full);
        let report = Report::new(&config, 2, &outcome);

        write_report(&path, &report).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), report.render_text());
    }

    #[test]
    fn json_report_lists_ranked_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let outcome = sample_outcome();
        let config = ScanConfig::new("/r", ScanMode::Full);
        write_report(&path, &Report::new(&config, 2, &outcome)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mode"], "full");
        assert_eq!(value["files"][0]["name"], "d");
        assert_eq!(value["files"][1]["is_important"], true);
        assert_eq!(value["folders"][0]["kind"], "directory");
    }

    #[test]
    fn csv_report_has_header_and_one_row_per_entry() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let outcome = sample_outcome();
        let config = ScanConfig::new("/r", ScanMode::Full);
        write_report(&path, &Report::new(&config, 2, &outcome)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rank,kind,name,path,size_bytes,size,important");
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("1,directory,sub,"));
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing-dir").join("out.txt");
        let outcome = sample_outcome();
        let config = ScanConfig::new("/r", ScanMode::Full);
        let err = write_report(&path, &Report::new(&config, 2, &outcome)).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
