/// Console observer: live progress on stderr plus the history log.
///
/// Progress lines go to stderr so that stdout carries only the report.
use parking_lot::Mutex;
use sizesleuth_core::model::size::format_count;
use sizesleuth_core::report::{render_progress_line, HistoryLog};
use sizesleuth_core::scanner::progress::{ProgressSnapshot, ScanObserver};
use sizesleuth_core::SinkError;
use std::path::Path;
use tracing::error;

#[derive(Default)]
struct HistorySink {
    log: Option<HistoryLog>,
    /// First write failure. The log is dropped after it.
    failure: Option<SinkError>,
}

pub struct ConsoleObserver {
    quiet: bool,
    history: Mutex<HistorySink>,
}

impl ConsoleObserver {
    pub fn new(quiet: bool, history: Option<HistoryLog>) -> Self {
        Self {
            quiet,
            history: Mutex::new(HistorySink {
                log: history,
                failure: None,
            }),
        }
    }

    /// Hand back the history log for the summary block, or the error that
    /// stopped progress logging.
    pub fn into_history(self) -> Result<Option<HistoryLog>, SinkError> {
        let sink = self.history.into_inner();
        match sink.failure {
            Some(e) => Err(e),
            None => Ok(sink.log),
        }
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_started(&self, total: u64) {
        if !self.quiet {
            eprintln!("Found {} entries to scan.", format_count(total));
        }
    }

    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        let line = render_progress_line(snapshot);
        if !self.quiet {
            eprintln!("{line}");
        }

        let mut guard = self.history.lock();
        let sink = &mut *guard;
        if let Some(log) = sink.log.as_mut() {
            if let Err(e) = log.record_progress(snapshot) {
                error!("History log disabled: {e}");
                sink.log = None;
                sink.failure = Some(e);
            }
        }
    }

    fn on_paused(&self, dir: &Path) {
        eprintln!(
            "Scan paused after {}. Enter 'r' to resume or 'q' to quit.",
            dir.display()
        );
    }

    fn on_resumed(&self) {
        eprintln!("Scan resumed.");
    }
}
