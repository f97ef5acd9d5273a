/// Top-level run: configure, scan, print the report, write the sinks.
///
/// The console report is always printed before any sink failure is
/// reported, so a broken output file or history log never hides results.
use crate::cli::Args;
use crate::console::ConsoleObserver;
use crate::controller;
use anyhow::{bail, Context, Result};
use sizesleuth_core::model::size::format_count;
use sizesleuth_core::report::{write_report, HistoryLog, Report};
use sizesleuth_core::scanner::control::ScanControl;
use sizesleuth_core::{ScanOutcome, Scanner};
use std::io::{self, Write};
use tracing::{error, info};

/// Run with the interactive prompt on stdin and the report on stdout.
pub fn run(args: &Args) -> Result<()> {
    let control = ScanControl::new();
    // Detached: it may still be waiting on stdin when the scan ends.
    let _controller = controller::spawn_stdin(control.clone());

    let stdout = io::stdout();
    execute(args, &control, &mut stdout.lock())?;
    Ok(())
}

/// Run one scan driven by `control`, writing the report to `out`.
pub fn execute<W: Write>(args: &Args, control: &ScanControl, out: &mut W) -> Result<ScanOutcome> {
    let config = args.scan_config().context("invalid scan configuration")?;
    let mut failed_sinks: Vec<&str> = Vec::new();

    let history = match args.history_path() {
        None => None,
        Some(path) => match HistoryLog::open(path) {
            Ok(log) => Some(log),
            Err(e) => {
                error!("{e}");
                failed_sinks.push("history log");
                None
            }
        },
    };

    let observer = ConsoleObserver::new(args.quiet, history);
    let scanner = Scanner::new(config, args.num_files);
    let outcome = scanner.run(control, &observer).context("scan failed")?;
    let report = Report::new(scanner.config(), scanner.num_results(), &outcome);

    out.write_all(report.render_text().as_bytes())
        .and_then(|()| writeln!(out, "\n{}", summary_line(&outcome)))
        .and_then(|()| out.flush())
        .context("failed to print report")?;

    if let Some(path) = &args.output_file {
        match write_report(path, &report) {
            Ok(()) => info!("Report written to {}", path.display()),
            Err(e) => {
                error!("{e}");
                failed_sinks.push("output file");
            }
        }
    }

    match observer.into_history() {
        Ok(Some(mut log)) => {
            if let Err(e) = log.record_summary(&report, args.output_file.as_deref()) {
                error!("{e}");
                failed_sinks.push("history log");
            } else {
                info!("History appended to {}", log.path().display());
            }
        }
        Ok(None) => {}
        // Already logged when progress logging stopped.
        Err(_) => failed_sinks.push("history log"),
    }

    if !failed_sinks.is_empty() {
        bail!("failed to write {}", failed_sinks.join(" and "));
    }
    Ok(outcome)
}

fn summary_line(outcome: &ScanOutcome) -> String {
    let mut line = format!(
        "Scanned {} of {} entries in {} directories ({} unreadable) in {:.2}s.",
        format_count(outcome.scanned),
        format_count(outcome.total),
        format_count(outcome.directories),
        format_count(outcome.errors),
        outcome.duration.as_secs_f64(),
    );
    if !outcome.completed {
        line.push_str(" Scan quit early; results are partial.");
    }
    line
}
