/// Interactive pause/resume/quit prompt.
///
/// Reads one command per line and applies it to the shared [`ScanControl`].
/// Bad input never stops the scan: the error is shown and the prompt repeats.
/// The loop ends on quit or end of input.
use sizesleuth_core::scanner::control::{ControlCommand, ControlState, ScanControl};
use std::io::{self, BufRead, IsTerminal, Write};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

pub const PROMPT: &str = "Enter 'p' to pause, 'r' to resume, 'q' to quit: ";

/// Drive `control` from `input`, echoing state changes to `out`.
pub fn drive<R: BufRead, W: Write>(input: R, mut out: W, control: &ScanControl) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            let applied = line
                .parse::<ControlCommand>()
                .and_then(|command| control.apply(command));
            match applied {
                Ok(ControlState::Paused) => writeln!(out, "Scan paused.")?,
                Ok(ControlState::Running) => writeln!(out, "Scan resumed.")?,
                Ok(ControlState::Terminating) => {
                    writeln!(out, "Quitting scan...")?;
                    return Ok(());
                }
                Err(e) => writeln!(out, "{e}")?,
            }
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    debug!("Controller input closed");
    Ok(())
}

/// Start the prompt on a detached thread reading stdin.
///
/// Returns `None` when stdin is not a terminal (piped or redirected input),
/// in which case the scan simply runs to completion.
pub fn spawn_stdin(control: ScanControl) -> Option<JoinHandle<()>> {
    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal; interactive control disabled");
        return None;
    }

    let spawned = thread::Builder::new()
        .name("sizesleuth-controller".into())
        .spawn(move || {
            if let Err(e) = drive(io::stdin().lock(), io::stderr(), &control) {
                warn!("Interactive control stopped: {e}");
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Could not start interactive control: {e}");
            None
        }
    }
}
