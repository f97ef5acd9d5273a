/// Pause / resume / quit control shared by the producer, the consumer and
/// whatever frontend drives the scan interactively.
///
/// The control is a three-state machine:
///
/// ```text
///   Running ──pause──▶ Paused ──resume──▶ Running
///      │                  │
///      └──────quit────────┴──────▶ Terminating (absorbing)
/// ```
///
/// Both sides of the pipeline call [`ScanControl::checkpoint`] once per
/// directory (producer) or once per receive (consumer). While the state is
/// `Paused` the call blocks on a condition variable; it returns
/// [`Checkpoint::Quit`] as soon as the state becomes `Terminating`.
use crate::error::ControlError;
use parking_lot::{Condvar, Mutex};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Running,
    Paused,
    Terminating,
}

impl ControlState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Terminating => "terminating",
        }
    }
}

/// External input events accepted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Quit,
}

impl ControlCommand {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(Self::Pause),
            "r" | "resume" => Ok(Self::Resume),
            "q" | "quit" => Ok(Self::Quit),
            other => Err(ControlError::UnknownCommand(other.to_string())),
        }
    }
}

/// Outcome of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Continue,
    Quit,
}

struct Shared {
    state: Mutex<ControlState>,
    changed: Condvar,
}

/// Cloneable handle to one scan's control state.
#[derive(Clone)]
pub struct ScanControl {
    shared: Arc<Shared>,
}

impl Default for ScanControl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScanControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanControl")
            .field("state", &self.state())
            .finish()
    }
}

impl ScanControl {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ControlState::Running),
                changed: Condvar::new(),
            }),
        }
    }

    pub fn state(&self) -> ControlState {
        *self.shared.state.lock()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state() == ControlState::Paused
    }

    /// Apply an input event. Invalid transitions leave the state unchanged.
    ///
    /// Quitting twice is accepted; `Terminating` is absorbing.
    pub fn apply(&self, command: ControlCommand) -> Result<ControlState, ControlError> {
        let mut state = self.shared.state.lock();
        let next = match (*state, command) {
            (ControlState::Running, ControlCommand::Pause) => ControlState::Paused,
            (ControlState::Paused, ControlCommand::Resume) => ControlState::Running,
            (_, ControlCommand::Quit) => ControlState::Terminating,
            (current, cmd) => {
                return Err(ControlError::InvalidTransition {
                    command: cmd.label(),
                    state: current.label(),
                })
            }
        };
        *state = next;
        self.shared.changed.notify_all();
        Ok(next)
    }

    pub fn pause(&self) -> Result<ControlState, ControlError> {
        self.apply(ControlCommand::Pause)
    }

    pub fn resume(&self) -> Result<ControlState, ControlError> {
        self.apply(ControlCommand::Resume)
    }

    pub fn quit(&self) -> ControlState {
        // Quit is valid from every state.
        self.apply(ControlCommand::Quit)
            .unwrap_or(ControlState::Terminating)
    }

    /// Block while paused; report whether the caller should carry on.
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint_with(|| {})
    }

    /// Like [`checkpoint`](Self::checkpoint), calling `on_pause` once before
    /// blocking if the scan is currently paused.
    pub fn checkpoint_with(&self, on_pause: impl FnOnce()) -> Checkpoint {
        let mut state = self.shared.state.lock();
        if *state == ControlState::Paused {
            // Notify without holding the lock so the callback may inspect
            // the control itself.
            drop(state);
            on_pause();
            state = self.shared.state.lock();
            while *state == ControlState::Paused {
                self.shared.changed.wait(&mut state);
            }
        }
        match *state {
            ControlState::Terminating => Checkpoint::Quit,
            _ => Checkpoint::Continue,
        }
    }
}
