/// SizeSleuth CLI — terminal frontend.
///
/// This crate owns everything that touches the terminal: argument parsing,
/// the interactive pause/resume/quit prompt and console output. Business
/// logic lives in `sizesleuth-core`.
pub mod app;
pub mod cli;
pub mod console;
pub mod controller;

pub use app::{execute, run};
pub use cli::Args;
