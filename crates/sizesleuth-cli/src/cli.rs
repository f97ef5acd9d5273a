/// Command-line arguments.
///
/// `Args` is parsed with clap derive and converted into a validated
/// [`ScanConfig`] before any scanning starts.
use clap::{Parser, ValueEnum};
use sizesleuth_core::report::history::DEFAULT_HISTORY_FILE;
use sizesleuth_core::{ConfigError, ResourceLevel, ScanConfig, ScanMode};
use std::path::{Path, PathBuf};

/// Default number of files and folders listed.
pub const DEFAULT_NUM_FILES: usize = 10;

/// Find the largest files and folders in a directory tree
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sizesleuth",
    version,
    about = "Find the largest files and folders in a directory tree",
    long_about = "Walks a directory tree and reports the N largest files and the N largest folders.\n\n\
                  Progress and an estimated time remaining are shown while scanning. When run from a\n\
                  terminal, type 'p' to pause, 'r' to resume or 'q' to quit with partial results.",
    after_help = "EXAMPLES:\n    \
        sizesleuth full ~/Downloads\n    \
        sizesleuth quick . --num-files 20\n    \
        sizesleuth custom /data --max-depth 3 --min-file-size 1048576\n    \
        sizesleuth full C:\\Users --valid-extensions .iso .zip --output-file big.csv"
)]
pub struct Args {
    /// Scan strategy
    #[arg(value_enum, value_name = "MODE")]
    pub mode: ModeArg,

    /// Directory to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Maximum directory depth (custom scans only)
    #[arg(long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// Include entries whose name starts with '.'
    #[arg(long)]
    pub include_hidden: bool,

    /// Skip files smaller than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub min_file_size: Option<u64>,

    /// Only count files with these extensions (e.g. .dll .exe)
    #[arg(long, value_name = "EXT", num_args = 1..)]
    pub valid_extensions: Option<Vec<String>>,

    /// How many files and how many folders to list
    #[arg(long, default_value_t = DEFAULT_NUM_FILES, value_name = "NUM")]
    pub num_files: usize,

    /// Also write the report to this file (.json and .csv select structured output)
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// How hard the scan may push the machine
    #[arg(long, value_enum, default_value_t = ResourceArg::Medium)]
    pub resource_level: ResourceArg,

    /// Do not append to the history log
    #[arg(long)]
    pub no_history: bool,

    /// History log location
    #[arg(long, default_value = DEFAULT_HISTORY_FILE, value_name = "PATH")]
    pub history_file: PathBuf,

    /// Suppress per-entry progress lines
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Root's immediate children only, folder sizes not computed
    Quick,
    /// Recursive scan with folder sizes
    Full,
    /// Recursive scan honouring --max-depth
    Custom,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Quick => ScanMode::Quick,
            ModeArg::Full => ScanMode::Full,
            ModeArg::Custom => ScanMode::Custom,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceArg {
    Low,
    Medium,
    High,
}

impl From<ResourceArg> for ResourceLevel {
    fn from(level: ResourceArg) -> Self {
        match level {
            ResourceArg::Low => ResourceLevel::Low,
            ResourceArg::Medium => ResourceLevel::Medium,
            ResourceArg::High => ResourceLevel::High,
        }
    }
}

impl Args {
    /// Build and validate the scan configuration.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let config = ScanConfig::new(&self.directory, self.mode.into())
            .with_max_depth(self.max_depth)
            .with_include_hidden(self.include_hidden)
            .with_min_file_size(self.min_file_size)
            .with_valid_extensions(self.valid_extensions.as_ref())?
            .with_resource_level(self.resource_level.into());
        config.validate()?;
        Ok(config)
    }

    /// `None` when `--no-history` was given.
    pub fn history_path(&self) -> Option<&Path> {
        (!self.no_history).then_some(self.history_file.as_path())
    }
}
