/// Scan configuration — immutable for the lifetime of one scan.
///
/// Built with [`ScanConfig::new`] plus the `with_*` methods, then checked
/// with [`ScanConfig::validate`] before any traversal starts.
use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Marker prefix for hidden entries.
pub const HIDDEN_PREFIX: char = '.';

/// Scan strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Root's immediate children only, no folder sizes.
    Quick,
    /// Full recursive scan with folder size roll-ups.
    Full,
    /// Full scan that also honours the depth limit.
    Custom,
}

impl ScanMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Full => "full",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How hard the scan may push the machine.
///
/// Controls the pause the producer takes after each directory, and how many
/// threads the size aggregator may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ResourceLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Delay the producer sleeps after finishing each directory.
    pub fn pacing_delay(self) -> Duration {
        match self {
            Self::Low => Duration::from_millis(10),
            Self::Medium => Duration::from_millis(1),
            Self::High => Duration::ZERO,
        }
    }

    /// Thread count for the size aggregator; `1` means a serial walk.
    pub fn aggregator_threads(self) -> usize {
        match self {
            Self::Low => 1,
            Self::Medium => (num_cpus::get() / 2).max(1),
            Self::High => num_cpus::get(),
        }
    }
}

impl fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roots that are never scanned, whatever the other filters say.
pub fn default_excluded_roots() -> Vec<PathBuf> {
    #[cfg(windows)]
    let roots: &[&str] = &[
        "C:\\Windows",
        "C:\\Program Files",
        "C:\\Program Files (x86)",
    ];
    #[cfg(not(windows))]
    let roots: &[&str] = &["/proc", "/sys", "/dev"];

    roots.iter().map(PathBuf::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub mode: ScanMode,
    /// Directories at or beyond this depth (root = 0) are not descended into.
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub min_file_size: Option<u64>,
    /// Lowercase, dot-prefixed suffixes. `None` accepts every file.
    pub valid_extensions: Option<Vec<String>>,
    pub resource_level: ResourceLevel,
    pub excluded_roots: Vec<PathBuf>,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>, mode: ScanMode) -> Self {
        Self {
            root: root.into(),
            mode,
            max_depth: None,
            include_hidden: false,
            min_file_size: None,
            valid_extensions: None,
            resource_level: ResourceLevel::default(),
            excluded_roots: default_excluded_roots(),
        }
    }

    /// Depth limit. Only custom scans honour it; other modes log and drop it.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        if max_depth.is_some() && self.mode != ScanMode::Custom {
            tracing::warn!(
                "--max-depth is only used by custom scans; ignoring it for a {} scan",
                self.mode
            );
            self.max_depth = None;
        } else {
            self.max_depth = max_depth;
        }
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_min_file_size(mut self, min_file_size: Option<u64>) -> Self {
        self.min_file_size = min_file_size;
        self
    }

    /// Set the extension allow-list. Entries are normalised to lowercase with
    /// a leading dot, so `DLL`, `.dll` and `.DLL` are equivalent.
    pub fn with_valid_extensions<I, S>(mut self, extensions: Option<I>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.valid_extensions = match extensions {
            None => None,
            Some(exts) => Some(
                exts.into_iter()
                    .map(|e| normalise_extension(e.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        Ok(self)
    }

    pub fn with_resource_level(mut self, level: ResourceLevel) -> Self {
        self.resource_level = level;
        self
    }

    pub fn with_excluded_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.excluded_roots = roots;
        self
    }

    /// Check the root before any traversal begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let meta = std::fs::metadata(&self.root)
            .map_err(|_| ConfigError::RootNotFound(self.root.clone()))?;
        if !meta.is_dir() {
            return Err(ConfigError::RootNotDirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Validate, then canonicalise the root and the excluded roots so that
    /// deny-list checks compare absolute, symlink-free paths. Excluded roots
    /// that do not exist are kept as given.
    pub fn resolve(&self) -> Result<Self, ConfigError> {
        self.validate()?;
        let root = std::fs::canonicalize(&self.root)
            .map_err(|_| ConfigError::RootNotFound(self.root.clone()))?;
        let excluded_roots = self
            .excluded_roots
            .iter()
            .map(|denied| std::fs::canonicalize(denied).unwrap_or_else(|_| denied.clone()))
            .collect();
        Ok(Self {
            root,
            excluded_roots,
            ..self.clone()
        })
    }

    #[inline]
    pub fn is_quick(&self) -> bool {
        self.mode == ScanMode::Quick
    }

    /// Whether the contents of a directory at `depth` are walked.
    ///
    /// Quick scans only ever list the root itself.
    #[inline]
    pub fn descends_into(&self, depth: usize) -> bool {
        if self.is_quick() {
            return depth == 0;
        }
        self.max_depth.is_none_or(|max| depth < max)
    }

    /// `true` for names that should be skipped as hidden.
    #[inline]
    pub fn hides(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with(HIDDEN_PREFIX)
    }

    /// `true` for an excluded root or anything beneath one.
    #[inline]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_roots.iter().any(|root| path.starts_with(root))
    }

    /// Apply the min-size and extension filters to one file.
    pub fn accepts_file(&self, name: &str, size: u64) -> bool {
        if self.min_file_size.is_some_and(|min| size < min) {
            return false;
        }
        match &self.valid_extensions {
            None => true,
            Some(exts) => {
                let lower = name.to_lowercase();
                exts.iter().any(|ext| lower.ends_with(ext.as_str()))
            }
        }
    }
}

fn normalise_extension(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let bare = trimmed.trim_start_matches(HIDDEN_PREFIX);
    if bare.is_empty() || bare.contains(['/', '\\']) {
        return Err(ConfigError::InvalidExtension(raw.to_string()));
    }
    Ok(format!(".{}", bare.to_lowercase()))
}
