/// A single scanned file or directory as it crosses the handoff channel.
///
/// Entries are immutable once produced by the walker and are consumed exactly
/// once by the ranking tracker.
use crate::analysis::classify::is_important_system_file;
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Filesystem kind of an entry, taken from the directory listing's file type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Label used in reports ("File" / "Folder").
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// Full path of the entry (always beneath the scan root).
    pub path: PathBuf,

    /// File or directory name only, as shown in reports.
    pub name: CompactString,

    /// Logical size in bytes. For directories this is the filtered
    /// recursive sum of descendant files (zero in quick mode).
    pub size: u64,

    pub kind: EntryKind,

    /// Directories are always important; files when their suffix marks them
    /// as a system, library or executable file.
    pub is_important: bool,
}

impl ScanEntry {
    /// Create a file entry, classifying it from its name.
    pub fn file(path: PathBuf, size: u64) -> Self {
        let name = display_name(&path);
        let is_important = is_important_system_file(&name);
        Self {
            path,
            name,
            size,
            kind: EntryKind::File,
            is_important,
        }
    }

    /// Create a directory entry with an already-aggregated size.
    pub fn directory(path: PathBuf, size: u64) -> Self {
        Self {
            name: display_name(&path),
            path,
            size,
            kind: EntryKind::Directory,
            is_important: true,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
