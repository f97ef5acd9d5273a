/// Depth-first filesystem walker — the streaming producer's source.
///
/// The walker is a lazy, finite, non-restartable [`Iterator`] of
/// [`WalkEvent`]s. Each call to `next` that runs out of buffered events lists
/// exactly one more directory, so the work done ahead of the consumer is
/// bounded to a single directory listing.
///
/// For each visited directory it yields, in order:
///
/// 1. one [`WalkEvent::Entry`] per accepted file (hidden, min-size and
///    extension filters applied),
/// 2. one [`WalkEvent::Entry`] per visible subdirectory, carrying its
///    filtered recursive size from [`SizeAggregator::compute_size`] (zero in
///    quick mode),
/// 3. a [`WalkEvent::DirectoryDone`] checkpoint, where the coordinator
///    applies pacing and observes pause/quit.
///
/// Children are visited in name order so two walks over an unmodified tree
/// emit identical sequences.
///
/// # Errors
///
/// Directories that cannot be listed and entries that vanish before they can
/// be `stat`ed are skipped and counted in [`WalkStats::errors`]; the walk
/// always carries on.
use crate::model::{ScanConfig, ScanEntry};
use crate::scanner::aggregate::SizeAggregator;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    Entry(ScanEntry),
    /// Every entry of this directory has been yielded.
    DirectoryDone(PathBuf),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: u64,
    pub errors: u64,
}

/// A directory waiting to be listed.
struct PendingDir {
    path: PathBuf,
    depth: usize,
}

pub struct Walker<'a> {
    config: &'a ScanConfig,
    aggregator: SizeAggregator<'a>,
    stack: Vec<PendingDir>,
    ready: VecDeque<WalkEvent>,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self::with_aggregator(SizeAggregator::new(config))
    }

    /// Walk with a caller-supplied aggregator, so one size pool serves the
    /// whole scan. A root under an excluded root yields nothing.
    pub fn with_aggregator(aggregator: SizeAggregator<'a>) -> Self {
        let config = aggregator.config();
        let mut stack = Vec::new();
        if config.descends_into(0) && !config.is_excluded(&config.root) {
            stack.push(PendingDir {
                path: config.root.clone(),
                depth: 0,
            });
        }
        Self {
            config,
            aggregator,
            stack,
            ready: VecDeque::new(),
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// List one directory and queue its events.
    fn visit(&mut self, dir: PendingDir) {
        trace!("listing {}", dir.path.display());
        self.stats.directories += 1;

        let read_dir = match fs::read_dir(&dir.path) {
            Ok(rd) => rd,
            Err(err) => {
                self.stats.errors += 1;
                debug!("cannot list {}: {err}", dir.path.display());
                self.ready.push_back(WalkEvent::DirectoryDone(dir.path));
                return;
            }
        };

        let mut children: Vec<fs::DirEntry> = Vec::new();
        for entry_result in read_dir {
            match entry_result {
                Ok(entry) => children.push(entry),
                Err(err) => {
                    self.stats.errors += 1;
                    debug!("skipping unreadable entry in {}: {err}", dir.path.display());
                }
            }
        }
        children.sort_by_key(|e| e.file_name());

        let mut subdirs: Vec<PathBuf> = Vec::new();
        for entry in children {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if self.config.hides(&name) {
                continue;
            }
            let path = entry.path();
            if self.config.is_excluded(&path) {
                debug!("skipping excluded root {}", path.display());
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(err) => {
                    self.stats.errors += 1;
                    debug!("skipping {}: {err}", path.display());
                    continue;
                }
            };
            if file_type.is_dir() {
                subdirs.push(path);
                continue;
            }

            // Links are not followed: a symlink reports its own size.
            let size = match fs::symlink_metadata(&path) {
                Ok(meta) => meta.len(),
                Err(err) => {
                    self.stats.errors += 1;
                    debug!("skipping vanished {}: {err}", path.display());
                    continue;
                }
            };
            if self.config.accepts_file(&name, size) {
                self.ready
                    .push_back(WalkEvent::Entry(ScanEntry::file(path, size)));
            }
        }

        let child_depth = dir.depth + 1;
        for sub in &subdirs {
            let size = if self.config.is_quick() {
                0
            } else {
                self.aggregator.compute_size(sub, child_depth)
            };
            self.ready
                .push_back(WalkEvent::Entry(ScanEntry::directory(sub.clone(), size)));
        }

        if self.config.descends_into(child_depth) {
            // Reverse so the first subdirectory by name is listed next.
            self.stack.extend(subdirs.into_iter().rev().map(|path| PendingDir {
                path,
                depth: child_depth,
            }));
        }

        self.ready.push_back(WalkEvent::DirectoryDone(dir.path));
    }
}

impl Iterator for Walker<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(event);
            }
            let dir = self.stack.pop()?;
            self.visit(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, ScanMode};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        fs::write(path, vec![0u8; n]).unwrap();
    }

    /// ```text
    /// root/
    ///   a (10)  b (2048)  c (500)
    ///   .cache/ z (50)
    ///   sub/    d (4096)
    ///           inner/ e (1)
    /// ```
    fn tree() -> TempDir {
        let tmp = tempfile::Builder::new()
            .prefix("sizesleuth")
            .tempdir()
            .unwrap();
        let root = tmp.path();
        write_bytes(&root.join("a"), 10);
        write_bytes(&root.join("b"), 2048);
        write_bytes(&root.join("c"), 500);
        fs::create_dir_all(root.join(".cache")).unwrap();
        write_bytes(&root.join(".cache").join("z"), 50);
        fs::create_dir_all(root.join("sub").join("inner")).unwrap();
        write_bytes(&root.join("sub").join("d"), 4096);
        write_bytes(&root.join("sub").join("inner").join("e"), 1);
        tmp
    }

    fn config(tmp: &TempDir, mode: ScanMode) -> ScanConfig {
        ScanConfig::new(tmp.path(), mode).with_excluded_roots(Vec::new())
    }

    fn entries(config: &ScanConfig) -> Vec<ScanEntry> {
        Walker::new(config)
            .filter_map(|ev| match ev {
                WalkEvent::Entry(e) => Some(e),
                WalkEvent::DirectoryDone(_) => None,
            })
            .collect()
    }

    fn names(entries: &[ScanEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn full_walk_emits_files_then_dirs_per_directory() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full);
        let all = entries(&cfg);
        assert_eq!(names(&all), vec!["a", "b", "c", "sub", "d", "inner", "e"]);

        let sub = all.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);
        assert_eq!(sub.size, 4097);
    }

    #[test]
    fn hidden_entries_are_neither_emitted_nor_descended() {
        let tmp = tree();
        let all = entries(&config(&tmp, ScanMode::Full));
        assert!(all.iter().all(|e| !e.path.to_string_lossy().contains(".cache")));

        let all = entries(&config(&tmp, ScanMode::Full).with_include_hidden(true));
        assert!(all.iter().any(|e| e.name == ".cache"));
        assert!(all.iter().any(|e| e.name == "z"));
    }

    /// Quick mode lists only the root and reports folder sizes as zero.
    #[test]
    fn quick_walk_stays_at_the_root() {
        let tmp = tree();
        let all = entries(&config(&tmp, ScanMode::Quick));
        assert_eq!(names(&all), vec!["a", "b", "c", "sub"]);
        assert_eq!(all[3].size, 0);
    }

    /// Directories at the depth limit are emitted but not listed.
    #[test]
    fn depth_limit_stops_descent() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Custom).with_max_depth(Some(1));
        let all = entries(&cfg);
        assert_eq!(names(&all), vec!["a", "b", "c", "sub"]);
        // Nothing below `sub` is walked, so its roll-up is empty too.
        assert_eq!(all[3].size, 0);

        let cfg = config(&tmp, ScanMode::Custom).with_max_depth(Some(2));
        let all = entries(&cfg);
        assert_eq!(names(&all), vec!["a", "b", "c", "sub", "d", "inner"]);
        assert_eq!(all[3].size, 4096);
    }

    #[test]
    fn one_checkpoint_per_listed_directory() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full);
        let mut walker = Walker::new(&cfg);
        let done: Vec<PathBuf> = walker
            .by_ref()
            .filter_map(|ev| match ev {
                WalkEvent::DirectoryDone(p) => Some(p),
                WalkEvent::Entry(_) => None,
            })
            .collect();
        assert_eq!(
            done,
            vec![
                tmp.path().to_path_buf(),
                tmp.path().join("sub"),
                tmp.path().join("sub").join("inner"),
            ]
        );
        assert_eq!(walker.stats().directories, 3);
        assert_eq!(walker.stats().errors, 0);
    }

    #[test]
    fn excluded_root_is_pruned() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_excluded_roots(vec![tmp.path().join("sub")]);
        assert_eq!(names(&entries(&cfg)), vec!["a", "b", "c"]);
    }

    #[test]
    fn root_inside_excluded_root_yields_nothing() {
        let tmp = tree();
        let cfg = ScanConfig::new(tmp.path().join("sub").join("inner"), ScanMode::Full)
            .with_excluded_roots(vec![tmp.path().join("sub")]);
        let mut walker = Walker::new(&cfg);
        assert_eq!(walker.next(), None);
        assert_eq!(walker.stats().directories, 0);
    }

    #[test]
    fn filters_drop_files_but_keep_folders() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_min_file_size(Some(1024));
        let all = entries(&cfg);
        assert_eq!(names(&all), vec!["b", "sub", "d", "inner"]);
        let inner = all.iter().find(|e| e.name == "inner").unwrap();
        assert_eq!(inner.size, 0);
    }

    #[test]
    fn missing_root_yields_one_checkpoint_and_an_error() {
        let tmp = tree();
        let cfg = ScanConfig::new(tmp.path().join("gone"), ScanMode::Full);
        let mut walker = Walker::new(&cfg);
        let events: Vec<WalkEvent> = walker.by_ref().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(walker.stats().errors, 1);
    }
}
