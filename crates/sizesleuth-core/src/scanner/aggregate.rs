/// Subtree size aggregation and the pre-walk entry count, both on `jwalk`.
///
/// These walks are independent of the streaming producer: the aggregator is
/// called by the walker once per subdirectory (full and custom scans), and
/// the counter runs once before streaming starts to fix the ETA denominator.
///
/// One [`SizeAggregator`] serves a whole scan. When the resource level allows
/// more than one thread it owns a single rayon pool that every size walk
/// reuses; otherwise the walks are serial.
///
/// Neither walk ever fails. Entries that vanish or cannot be read between
/// listing and `stat` contribute nothing and the walk carries on, so one
/// missing file cannot invalidate a whole subtree's roll-up.
use crate::model::ScanConfig;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

type Walk = jwalk::WalkDirGeneric<((), ())>;

pub struct SizeAggregator<'a> {
    config: &'a ScanConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl<'a> SizeAggregator<'a> {
    /// Build the aggregator for one scan, sizing its pool from the
    /// resource level.
    pub fn new(config: &'a ScanConfig) -> Self {
        let threads = config.resource_level.aggregator_threads();
        let pool = if threads > 1 {
            match ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("sizesleuth-size-{i}"))
                .build()
            {
                Ok(pool) => Some(Arc::new(pool)),
                Err(e) => {
                    warn!("Could not start {threads} size threads, summing serially: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self::with_pool(config, pool)
    }

    /// Use an existing pool, or walk serially with `None`.
    pub fn with_pool(config: &'a ScanConfig, pool: Option<Arc<ThreadPool>>) -> Self {
        Self { config, pool }
    }

    pub fn config(&self) -> &'a ScanConfig {
        self.config
    }

    /// A `jwalk` walker on this aggregator's pool that never descends into
    /// the excluded roots.
    fn walker(&self, path: &Path, skip_hidden: bool) -> Walk {
        let parallelism = match &self.pool {
            Some(pool) => jwalk::Parallelism::RayonExistingPool {
                pool: Arc::clone(pool),
                busy_timeout: None,
            },
            None => jwalk::Parallelism::Serial,
        };

        let excluded: Vec<PathBuf> = self.config.excluded_roots.clone();
        jwalk::WalkDir::new(path)
            .skip_hidden(skip_hidden)
            .follow_links(false)
            .parallelism(parallelism)
            .process_read_dir(move |_depth, _dir, _state, children| {
                if excluded.is_empty() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) => {
                        let path = entry.path();
                        !excluded.iter().any(|root| path.starts_with(root))
                    }
                    Err(_) => true,
                });
            })
    }

    /// Sum of the sizes of every file beneath `path` that passes the scan's
    /// hidden, depth, min-size and extension filters.
    ///
    /// `depth` is the depth of `path` itself relative to the scan root, so
    /// that the depth limit means the same thing here as in the walker: a
    /// folder's size equals the total of the files the walker emits beneath it.
    pub fn compute_size(&self, path: &Path, depth: usize) -> u64 {
        let config = self.config;
        if !config.descends_into(depth) || config.is_excluded(path) {
            return 0;
        }

        let mut walk = self.walker(path, !config.include_hidden);
        if let Some(max) = config.max_depth {
            // Files at relative depth r live in a directory at absolute depth
            // depth + r - 1, which is walked only while that is below `max`.
            walk = walk.max_depth(max - depth);
        }

        let mut total: u64 = 0;
        for entry_result in walk {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    debug!("size walk skipped {:?}: {err}", err.path());
                    continue;
                }
            };
            if entry.depth == 0 || entry.file_type().is_dir() {
                continue;
            }

            let entry_path = entry.path();
            let size = match std::fs::symlink_metadata(&entry_path) {
                Ok(meta) => meta.len(),
                Err(err) => {
                    debug!("size walk skipped {}: {err}", entry_path.display());
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy();
            if config.accepts_file(&name, size) {
                total += size;
            }
        }
        total
    }

    /// Count every entry below the scan root, ignoring the hidden, depth,
    /// size and extension filters. Only the excluded roots are left out, and
    /// a root that itself lies under one counts nothing.
    ///
    /// This is a full second traversal of the tree; the count is used purely
    /// as the ETA denominator.
    pub fn count_entries(&self) -> u64 {
        let root = &self.config.root;
        if self.config.is_excluded(root) {
            return 0;
        }
        self.walker(root, false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.depth > 0)
            .count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanMode;
    use std::fs;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        fs::write(path, vec![0u8; n]).unwrap();
    }

    /// ```text
    /// root/
    ///   top.bin      (100)
    ///   .hidden.bin  (1000)
    ///   lib/
    ///     a.dll      (2000)
    ///     deep/
    ///       b.txt    (300)
    /// ```
    fn tree() -> TempDir {
        // The default `.tmp` prefix would make the root itself look hidden.
        let tmp = tempfile::Builder::new()
            .prefix("sizesleuth")
            .tempdir()
            .unwrap();
        let deep = tmp.path().join("lib").join("deep");
        fs::create_dir_all(&deep).unwrap();
        write_bytes(&tmp.path().join("top.bin"), 100);
        write_bytes(&tmp.path().join(".hidden.bin"), 1000);
        write_bytes(&tmp.path().join("lib").join("a.dll"), 2000);
        write_bytes(&deep.join("b.txt"), 300);
        tmp
    }

    fn config(tmp: &TempDir, mode: ScanMode) -> ScanConfig {
        ScanConfig::new(tmp.path(), mode).with_excluded_roots(Vec::new())
    }

    #[test]
    fn sums_all_visible_files() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full);
        assert_eq!(SizeAggregator::new(&cfg).compute_size(tmp.path(), 0), 2_400);
    }

    #[test]
    fn hidden_files_count_only_when_included() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_include_hidden(true);
        assert_eq!(SizeAggregator::new(&cfg).compute_size(tmp.path(), 0), 3_400);
    }

    #[test]
    fn filters_apply_to_roll_ups() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_min_file_size(Some(200));
        assert_eq!(SizeAggregator::new(&cfg).compute_size(tmp.path(), 0), 2_300);

        let cfg = config(&tmp, ScanMode::Full)
            .with_valid_extensions(Some([".DLL"]))
            .unwrap();
        assert_eq!(SizeAggregator::new(&cfg).compute_size(tmp.path(), 0), 2_000);
    }

    /// With max depth 2, `lib` (depth 1) is walked but `lib/deep` (depth 2) is not.
    #[test]
    fn depth_is_measured_from_the_scan_root() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Custom).with_max_depth(Some(2));
        let agg = SizeAggregator::new(&cfg);
        assert_eq!(agg.compute_size(&tmp.path().join("lib"), 1), 2_000);
        assert_eq!(agg.compute_size(&tmp.path().join("lib").join("deep"), 2), 0);
    }

    #[test]
    fn excluded_roots_are_skipped() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_excluded_roots(vec![tmp.path().join("lib")]);
        assert_eq!(SizeAggregator::new(&cfg).compute_size(tmp.path(), 0), 100);
    }

    #[test]
    fn missing_path_contributes_zero() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full);
        let gone = tmp.path().join("gone");
        assert_eq!(SizeAggregator::new(&cfg).compute_size(&gone, 1), 0);
    }

    /// The pre-walk counts hidden entries and directories too.
    #[test]
    fn count_ignores_filters() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Custom)
            .with_max_depth(Some(1))
            .with_min_file_size(Some(1_000_000));
        // top.bin, .hidden.bin, lib, lib/a.dll, lib/deep, lib/deep/b.txt
        assert_eq!(SizeAggregator::new(&cfg).count_entries(), 6);
    }

    #[test]
    fn nested_paths_under_an_excluded_root_are_skipped() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_excluded_roots(vec![tmp.path().join("lib")]);
        let agg = SizeAggregator::new(&cfg);
        assert_eq!(agg.compute_size(&tmp.path().join("lib").join("deep"), 2), 0);
    }

    #[test]
    fn count_is_zero_when_the_root_is_excluded() {
        let tmp = tree();
        let cfg = ScanConfig::new(tmp.path().join("lib"), ScanMode::Full)
            .with_excluded_roots(vec![tmp.path().to_path_buf()]);
        assert_eq!(SizeAggregator::new(&cfg).count_entries(), 0);
    }

    /// Repeated size walks run on the one pool they were given; no further
    /// worker threads are started.
    #[test]
    fn size_walks_share_one_pool() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_include_hidden(true);
        let started = Arc::new(AtomicUsize::new(0));
        let pool = {
            let started = Arc::clone(&started);
            ThreadPoolBuilder::new()
                .num_threads(2)
                .start_handler(move |_| {
                    started.fetch_add(1, Ordering::SeqCst);
                })
                .build()
                .unwrap()
        };
        // Runs on every worker, so both have started once it returns.
        pool.broadcast(|_| ());
        assert_eq!(started.load(Ordering::SeqCst), 2);
        let agg = SizeAggregator::with_pool(&cfg, Some(Arc::new(pool)));

        for _ in 0..10 {
            assert_eq!(agg.compute_size(tmp.path(), 0), 3_400);
            assert_eq!(agg.compute_size(&tmp.path().join("lib"), 1), 2_300);
        }
        assert_eq!(agg.count_entries(), 6);
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn serial_level_builds_no_pool() {
        let tmp = tree();
        let cfg = config(&tmp, ScanMode::Full).with_resource_level(crate::model::ResourceLevel::Low);
        let agg = SizeAggregator::new(&cfg);
        assert!(agg.pool.is_none());
        assert_eq!(agg.compute_size(tmp.path(), 0), 2_400);
    }
}
