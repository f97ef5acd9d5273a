/// Ranking & progress tracker — the consumer side of the pipeline.
///
/// Receives entries one at a time, routes them by filesystem kind into two
/// bounded top-N sets and recomputes progress/ETA after each one.
use crate::analysis::TopNSet;
use crate::model::{EntryKind, ScanEntry};
use crate::scanner::progress::{ProgressSnapshot, ProgressState};

/// Final ranking, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    pub files: Vec<ScanEntry>,
    pub folders: Vec<ScanEntry>,
}

pub struct RankingTracker {
    files: TopNSet<ScanEntry>,
    folders: TopNSet<ScanEntry>,
    progress: ProgressState,
}

impl RankingTracker {
    /// `num_results` is the display count N; `total` the pre-walk count.
    pub fn new(num_results: usize, total: u64) -> Self {
        Self {
            files: TopNSet::new(num_results),
            folders: TopNSet::new(num_results),
            progress: ProgressState::new(total),
        }
    }

    /// Rank one entry and return the updated progress.
    pub fn record(&mut self, entry: ScanEntry) -> ProgressSnapshot {
        self.progress.record();
        let size = entry.size;
        match entry.kind {
            EntryKind::File => self.files.offer(size, entry),
            EntryKind::Directory => self.folders.offer(size, entry),
        };
        self.progress.snapshot()
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn finish(self) -> Ranking {
        Ranking {
            files: self.files.into_ranked(),
            folders: self.folders.into_ranked(),
        }
    }
}
