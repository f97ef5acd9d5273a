/// Scanner module — orchestrates one scan end to end.
///
/// A scan runs in three stages:
///
/// 1. **Pre-walk** (synchronous): [`SizeAggregator::count_entries`] fixes
///    the ETA denominator. The same aggregator, and its one thread pool,
///    then sizes every folder the walker lists.
/// 2. **Producer** (background thread `sizesleuth-walker`): drives the
///    [`walker::Walker`] and pushes each entry into a bounded crossbeam
///    channel. After every directory it sleeps for the resource-level pacing
///    delay and then passes a pause/quit checkpoint.
/// 3. **Consumer** (calling thread): passes a checkpoint, receives one entry,
///    ranks it in the [`tracker::RankingTracker`] and reports progress.
///
/// The only shared mutable state besides the channel is the [`ScanControl`].
/// Quitting is cooperative and yields a partial [`ScanOutcome`] with
/// `completed == false`; it is not an error.
pub mod aggregate;
pub mod control;
pub mod progress;
pub mod tracker;
pub mod walker;

use crate::error::ScanError;
use crate::model::{ScanConfig, ScanEntry};
use aggregate::SizeAggregator;
use control::{Checkpoint, ScanControl};
use progress::ScanObserver;
use tracker::RankingTracker;
use walker::{WalkEvent, WalkStats, Walker};

use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Maximum number of entries buffered between producer and consumer.
///
/// When the consumer falls behind (or is paused) the producer blocks on
/// `send` instead of growing the queue, which bounds memory on huge trees.
pub const HANDOFF_CHANNEL_CAPACITY: usize = 1_024;

/// Messages crossing the handoff channel.
#[derive(Debug)]
enum Handoff {
    Entry(ScanEntry),
    /// End of stream: traversal finished or quit was requested.
    End,
}

/// Result of one scan, complete or partial.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Largest files, descending.
    pub files: Vec<ScanEntry>,
    /// Largest folders, descending.
    pub folders: Vec<ScanEntry>,
    /// Entries ranked by the consumer.
    pub scanned: u64,
    /// Pre-walk entry count.
    pub total: u64,
    pub directories: u64,
    /// Entries or directories skipped because they could not be read.
    pub errors: u64,
    pub duration: Duration,
    /// `false` when the scan was quit before the walk finished.
    pub completed: bool,
}

struct ProducerOutcome {
    stats: WalkStats,
    completed: bool,
}

/// A configured scan, ready to run.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
    num_results: usize,
}

impl Scanner {
    /// `num_results` is how many files and how many folders to keep.
    pub fn new(config: ScanConfig, num_results: usize) -> Self {
        Self {
            config,
            num_results,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn num_results(&self) -> usize {
        self.num_results
    }

    /// Run the scan to completion (or until quit) on the calling thread,
    /// with the walker on a scoped background thread.
    ///
    /// Fails only for an invalid configuration, before anything is walked,
    /// or if the walker thread cannot be started or panics.
    pub fn run(
        &self,
        control: &ScanControl,
        observer: &dyn ScanObserver,
    ) -> Result<ScanOutcome, ScanError> {
        // Absolute, canonical paths from here on, so the deny-list also
        // catches relative roots and roots nested inside a denied root.
        let config = self.config.resolve()?;

        let start = Instant::now();
        info!(
            "Starting {} scan of {}",
            config.mode,
            config.root.display()
        );

        let aggregator = SizeAggregator::new(&config);
        let total = aggregator.count_entries();
        debug!("Pre-walk counted {total} entries in {:?}", start.elapsed());
        observer.on_started(total);

        let (handoff_tx, handoff_rx) = crossbeam_channel::bounded::<Handoff>(HANDOFF_CHANNEL_CAPACITY);
        let mut tracker = RankingTracker::new(self.num_results, total);

        let (producer, consumer_completed) = thread::scope(|scope| {
            let producer = thread::Builder::new()
                .name("sizesleuth-walker".into())
                .spawn_scoped(scope, move || produce(aggregator, control, observer, handoff_tx))
                .map_err(ScanError::Spawn)?;

            let consumer_completed = consume(&handoff_rx, control, &mut tracker, observer);
            // Unblock a producer stuck on `send` if we stopped early.
            drop(handoff_rx);

            let producer = producer.join().map_err(|_| ScanError::WalkerPanicked)?;
            Ok::<_, ScanError>((producer, consumer_completed))
        })?;

        let scanned = tracker.progress().scanned;
        let ranking = tracker.finish();
        let outcome = ScanOutcome {
            files: ranking.files,
            folders: ranking.folders,
            scanned,
            total,
            directories: producer.stats.directories,
            errors: producer.stats.errors,
            duration: start.elapsed(),
            completed: producer.completed && consumer_completed,
        };

        if outcome.completed {
            info!(
                "Scan complete: {} entries in {} directories, {} skipped, {:?}",
                outcome.scanned, outcome.directories, outcome.errors, outcome.duration
            );
        } else {
            info!(
                "Scan quit early after {} of {} entries",
                outcome.scanned, outcome.total
            );
        }
        Ok(outcome)
    }
}

/// Producer: walk, forward entries, pace and checkpoint per directory.
fn produce(
    aggregator: SizeAggregator<'_>,
    control: &ScanControl,
    observer: &dyn ScanObserver,
    handoff_tx: Sender<Handoff>,
) -> ProducerOutcome {
    let pacing = aggregator.config().resource_level.pacing_delay();
    let mut walker = Walker::with_aggregator(aggregator);
    let mut completed = true;

    for event in walker.by_ref() {
        match event {
            WalkEvent::Entry(entry) => {
                if handoff_tx.send(Handoff::Entry(entry)).is_err() {
                    // Consumer has gone away (quit while we were blocked).
                    completed = false;
                    break;
                }
            }
            WalkEvent::DirectoryDone(dir) => {
                if !pacing.is_zero() {
                    thread::sleep(pacing);
                }
                let mut was_paused = false;
                let checkpoint = control.checkpoint_with(|| {
                    was_paused = true;
                    info!("Scan paused after {}", dir.display());
                    observer.on_paused(&dir);
                });
                if checkpoint == Checkpoint::Quit {
                    debug!("Producer observed quit at {}", dir.display());
                    completed = false;
                    break;
                }
                if was_paused {
                    info!("Scan resumed");
                    observer.on_resumed();
                }
            }
        }
    }

    // Ignored if the consumer already hung up.
    let _ = handoff_tx.send(Handoff::End);
    ProducerOutcome {
        stats: walker.stats(),
        completed,
    }
}

/// Consumer: checkpoint, receive, rank, report. Returns `false` on quit.
fn consume(
    handoff_rx: &Receiver<Handoff>,
    control: &ScanControl,
    tracker: &mut RankingTracker,
    observer: &dyn ScanObserver,
) -> bool {
    loop {
        if control.checkpoint() == Checkpoint::Quit {
            return false;
        }
        match handoff_rx.recv() {
            Ok(Handoff::Entry(entry)) => {
                let snapshot = tracker.record(entry);
                observer.on_progress(&snapshot);
            }
            // A disconnected channel without `End` means the producer died;
            // the join in `run` reports that.
            Ok(Handoff::End) | Err(_) => return true,
        }
    }
}
