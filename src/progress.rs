//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::borrow::Cow;

/// Observer of the processing of a source
///
/// The source aggregator notifies it after each processed chunk of data file
/// entries. Use `()` when progress does not need to be tracked.
pub trait ChunkObserver: Send + 'static {
    /// Called after a chunk of `rows` data file entries has been processed
    fn chunk_done(&mut self, rows: usize);

    /// Called once the source is done with, whether it succeeded or failed
    fn source_done(&mut self) {}
}
//
impl ChunkObserver for () {
    fn chunk_done(&mut self, _rows: usize) {}
}

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a report is being displayed. Please use logs
/// for debug messages.
#[derive(Clone, Debug, Default)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare to report on a new asynchronous operation
    pub fn add(
        &self,
        what: impl Into<Cow<'static, str>>,
        config: ProgressConfig,
    ) -> ProgressTracker {
        let what = what.into();
        let ProgressConfig { initial_work } = config;
        let mut bar = ProgressBar::new(initial_work.into()).with_prefix(what);
        let style_header = "{prefix} {wide_bar} ";
        let style_trailer = match initial_work {
            Work::Steps(_) => "{pos}/{len} (~{eta} left)",
        };
        bar = bar.with_style(
            ProgressStyle::with_template(&format!("{style_header}{style_trailer}"))
                .expect("all styles above should be valid indicatif styles"),
        );
        let bar = self.0.add(bar);
        ProgressTracker {
            bar,
            report: self.0.clone(),
        }
    }
}

/// Progress bar configuration
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProgressConfig {
    /// Initial length of the progress bar
    initial_work: Work,
}
//
impl ProgressConfig {
    /// Default configuration, with some initial amount of work
    pub fn new(initial_work: Work) -> Self {
        Self { initial_work }
    }
}

/// Work whose progression that can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Steps to be taken, with a precise count display
    Steps(usize),
}
//
impl From<Work> for u64 {
    fn from(value: Work) -> Self {
        match value {
            Work::Steps(s) => s as u64,
        }
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific process
    bar: ProgressBar,

    /// Underlying process report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    ///
    /// The initial amount of work is only an estimate, so the progress bar
    /// grows if more progress than expected is made.
    pub fn make_progress(&self, progress: u64) {
        let max = self.bar.length().unwrap_or(0);
        let current = self.bar.position() + progress;
        if current > max {
            self.bar.inc_length(current - max);
        }
        self.bar.inc(progress);
    }

    /// Hide the progress bar once done
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
//
impl ChunkObserver for ProgressTracker {
    fn chunk_done(&mut self, _rows: usize) {
        self.make_progress(1);
    }

    fn source_done(&mut self) {
        self.finish();
    }
}
