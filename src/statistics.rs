//! Counters and timers collected while the algorithm runs.
//!
//! Rendering is plain text via `Display`; what to do with it (print, log,
//! attach to a report) is up to the caller.

use std::fmt;
use std::time::{Duration, Instant};

/// A named block of statistics.
pub trait Statistics: fmt::Display {
    fn name(&self) -> &str;
}

/// Anything that can contribute statistics to a report.
pub trait StatisticsProvider {
    fn collect_statistics<'a>(&'a self, _out: &mut Vec<&'a dyn Statistics>) {}
}

/// Accumulating interval timer.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    started: Option<Instant>,
    sum: Duration,
    max: Duration,
    intervals: usize,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an interval.
    ///
    /// # Panics
    ///
    /// Panics if the timer is already running.
    pub fn start(&mut self) {
        assert!(self.started.is_none(), "Timer is already running");
        self.started = Some(Instant::now());
    }

    /// Stop the running interval.
    ///
    /// # Panics
    ///
    /// Panics if the timer is not running.
    pub fn stop(&mut self) {
        assert!(self.started.is_some(), "Timer is not running");
        self.stop_if_running();
    }

    pub fn stop_if_running(&mut self) {
        if let Some(started) = self.started.take() {
            let elapsed = started.elapsed();
            self.sum += elapsed;
            self.max = self.max.max(elapsed);
            self.intervals += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Time the closure `f` as one interval.
    pub fn time<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.start();
        let result = f();
        self.stop();
        result
    }

    pub fn sum(&self) -> Duration {
        self.sum
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    pub fn avg(&self) -> Duration {
        if self.intervals == 0 {
            Duration::ZERO
        } else {
            self.sum / self.intervals as u32
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.sum.as_secs_f64())
    }
}

/// Statistics of [`CpaAlgorithm`][crate::algorithm::CpaAlgorithm].
///
/// Accumulates over all runs of one algorithm instance.
#[derive(Debug, Clone, Default)]
pub struct CpaStatistics {
    pub(crate) total_timer: Timer,
    pub(crate) choose_timer: Timer,
    pub(crate) precision_timer: Timer,
    pub(crate) transfer_timer: Timer,
    pub(crate) merge_timer: Timer,
    pub(crate) stop_timer: Timer,
    pub(crate) add_timer: Timer,
    pub(crate) forced_covering_timer: Timer,

    pub(crate) count_iterations: usize,
    pub(crate) max_waitlist_size: usize,
    pub(crate) count_waitlist_size: u64,
    pub(crate) count_successors: usize,
    pub(crate) max_successors: usize,
    pub(crate) count_merge: usize,
    pub(crate) count_stop: usize,
    pub(crate) count_break: usize,
    pub(crate) count_covered_breaks: usize,
    pub(crate) count_forced_covered: usize,
}

impl CpaStatistics {
    /// Number of elements popped from the waitlist.
    pub fn count_iterations(&self) -> usize {
        self.count_iterations
    }
    pub fn max_waitlist_size(&self) -> usize {
        self.max_waitlist_size
    }
    /// Waitlist size averaged over iterations, measured before each pop.
    pub fn average_waitlist_size(&self) -> u64 {
        if self.count_iterations == 0 {
            0
        } else {
            self.count_waitlist_size / self.count_iterations as u64
        }
    }
    /// Number of successors returned by the transfer relation.
    pub fn count_successors(&self) -> usize {
        self.count_successors
    }
    pub fn max_successors(&self) -> usize {
        self.max_successors
    }
    /// Number of reached states replaced by a merge.
    pub fn count_merge(&self) -> usize {
        self.count_merge
    }
    /// Number of successors discarded as covered.
    pub fn count_stop(&self) -> usize {
        self.count_stop
    }
    /// Number of BREAK requests honored.
    pub fn count_break(&self) -> usize {
        self.count_break
    }
    /// Number of BREAK requests ignored because the successor was covered.
    /// These are also counted by [`count_stop`][Self::count_stop].
    pub fn count_covered_breaks(&self) -> usize {
        self.count_covered_breaks
    }
    /// Number of popped elements discarded by forced covering.
    pub fn count_forced_covered(&self) -> usize {
        self.count_forced_covered
    }

    pub fn total_timer(&self) -> &Timer {
        &self.total_timer
    }
    pub fn transfer_timer(&self) -> &Timer {
        &self.transfer_timer
    }
    pub fn merge_timer(&self) -> &Timer {
        &self.merge_timer
    }
    pub fn stop_timer(&self) -> &Timer {
        &self.stop_timer
    }
    pub fn forced_covering_timer(&self) -> &Timer {
        &self.forced_covering_timer
    }

    pub(crate) fn stop_timers(&mut self) {
        self.total_timer.stop_if_running();
        self.choose_timer.stop_if_running();
        self.precision_timer.stop_if_running();
        self.transfer_timer.stop_if_running();
        self.merge_timer.stop_if_running();
        self.stop_timer.stop_if_running();
        self.add_timer.stop_if_running();
        self.forced_covering_timer.stop_if_running();
    }
}

impl Statistics for CpaStatistics {
    fn name(&self) -> &str {
        "CPA algorithm"
    }
}

impl fmt::Display for CpaStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of iterations:            {}", self.count_iterations)?;
        if self.count_iterations == 0 {
            // Nothing else is meaningful.
            return Ok(());
        }

        writeln!(f, "Max size of waitlist:            {}", self.max_waitlist_size)?;
        writeln!(f, "Average size of waitlist:        {}", self.average_waitlist_size())?;
        writeln!(f, "Number of computed successors:   {}", self.count_successors)?;
        writeln!(f, "Max successors for one state:    {}", self.max_successors)?;
        writeln!(f, "Number of times merged:          {}", self.count_merge)?;
        writeln!(f, "Number of times stopped:         {}", self.count_stop)?;
        writeln!(f, "Number of times breaked:         {}", self.count_break)?;
        writeln!(f, "Number of ignored breaks:        {}", self.count_covered_breaks)?;
        if self.forced_covering_timer.intervals() > 0 {
            writeln!(f, "Number of forced coverings:      {}", self.count_forced_covered)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Total time for CPA algorithm:     {} (Max: {:.3}s)",
            self.total_timer,
            self.total_timer.max().as_secs_f64()
        )?;
        writeln!(f, "  Time for choose from waitlist:  {}", self.choose_timer)?;
        if self.forced_covering_timer.intervals() > 0 {
            writeln!(f, "  Time for forced covering:       {}", self.forced_covering_timer)?;
        }
        writeln!(f, "  Time for precision adjustment:  {}", self.precision_timer)?;
        writeln!(f, "  Time for transfer relation:     {}", self.transfer_timer)?;
        if self.merge_timer.intervals() > 0 {
            writeln!(f, "  Time for merge operator:        {}", self.merge_timer)?;
        }
        writeln!(f, "  Time for stop operator:         {}", self.stop_timer)?;
        write!(f, "  Time for adding to reached set: {}", self.add_timer)
    }
}
