//! Progress metering for the pairwise loop.
//!
//! The driver ticks the meter once per intersection call; every
//! `total / 50000` calls (at least every call) the meter hands back a
//! [`ProgressTick`] for the observer. Observers only see the tick, so they
//! cannot reach the driver state.

use std::time::{Duration, Instant};

/// Snapshot handed to the progress observer.
#[derive(Clone, Debug)]
pub struct ProgressTick {
    /// Intersection calls done so far.
    pub done: u64,
    /// Total number of intersection calls of this run.
    pub total: u64,
    /// Wall time since the previous tick.
    pub interval: Duration,
    /// Intersection calls covered by `interval`.
    pub calls_since_last: u64,
    /// Result-file bytes emitted so far.
    pub bytes_written: u64,
}

impl ProgressTick {
    pub fn percent(&self) -> f32 {
        percent(self.done, self.total)
    }

    /// Rough remaining-time estimate, extrapolated from the last interval.
    /// Wanders with non-linear workloads; good enough for a console line.
    pub fn estimated_remaining(&self) -> Duration {
        if self.calls_since_last == 0 {
            return Duration::ZERO;
        }
        let per_call = self.interval.as_secs_f64() / self.calls_since_last as f64;
        Duration::from_secs_f64(per_call * (self.total.saturating_sub(self.done)) as f64)
    }
}

/// Counts intersection calls and decides when to report.
pub struct ProgressMeter {
    total: u64,
    done: u64,
    step: u64,
    since_last: u64,
    last_instant: Instant,
}

impl ProgressMeter {
    /// Target number of reports over a full run.
    const COUNT_STEPS: u64 = 50_000;

    pub fn new(total: u64) -> Self {
        ProgressMeter {
            total,
            done: 0,
            step: (total / Self::COUNT_STEPS).max(1),
            since_last: 0,
            last_instant: Instant::now(),
        }
    }

    /// Record one intersection call. Returns a tick when the report step
    /// is reached.
    pub fn tick(&mut self, bytes_written: u64) -> Option<ProgressTick> {
        self.done += 1;
        self.since_last += 1;
        if self.since_last < self.step {
            return None;
        }
        let calls_since_last = self.since_last;
        self.since_last = 0;
        let now = Instant::now();
        let interval = now.duration_since(self.last_instant);
        self.last_instant = now;
        Some(ProgressTick {
            done: self.done,
            total: self.total,
            interval,
            calls_since_last,
            bytes_written,
        })
    }

    /// Percentage of calls completed.
    pub fn percent_done(&self) -> f32 {
        percent(self.done, self.total)
    }
}

fn percent(done: u64, total: u64) -> f32 {
    if total == 0 {
        return 100.0;
    }
    (done as f64 * 100.0 / total as f64) as f32
}
