//! Opt-in wall clock timing.
//!
//! Timers are inert unless enabled programmatically or through the
//! `ABL_TIMING` environment variable. Results go to `tracing` at debug level;
//! repeated stages can also fold their samples into a [`TimingStats`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("ABL_TIMING").is_ok()
}

/// Measures one stage. Does nothing when timing is disabled.
pub struct Timer {
    label: &'static str,
    start: Option<Instant>,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: is_enabled().then(Instant::now),
        }
    }

    /// Elapsed seconds, or `None` if timing is disabled.
    pub fn stop(self) -> Option<f64> {
        self.start.map(|s| s.elapsed().as_secs_f64())
    }

    /// Stop, log at debug level and add the sample to `stats` if given.
    pub fn stop_and_log(self, stats: Option<&TimingStats>) -> Option<f64> {
        let label = self.label;
        let elapsed = self.stop()?;
        if let Some(stats) = stats {
            stats.record(elapsed);
        }
        tracing::debug!(label, elapsed_s = elapsed, "timing");
        Some(elapsed)
    }
}

/// Running total of the samples of one repeated stage.
///
/// Usable as a `static`; all updates are relaxed atomics.
#[derive(Debug, Default)]
pub struct TimingStats {
    total_ns: AtomicU64,
    calls: AtomicU64,
}

impl TimingStats {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            calls: AtomicU64::new(0),
        }
    }

    pub fn record(&self, seconds: f64) {
        self.total_ns
            .fetch_add((seconds * 1e9) as u64, Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    /// Mean seconds per call, zero before the first sample.
    pub fn mean_seconds(&self) -> f64 {
        match self.calls() {
            0 => 0.0,
            n => self.total_seconds() / n as f64,
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.calls.store(0, Ordering::Relaxed);
    }
}
