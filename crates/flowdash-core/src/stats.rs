//! Rolling throughput statistics across poll cycles.

use std::collections::VecDeque;
use std::time::Instant;

use crate::model::RollingStats;

/// Default number of retained throughput samples.
const DEFAULT_CAPACITY: usize = 30;

/// Bounded accumulator of throughput samples with a single writer.
///
/// Owned by the aggregator and updated once per successful snapshot
/// build; the only state in the system that survives across poll cycles.
/// There is deliberately no reset — it lives until process restart.
///
/// Peak policy: `peak_speed` is the lifetime maximum, monotonically
/// non-decreasing, independent of the retained window. Average, minimum,
/// and the history itself are bounded to the window.
#[derive(Debug)]
pub struct StatsTracker {
    samples: VecDeque<f64>,
    capacity: usize,
    peak: f64,
    started_at: Instant,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            peak: 0.0,
            started_at: Instant::now(),
        }
    }

    /// Append a sample (evicting the oldest when full) and return the
    /// derived statistics over the retained window.
    pub fn update(&mut self, current: f64) -> RollingStats {
        if current > self.peak {
            self.peak = current;
        }

        self.samples.push_back(current);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        self.snapshot(current)
    }

    /// Derived statistics without recording a new sample.
    #[allow(clippy::cast_precision_loss)]
    fn snapshot(&self, current: f64) -> RollingStats {
        let len = self.samples.len();
        let sum: f64 = self.samples.iter().sum();
        let avg_speed = if len == 0 { 0.0 } else { sum / len as f64 };

        // Minimum over the non-idle samples; an all-zero window falls
        // back to the current sample.
        let min_speed = self
            .samples
            .iter()
            .copied()
            .filter(|s| *s > 0.0)
            .fold(current, f64::min);

        RollingStats {
            peak_speed: self.peak,
            avg_speed,
            min_speed,
            speed_history: self.samples.iter().copied().collect(),
            uptime: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
