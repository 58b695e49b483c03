//! Running summary statistics.
//!
//! [`RunningStats`] accumulates count, mean, variance, min and max in a
//! single pass using Welford's update. [`SyncRunningStats`] wraps it for
//! concurrent accumulation from evaluation workers.

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Incrementally updated summary statistics over a stream of `f64` values.
///
/// Empty statistics report `NaN` for mean, min, max and standard deviation.
///
/// # Examples
///
/// ```
/// use ntbea::RunningStats;
///
/// let mut stats = RunningStats::new();
/// for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.push(v);
/// }
/// assert_eq!(stats.count(), 8);
/// assert!((stats.mean() - 5.0).abs() < 1e-12);
/// assert_eq!(stats.min(), 2.0);
/// assert_eq!(stats.max(), 9.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Create empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Number of values added.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether no value has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean, `NaN` when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Sample variance (`n - 1` denominator).
    ///
    /// `0.0` for a single value, `NaN` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> f64 {
        match self.count {
            0 => f64::NAN,
            1 => 0.0,
            n => self.m2 / (n - 1) as f64,
        }
    }

    /// Sample standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest value, `NaN` when empty.
    #[must_use]
    pub fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    /// Largest value, `NaN` when empty.
    #[must_use]
    pub fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

/// Standard error of the mean: `std_dev / sqrt(count)`.
///
/// `NaN` when `stats` is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn standard_error(stats: &RunningStats) -> f64 {
    stats.std_dev() / (stats.count() as f64).sqrt()
}

/// [`RunningStats`] behind a mutex, safe to update from several threads.
#[derive(Debug, Default)]
pub struct SyncRunningStats {
    inner: Mutex<RunningStats>,
}

impl SyncRunningStats {
    /// Create empty shared statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub fn push(&self, value: f64) {
        self.inner.lock().push(value);
    }

    /// Number of values added so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.inner.lock().count()
    }

    /// Copy of the current statistics.
    #[must_use]
    pub fn snapshot(&self) -> RunningStats {
        self.inner.lock().clone()
    }

    /// Consume the wrapper and return the accumulated statistics.
    #[must_use]
    pub fn into_inner(self) -> RunningStats {
        self.inner.into_inner()
    }
}
