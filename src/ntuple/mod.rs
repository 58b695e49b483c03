//! N-tuples: bandits over projections of the search space.
//!
//! An [`NTuple`] watches a fixed subset of dimensions and keeps running
//! statistics for every [`NTuplePattern`] (projection) it has seen. The
//! [`NTupleSystem`] combines many overlapping n-tuples into a fitness
//! landscape model.

mod pattern;
mod system;

use core::cmp::Ordering;
use core::fmt::Write;
use std::collections::HashMap;

pub use pattern::NTuplePattern;
pub use system::NTupleSystem;

use crate::space::SearchSpace;
use crate::stats::RunningStats;

/// A subset of search-space dimensions and the statistics of the patterns
/// observed on them.
#[derive(Clone, Debug)]
pub struct NTuple {
    indices: Vec<usize>,
    combinations: u64,
    patterns: HashMap<NTuplePattern, RunningStats>,
    n_samples: u64,
}

impl NTuple {
    /// Create an n-tuple over `indices` of `space`.
    ///
    /// The number of possible patterns is the product of the sizes of the
    /// indexed dimensions, saturating at `u64::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range for `space`.
    #[must_use]
    pub fn new(indices: Vec<usize>, space: &SearchSpace) -> Self {
        let combinations = indices
            .iter()
            .try_fold(1u64, |acc, &i| acc.checked_mul(space.dimension_size(i) as u64))
            .unwrap_or(u64::MAX);
        Self::with_combinations(indices, combinations)
    }

    pub(crate) fn with_combinations(indices: Vec<usize>, combinations: u64) -> Self {
        Self {
            indices,
            combinations,
            patterns: HashMap::new(),
            n_samples: 0,
        }
    }

    /// Record `value` for the pattern `point` projects to.
    pub fn add_point(&mut self, point: &[usize], value: f64) {
        let pattern = NTuplePattern::new(point, self);
        self.patterns.entry(pattern).or_default().push(value);
        self.n_samples += 1;
    }

    /// Statistics for the pattern of `point`, or `None` if it was never observed.
    #[must_use]
    pub fn stats(&self, point: &[usize]) -> Option<&RunningStats> {
        self.patterns.get(&NTuplePattern::new(point, self))
    }

    /// Forget every observation. The indexed dimensions are kept.
    pub fn reset(&mut self) {
        self.patterns.clear();
        self.n_samples = 0;
    }

    /// Number of samples added since construction or the last reset.
    #[must_use]
    pub fn num_samples(&self) -> u64 {
        self.n_samples
    }

    /// Number of distinct patterns observed.
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.patterns.len()
    }

    /// Number of patterns this tuple can observe.
    #[must_use]
    pub fn combinations(&self) -> u64 {
        self.combinations
    }

    /// Percentage of the possible patterns observed at least once.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_observed(&self) -> f64 {
        self.patterns.len() as f64 / self.combinations as f64 * 100.0
    }

    /// Number of indexed dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the tuple indexes no dimension.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dimension indexed at position `i`.
    #[must_use]
    pub fn index_at(&self, i: usize) -> usize {
        self.indices[i]
    }

    /// All indexed dimensions.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Append this tuple's report block to `out`.
    ///
    /// Patterns are listed in ascending pattern order.
    pub fn write_report(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "{}-Tuple{:?}\tSamples: {}\tObserved Patterns: {} / {} ({:.2}%)",
            self.len(),
            self.indices,
            self.n_samples,
            self.num_entries(),
            self.combinations,
            self.percent_observed()
        );
        out.push_str("\tPattern / Samples / Mean / STD / Min / Max\n");

        let mut entries: Vec<_> = self.patterns.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (pattern, stats) in entries {
            let _ = writeln!(
                out,
                "\t{pattern}\t {:<4}\t {}\t {}\t {}\t {}",
                stats.count(),
                stats.mean(),
                stats.std_dev(),
                stats.min(),
                stats.max()
            );
        }
        out.push('\n');
    }
}

impl PartialEq for NTuple {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
    }
}

impl Eq for NTuple {}

impl PartialOrd for NTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NTuple {
    /// Shorter tuples first, then lexicographic over the dimension indices.
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.indices.cmp(&other.indices))
    }
}
