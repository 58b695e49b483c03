use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::NTuple;
use crate::error::{Error, Result};
use crate::selector::BestSelector;
use crate::space::SearchSpace;
use crate::stats::RunningStats;

/// Magnitude of the uniform noise added to UCB values to break ties.
const UCB_TIE_BREAK: f64 = 1e-6;

/// The n-tuple bandit fitness landscape model.
///
/// Holds one [`NTuple`] for every combination of dimensions of every
/// requested length, plus the history of sampled points. Value estimates
/// for a point average the beliefs of all tuples about the patterns that
/// point touches.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ntbea::{NTupleSystem, SearchSpace};
///
/// let space = Arc::new(SearchSpace::new(vec![3, 3, 3]).unwrap());
/// let mut model = NTupleSystem::new(space, &[1, 2]).unwrap();
/// assert_eq!(model.tuples().len(), 3 + 3);
///
/// model.add_point(&[0, 1, 2], 5.0);
/// assert_eq!(model.mean_value_estimate(&[0, 1, 2]), 5.0);
/// assert_eq!(model.mean_value_estimate(&[1, 2, 0]), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct NTupleSystem {
    space: Arc<SearchSpace>,
    tuples: Vec<NTuple>,
    sampled: Vec<Vec<usize>>,
}

impl NTupleSystem {
    /// Build the model for `space` with one tuple per dimension combination
    /// of each length in `tuple_lengths`.
    ///
    /// Duplicate lengths are ignored. Tuples are kept sorted by the
    /// [`NTuple`] ordering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTupleLengths`] if `tuple_lengths` is empty and
    /// [`Error::InvalidTupleLength`] for a length of zero or one greater than
    /// the number of dimensions.
    pub fn new(space: Arc<SearchSpace>, tuple_lengths: &[usize]) -> Result<Self> {
        let lengths = validate_tuple_lengths(tuple_lengths, space.dimensions())?;

        let mut tuples = Vec::new();
        for length in lengths {
            for combination in combinations(space.dimensions(), length) {
                tuples.push(NTuple::new(combination, &space));
            }
        }
        tuples.sort();

        trace_debug!(n_tuples = tuples.len(), "n-tuple system built");

        Ok(Self {
            space,
            tuples,
            sampled: Vec::new(),
        })
    }

    /// Record an evaluated point.
    pub fn add_point(&mut self, point: &[usize], value: f64) {
        self.sampled.push(point.to_vec());
        for tuple in &mut self.tuples {
            tuple.add_point(point, value);
        }
    }

    /// Average of the observed pattern means of `point` over all tuples.
    ///
    /// Tuples that never saw the point's pattern are skipped, as are `NaN`
    /// means. Returns `0.0` when nothing was observed.
    #[must_use]
    pub fn mean_value_estimate(&self, point: &[usize]) -> f64 {
        let means: RunningStats = self
            .tuples
            .iter()
            .filter_map(|t| t.stats(point))
            .map(RunningStats::mean)
            .filter(|m| !m.is_nan())
            .collect();
        let estimate = means.mean();
        if estimate.is_nan() { 0.0 } else { estimate }
    }

    /// Average UCB exploration term of `point` over all tuples.
    ///
    /// For a tuple with `n` samples in total the term is
    /// `sqrt(ln(n + 1) / (k + epsilon))`, where `k` is the number of times the
    /// point's pattern was observed (zero if never).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn exploration_estimate(&self, point: &[usize], epsilon: f64) -> f64 {
        if self.tuples.is_empty() {
            return 0.0;
        }
        let n = self.tuples.len() as f64;
        self.tuples
            .iter()
            .map(|t| {
                let observed = t.stats(point).map_or(0.0, |s| s.count() as f64);
                ((t.num_samples() as f64 + 1.0).ln() / (observed + epsilon)).sqrt()
            })
            .map(|e| e / n)
            .sum()
    }

    /// UCB score: mean estimate plus `k_explore` times the exploration
    /// estimate, plus a uniform jitter below `1e-6` to break ties.
    pub fn ucb_value(
        &self,
        point: &[usize],
        epsilon: f64,
        k_explore: f64,
        rng: &mut fastrand::Rng,
    ) -> f64 {
        self.mean_value_estimate(point)
            + k_explore * self.exploration_estimate(point, epsilon)
            + rng.f64() * UCB_TIE_BREAK
    }

    /// The sampled point with the highest mean value estimate, and that
    /// estimate. The earliest sample wins ties. `None` before any sample.
    #[must_use]
    pub fn best_of_sampled(&self) -> Option<(Vec<usize>, f64)> {
        let mut selector = BestSelector::new();
        for point in &self.sampled {
            selector.add(point, self.mean_value_estimate(point));
        }
        selector
            .into_best()
            .map(|(point, value)| (point.clone(), value))
    }

    /// Scan the whole search space for the point with the highest mean value
    /// estimate.
    ///
    /// Cost is linear in the size of the space; only use on small spaces.
    #[must_use]
    pub fn best_solution(&self) -> Option<(Vec<usize>, f64)> {
        let mut selector = BestSelector::new();
        for index in 0..self.space.size() {
            let point = self.space.point_at(index);
            let value = self.mean_value_estimate(&point);
            selector.add(point, value);
        }
        selector.into_best()
    }

    /// Clear the sample history and every tuple.
    pub fn reset(&mut self) {
        self.sampled.clear();
        for tuple in &mut self.tuples {
            tuple.reset();
        }
    }

    /// Mean percentage of observed patterns for each tuple length.
    #[must_use]
    pub fn coverage_by_length(&self) -> BTreeMap<usize, f64> {
        let mut by_length: BTreeMap<usize, RunningStats> = BTreeMap::new();
        for tuple in &self.tuples {
            by_length
                .entry(tuple.len())
                .or_default()
                .push(tuple.percent_observed());
        }
        by_length
            .into_iter()
            .map(|(length, stats)| (length, stats.mean()))
            .collect()
    }

    /// Concatenated report blocks of all tuples.
    #[must_use]
    pub fn generate_report(&self) -> String {
        let mut out = String::new();
        for tuple in &self.tuples {
            tuple.write_report(&mut out);
        }
        out
    }

    /// Write [`generate_report`](Self::generate_report) to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_report(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        writer.write_all(self.generate_report().as_bytes())
    }

    /// A uniformly random point of the underlying search space.
    pub fn random_point(&self, rng: &mut fastrand::Rng) -> Vec<usize> {
        self.space.random_point(rng)
    }

    /// The modelled search space.
    #[must_use]
    pub fn search_space(&self) -> &Arc<SearchSpace> {
        &self.space
    }

    /// All tuples in [`NTuple`] order.
    #[must_use]
    pub fn tuples(&self) -> &[NTuple] {
        &self.tuples
    }

    /// Every point added so far, in insertion order.
    #[must_use]
    pub fn sampled_points(&self) -> &[Vec<usize>] {
        &self.sampled
    }
}

/// Check requested tuple lengths and return them deduplicated, ascending.
fn validate_tuple_lengths(lengths: &[usize], dimensions: usize) -> Result<Vec<usize>> {
    if lengths.is_empty() {
        return Err(Error::NoTupleLengths);
    }
    let unique: BTreeSet<usize> = lengths.iter().copied().collect();
    if let Some(&length) = unique.iter().find(|&&l| l == 0 || l > dimensions) {
        return Err(Error::InvalidTupleLength { length, dimensions });
    }
    Ok(unique.into_iter().collect())
}

/// All `k`-element subsets of `0..n` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return out;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}
