//! Run configuration for [`Ntbea`](crate::Ntbea).

use core::time::Duration;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::evaluation::DEFAULT_EVALUATION_TIMEOUT;
use crate::mutation::MutationConfig;
use crate::ntbea::Ntbea;
use crate::space::SearchSpace;

/// Parameters of an NTBEA run.
///
/// Build one with struct-update syntax over [`Default`] and hand it to
/// [`Ntbea::new`], or use [`Ntbea::builder`]. Either way it is validated once
/// and then frozen inside the [`Ntbea`] for the whole run.
///
/// # Defaults
///
/// | Option | Default |
/// |---|---|
/// | `neighbours` | 100 |
/// | `distinct_neighbours` | `false` |
/// | `evaluation_samples` | 1 |
/// | `evaluation_threads` | 1 (`0` = all hardware threads) |
/// | `k_explore` | 2.0 |
/// | `epsilon` | 0.5 |
/// | `mutation` | [`MutationConfig::default`] |
/// | `initial_point` | random |
/// | `evaluation_timeout` | 10 hours |
/// | `seed` | from entropy |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NtbeaConfig {
    /// Neighbours generated around the current point each generation.
    pub neighbours: usize,
    /// Reject neighbours already generated in the same generation.
    pub distinct_neighbours: bool,
    /// Evaluations averaged into the fitness of the current point.
    pub evaluation_samples: usize,
    /// Worker threads for evaluation; `0` uses every hardware thread.
    pub evaluation_threads: usize,
    /// Exploration coefficient of the UCB score.
    pub k_explore: f64,
    /// Pseudo-count added to pattern counts in the exploration term.
    pub epsilon: f64,
    /// Neighbour mutation probabilities.
    pub mutation: MutationConfig,
    /// First current point; random when `None`.
    pub initial_point: Option<Vec<usize>>,
    /// Deadline for one evaluation batch.
    pub evaluation_timeout: Duration,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for NtbeaConfig {
    fn default() -> Self {
        Self {
            neighbours: 100,
            distinct_neighbours: false,
            evaluation_samples: 1,
            evaluation_threads: 1,
            k_explore: 2.0,
            epsilon: 0.5,
            mutation: MutationConfig::default(),
            initial_point: None,
            evaluation_timeout: DEFAULT_EVALUATION_TIMEOUT,
            seed: None,
        }
    }
}

impl NtbeaConfig {
    /// Check the configuration against `space`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCount`] for zero `neighbours` or `evaluation_samples`.
    /// - [`Error::InvalidExplorationCoefficient`] for a non-finite `k_explore`.
    /// - [`Error::InvalidEpsilon`] unless `epsilon` is positive and finite.
    /// - [`Error::InvalidProbability`] for a mutation probability outside `[0, 1]`.
    /// - [`Error::InvalidInitialPoint`] if `initial_point` is not in `space`.
    pub fn validate(&self, space: &SearchSpace) -> Result<()> {
        if self.neighbours == 0 {
            return Err(Error::InvalidCount { name: "neighbours" });
        }
        if self.evaluation_samples == 0 {
            return Err(Error::InvalidCount {
                name: "evaluation_samples",
            });
        }
        if !self.k_explore.is_finite() {
            return Err(Error::InvalidExplorationCoefficient(self.k_explore));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidEpsilon(self.epsilon));
        }
        for (name, value) in [
            ("swap_prob", self.mutation.swap_prob),
            (
                "total_random_chaos_prob",
                self.mutation.total_random_chaos_prob,
            ),
            ("index_mutation_prob", self.mutation.index_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidProbability { name, value });
            }
        }
        if let Some(point) = &self.initial_point
            && !space.contains(point)
        {
            return Err(Error::InvalidInitialPoint {
                point: point.clone(),
            });
        }
        Ok(())
    }
}

/// Fluent builder for [`Ntbea`].
///
/// Created via [`Ntbea::builder`]. Options not set keep their
/// [`NtbeaConfig`] default.
///
/// # Examples
///
/// ```
/// use ntbea::{Ntbea, SearchSpace};
///
/// let space = SearchSpace::new(vec![5, 5, 5]).unwrap();
/// let ntbea = Ntbea::builder(space, &[1, 2, 3])
///     .k_explore(2.0)
///     .neighbours(50)
///     .mutate_at_least_one_index(true)
///     .distinct_neighbours(true)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(ntbea.config().neighbours, 50);
/// ```
#[derive(Clone, Debug)]
pub struct NtbeaBuilder {
    space: Arc<SearchSpace>,
    tuple_lengths: Vec<usize>,
    config: NtbeaConfig,
}

impl NtbeaBuilder {
    pub(crate) fn new(space: Arc<SearchSpace>, tuple_lengths: &[usize]) -> Self {
        Self {
            space,
            tuple_lengths: tuple_lengths.to_vec(),
            config: NtbeaConfig::default(),
        }
    }

    /// Number of neighbours generated each generation.
    #[must_use]
    pub fn neighbours(mut self, neighbours: usize) -> Self {
        self.config.neighbours = neighbours;
        self
    }

    /// Reject duplicate neighbours within a generation.
    #[must_use]
    pub fn distinct_neighbours(mut self, distinct: bool) -> Self {
        self.config.distinct_neighbours = distinct;
        self
    }

    /// Evaluations per current point.
    #[must_use]
    pub fn evaluation_samples(mut self, samples: usize) -> Self {
        self.config.evaluation_samples = samples;
        self
    }

    /// Worker threads for evaluation (`0` = all hardware threads).
    #[must_use]
    pub fn evaluation_threads(mut self, threads: usize) -> Self {
        self.config.evaluation_threads = threads;
        self
    }

    /// Deadline for one evaluation batch.
    #[must_use]
    pub fn evaluation_timeout(mut self, timeout: Duration) -> Self {
        self.config.evaluation_timeout = timeout;
        self
    }

    /// Exploration coefficient.
    #[must_use]
    pub fn k_explore(mut self, k_explore: f64) -> Self {
        self.config.k_explore = k_explore;
        self
    }

    /// Exploration pseudo-count.
    #[must_use]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Swap mutation probability.
    #[must_use]
    pub fn swap_mutation_prob(mut self, prob: f64) -> Self {
        self.config.mutation.swap_prob = prob;
        self
    }

    /// Total random chaos mutation probability.
    #[must_use]
    pub fn total_random_chaos_prob(mut self, prob: f64) -> Self {
        self.config.mutation.total_random_chaos_prob = prob;
        self
    }

    /// Per-position probability of value mutation.
    #[must_use]
    pub fn index_mutation_prob(mut self, prob: f64) -> Self {
        self.config.mutation.index_mutation_prob = prob;
        self
    }

    /// Make value mutation change at least one position.
    #[must_use]
    pub fn mutate_at_least_one_index(mut self, enabled: bool) -> Self {
        self.config.mutation.mutate_at_least_one_index = enabled;
        self
    }

    /// Start the search from `point` instead of a random point.
    #[must_use]
    pub fn initial_point(mut self, point: Vec<usize>) -> Self {
        self.config.initial_point = Some(point);
        self
    }

    /// Seed the random source.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the options and build the [`Ntbea`].
    ///
    /// # Errors
    ///
    /// Any error of [`NtbeaConfig::validate`] or
    /// [`NTupleSystem::new`](crate::NTupleSystem::new).
    pub fn build(self) -> Result<Ntbea> {
        Ntbea::new(self.space, &self.tuple_lengths, self.config)
    }
}
