//! The N-Tuple Bandit Evolutionary Algorithm loop.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{NtbeaBuilder, NtbeaConfig};
use crate::error::{Error, Result};
use crate::evaluation::{Evaluator, evaluate_batch};
use crate::mutation;
use crate::ntuple::NTupleSystem;
use crate::rng_util;
use crate::selector::BestSelector;
use crate::space::SearchSpace;

mod export;
mod statistics;

#[cfg(feature = "async")]
mod async_impl;

pub use statistics::{EvolutionStatistics, GenerationRecord};

/// Consecutive duplicate neighbours tolerated before a generation stops
/// looking for more distinct ones.
const MAX_DUPLICATE_STREAK: usize = 10_000;

/// Lifecycle of an [`Ntbea`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    /// No generation has started.
    NotStarted,
    /// The given 1-based generation is executing.
    Running {
        /// Current generation.
        generation: usize,
    },
    /// All generations finished and a solution is available.
    Completed,
    /// An evaluation failed and the run was aborted.
    Failed,
}

/// The recommended point of a run and its mean value estimate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Best point among all evaluated points.
    pub point: Vec<usize>,
    /// Model estimate of the point's value.
    pub value: f64,
}

/// An NTBEA optimizer over one search space.
///
/// Each generation evaluates the current point, feeds the result into the
/// [`NTupleSystem`], scores a batch of mutated neighbours by UCB, and moves to
/// the best one. The final answer is the best of all sampled points under
/// the model, which need not be the last current point.
///
/// # Examples
///
/// ```
/// use ntbea::{Ntbea, SearchSpace};
///
/// let space = SearchSpace::new(vec![5, 5, 5, 5, 5]).unwrap();
/// let mut ntbea = Ntbea::builder(space, &[1, 2])
///     .neighbours(50)
///     .mutate_at_least_one_index(true)
///     .seed(1)
///     .build()
///     .unwrap();
///
/// let solution = ntbea
///     .run(|p: &[usize]| p.iter().sum::<usize>() as f64, 30)
///     .unwrap();
/// assert_eq!(solution.point.len(), 5);
/// ```
#[derive(Debug)]
pub struct Ntbea {
    pub(crate) model: NTupleSystem,
    pub(crate) config: NtbeaConfig,
    pub(crate) rng: fastrand::Rng,
    pub(crate) statistics: EvolutionStatistics,
    pub(crate) state: RunState,
    pub(crate) solution: Option<Solution>,
}

impl Ntbea {
    /// Create an optimizer with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the error of [`NtbeaConfig::validate`] or
    /// [`NTupleSystem::new`] if either rejects its input.
    pub fn new(
        space: impl Into<Arc<SearchSpace>>,
        tuple_lengths: &[usize],
        config: NtbeaConfig,
    ) -> Result<Self> {
        let space = space.into();
        config.validate(&space)?;
        let model = NTupleSystem::new(space, tuple_lengths)?;
        let lengths = model.coverage_by_length().into_keys().collect();

        Ok(Self {
            model,
            rng: rng_util::rng_from_seed(config.seed),
            config,
            statistics: EvolutionStatistics::new(lengths),
            state: RunState::NotStarted,
            solution: None,
        })
    }

    /// Start a [`NtbeaBuilder`] for `space` modelled with tuples of the given
    /// lengths.
    #[must_use]
    pub fn builder(space: impl Into<Arc<SearchSpace>>, tuple_lengths: &[usize]) -> NtbeaBuilder {
        NtbeaBuilder::new(space.into(), tuple_lengths)
    }

    /// Run `generations` generations against `evaluator` and return the best
    /// of the sampled points.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCount`] if `generations` is zero.
    /// - [`Error::RunAlreadyStarted`] unless the optimizer is fresh or was
    ///   [`reset`](Self::reset).
    /// - Any evaluation error of [`evaluate_batch`]; the run is then
    ///   [`RunState::Failed`].
    pub fn run<E>(&mut self, evaluator: E, generations: usize) -> Result<Solution>
    where
        E: Evaluator + 'static,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("run", generations).entered();

        let evaluator = Arc::new(evaluator);
        let mut current = self.begin(generations)?;

        for generation in 1..=generations {
            self.state = RunState::Running { generation };
            let fitness = match evaluate_batch(
                &evaluator,
                &current,
                self.config.evaluation_samples,
                self.config.evaluation_threads,
                self.config.evaluation_timeout,
            ) {
                Ok(stats) => stats.mean(),
                Err(e) => return Err(self.fail(e)),
            };
            current = self.advance(generation, current, fitness);
        }

        self.finish()
    }

    /// Check preconditions and pick the first current point.
    pub(crate) fn begin(&mut self, generations: usize) -> Result<Vec<usize>> {
        if generations == 0 {
            return Err(Error::InvalidCount {
                name: "generations",
            });
        }
        if self.state != RunState::NotStarted {
            return Err(Error::RunAlreadyStarted);
        }
        Ok(match &self.config.initial_point {
            Some(point) => point.clone(),
            None => self.model.random_point(&mut self.rng),
        })
    }

    pub(crate) fn fail(&mut self, error: Error) -> Error {
        trace_info!(state = ?self.state, error = %error, "evaluation failed, aborting run");
        self.state = RunState::Failed;
        error
    }

    /// Feed the evaluated current point to the model, pick the best
    /// neighbour, and record the generation. Returns the next current point.
    pub(crate) fn advance(
        &mut self,
        generation: usize,
        current: Vec<usize>,
        fitness: f64,
    ) -> Vec<usize> {
        self.model.add_point(&current, fitness);

        let best = self.best_neighbour(&current);
        let best_neighbour_ucb = best.as_ref().map_or(f64::NAN, |(_, ucb)| *ucb);

        let (best_of_sampled, best_of_sampled_value) = self
            .model
            .best_of_sampled()
            .unwrap_or_else(|| (current.clone(), fitness));

        trace_info!(
            generation,
            current = ?current,
            fitness,
            best_of_sampled = ?best_of_sampled,
            best_of_sampled_value,
            "generation complete"
        );

        self.statistics.push(GenerationRecord {
            generation,
            current_point: current.clone(),
            current_fitness: fitness,
            best_neighbour_ucb,
            best_of_sampled,
            best_of_sampled_value,
            coverage: self.model.coverage_by_length(),
        });

        best.map_or(current, |(point, _)| point)
    }

    /// Generate the neighbours of `current` and return the one with the
    /// highest UCB score.
    #[allow(clippy::cast_possible_truncation)]
    fn best_neighbour(&mut self, current: &[usize]) -> Option<(Vec<usize>, f64)> {
        let space = Arc::clone(self.model.search_space());
        let target = (self.config.neighbours as u64).min(space.size() / 4) as usize;

        let mut selector = BestSelector::new();
        let mut seen = HashSet::new();
        let mut duplicate_streak = 0;
        while selector.n_items() < target {
            let neighbour =
                mutation::mutate_point(&mut self.rng, current, &space, &self.config.mutation);

            if self.config.distinct_neighbours && !seen.insert(space.index_of(&neighbour)) {
                duplicate_streak += 1;
                if duplicate_streak >= MAX_DUPLICATE_STREAK {
                    trace_debug!(
                        found = selector.n_items(),
                        target,
                        "neighbourhood exhausted before reaching target"
                    );
                    break;
                }
                continue;
            }
            duplicate_streak = 0;

            let ucb = self.model.ucb_value(
                &neighbour,
                self.config.epsilon,
                self.config.k_explore,
                &mut self.rng,
            );
            selector.add(neighbour, ucb);
        }

        trace_debug!(
            neighbours = selector.n_items(),
            best_ucb = selector.best_score(),
            "neighbours scored"
        );
        selector.into_best()
    }

    pub(crate) fn finish(&mut self) -> Result<Solution> {
        let (point, value) = self
            .model
            .best_of_sampled()
            .ok_or(Error::NoSampledPoints)?;
        let solution = Solution { point, value };
        self.state = RunState::Completed;
        self.solution = Some(solution.clone());

        trace_info!(point = ?solution.point, value = solution.value, "run complete");
        Ok(solution)
    }

    /// Discard the model, statistics, and solution so the optimizer can run
    /// again. The random source restarts from the configured seed.
    pub fn reset(&mut self) {
        self.model.reset();
        self.statistics.clear();
        self.rng = rng_util::rng_from_seed(self.config.seed);
        self.state = RunState::NotStarted;
        self.solution = None;
    }

    /// The recommended solution of the last completed run.
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The frozen run configuration.
    #[must_use]
    pub fn config(&self) -> &NtbeaConfig {
        &self.config
    }

    /// The fitness landscape model.
    #[must_use]
    pub fn model(&self) -> &NTupleSystem {
        &self.model
    }

    /// Per-generation statistics.
    #[must_use]
    pub fn statistics(&self) -> &EvolutionStatistics {
        &self.statistics
    }

    /// The search space being optimized.
    #[must_use]
    pub fn search_space(&self) -> &Arc<SearchSpace> {
        self.model.search_space()
    }
}
