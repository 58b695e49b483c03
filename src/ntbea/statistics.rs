use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happened in one generation of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationRecord {
    /// 1-based generation number.
    pub generation: usize,
    /// The point evaluated this generation.
    pub current_point: Vec<usize>,
    /// Mean of the evaluation samples of the current point.
    pub current_fitness: f64,
    /// UCB score of the best neighbour, `NaN` if no neighbour was generated.
    pub best_neighbour_ucb: f64,
    /// Best point among everything sampled so far.
    pub best_of_sampled: Vec<usize>,
    /// Mean value estimate of `best_of_sampled`.
    pub best_of_sampled_value: f64,
    /// Mean coverage percentage per tuple length.
    pub coverage: BTreeMap<usize, f64>,
}

/// Per-generation history of a run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolutionStatistics {
    tuple_lengths: Vec<usize>,
    records: Vec<GenerationRecord>,
}

impl EvolutionStatistics {
    pub(crate) fn new(tuple_lengths: Vec<usize>) -> Self {
        Self {
            tuple_lengths,
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// Modelled tuple lengths, ascending.
    #[must_use]
    pub fn tuple_lengths(&self) -> &[usize] {
        &self.tuple_lengths
    }

    /// One record per completed generation.
    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Number of recorded generations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no generation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Coverage of tuples of `length` over the generations.
    #[must_use]
    pub fn coverage_series(&self, length: usize) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.coverage.get(&length).copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// First generation at which tuples of `length` reached full coverage.
    #[must_use]
    pub fn generation_fully_covered(&self, length: usize) -> Option<usize> {
        self.records
            .iter()
            .find(|r| r.coverage.get(&length).is_some_and(|&c| c >= 100.0 - 1e-9))
            .map(|r| r.generation)
    }
}
