use core::fmt;

use super::NTuple;

/// The projection of a point onto the dimensions of an [`NTuple`].
///
/// Patterns are the arms of the bandit an n-tuple represents. They compare
/// lexicographically over their values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NTuplePattern {
    values: Vec<usize>,
}

impl NTuplePattern {
    /// Project `point` onto the dimensions of `tuple`.
    ///
    /// # Panics
    ///
    /// Panics if `point` is shorter than the largest index in `tuple`.
    #[must_use]
    pub fn new(point: &[usize], tuple: &NTuple) -> Self {
        Self {
            values: tuple.indices().iter().map(|&i| point[i]).collect(),
        }
    }

    /// Value at position `i` of the pattern.
    #[must_use]
    pub fn value_at(&self, i: usize) -> usize {
        self.values[i]
    }

    /// All pattern values.
    #[must_use]
    pub fn values(&self) -> &[usize] {
        &self.values
    }
}

impl From<Vec<usize>> for NTuplePattern {
    fn from(values: Vec<usize>) -> Self {
        Self { values }
    }
}

impl fmt::Display for NTuplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.values)
    }
}
