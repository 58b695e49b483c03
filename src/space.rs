//! Discrete search spaces and the point ⇄ index bijection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A discrete product space with one finite dimension per coordinate.
///
/// Every point has a unique linear index in `0..size()`, obtained by reading
/// the point as a mixed-radix number whose last coordinate is the least
/// significant digit.
///
/// # Examples
///
/// ```
/// use ntbea::SearchSpace;
///
/// let space = SearchSpace::new(vec![10, 10, 10, 10]).unwrap();
/// assert_eq!(space.size(), 10_000);
/// assert_eq!(space.index_of(&[1, 1, 1, 1]), 1111);
/// assert_eq!(space.point_at(1111), vec![1, 1, 1, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSpace {
    sizes: Vec<usize>,
}

impl SearchSpace {
    /// Create a search space from its dimension sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDimension`] if any dimension has size zero.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if let Some(dimension) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::ZeroDimension { dimension });
        }
        Ok(Self { sizes })
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.sizes.len()
    }

    /// Size of dimension `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.dimensions()`.
    #[must_use]
    pub fn dimension_size(&self, i: usize) -> usize {
        self.sizes[i]
    }

    /// All dimension sizes in order.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of points in the space, saturating at `u64::MAX`.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.sizes
            .iter()
            .try_fold(1u64, |acc, &s| acc.checked_mul(s as u64))
            .unwrap_or(u64::MAX)
    }

    /// Draw a point with every coordinate uniform in its dimension.
    pub fn random_point(&self, rng: &mut fastrand::Rng) -> Vec<usize> {
        self.sizes.iter().map(|&s| rng.usize(0..s)).collect()
    }

    /// Decode a linear index into a point.
    ///
    /// Indices at or above [`size`](Self::size) wrap around in the most
    /// significant dimension.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn point_at(&self, index: u64) -> Vec<usize> {
        let mut remaining = index;
        let mut point = vec![0; self.sizes.len()];
        for (slot, &size) in point.iter_mut().zip(&self.sizes).rev() {
            let size = size as u64;
            *slot = (remaining % size) as usize;
            remaining /= size;
        }
        point
    }

    /// Encode a point as its linear index.
    ///
    /// Arithmetic wraps on overflow, which only happens for spaces whose
    /// [`size`](Self::size) saturated.
    #[must_use]
    pub fn index_of(&self, point: &[usize]) -> u64 {
        let mut factor = 1u64;
        let mut total = 0u64;
        for (&value, &size) in point.iter().zip(&self.sizes).rev() {
            total = total.wrapping_add((value as u64).wrapping_mul(factor));
            factor = factor.wrapping_mul(size as u64);
        }
        total
    }

    /// Whether `point` has the right length and every coordinate is in range.
    #[must_use]
    pub fn contains(&self, point: &[usize]) -> bool {
        point.len() == self.sizes.len() && point.iter().zip(&self.sizes).all(|(&v, &s)| v < s)
    }
}
