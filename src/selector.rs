//! Single-pass argmax selection.

/// Keeps the highest-scoring item seen so far.
///
/// The first item always becomes the best; later items replace it only when
/// their score is strictly greater, so the first-seen item wins exact ties.
/// A `NaN` score never replaces an existing best.
#[derive(Clone, Debug)]
pub struct BestSelector<T> {
    best: Option<(T, f64)>,
    n_items: usize,
}

impl<T> BestSelector<T> {
    /// Create an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            best: None,
            n_items: 0,
        }
    }

    /// Offer an item with its score.
    pub fn add(&mut self, item: T, score: f64) {
        let replace = match &self.best {
            None => true,
            Some((_, best)) => score > *best,
        };
        if replace {
            self.best = Some((item, score));
        }
        self.n_items += 1;
    }

    /// Number of items offered.
    #[must_use]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Score of the best item, `NaN` if nothing was offered.
    #[must_use]
    pub fn best_score(&self) -> f64 {
        self.best.as_ref().map_or(f64::NAN, |(_, s)| *s)
    }

    /// Best item, if any.
    #[must_use]
    pub fn best(&self) -> Option<&T> {
        self.best.as_ref().map(|(item, _)| item)
    }

    /// Consume the selector, returning the best item and its score.
    #[must_use]
    pub fn into_best(self) -> Option<(T, f64)> {
        self.best
    }
}

impl<T> Default for BestSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}
