//! Neighbour generation operators.
//!
//! Every operator returns a fresh point and leaves its input untouched.
//! Degenerate inputs (too few coordinates, single-valued dimensions) make
//! the affected operator a no-op instead of an error.
//!
//! | Operator | Effect |
//! |---|---|
//! | [`swap_mutation`] | Exchange the values at two random positions |
//! | [`total_random_chaos_mutation`] | Draw a brand new random point |
//! | [`value_mutation`] | Redraw each position independently with some probability |
//! | [`mutate_point`] | Pick one of the above by fixed-order Bernoulli trials |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rng_util;
use crate::space::SearchSpace;

/// Probabilities steering [`mutate_point`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MutationConfig {
    /// Probability of a swap mutation.
    pub swap_prob: f64,
    /// Probability of a total random chaos mutation, tried when no swap happened.
    pub total_random_chaos_prob: f64,
    /// Per-position mutation probability of value mutation.
    pub index_mutation_prob: f64,
    /// Force value mutation to change at least one position.
    pub mutate_at_least_one_index: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            swap_prob: 0.0,
            total_random_chaos_prob: 0.0,
            index_mutation_prob: 0.4,
            mutate_at_least_one_index: false,
        }
    }
}

/// Mutate `point` with exactly one operator.
///
/// A swap happens with probability `swap_prob`; otherwise total random chaos
/// with probability `total_random_chaos_prob`; otherwise value mutation.
/// The two trials are independent, so chaos effectively fires with
/// probability `(1 - swap_prob) * total_random_chaos_prob`.
pub fn mutate_point(
    rng: &mut fastrand::Rng,
    point: &[usize],
    space: &SearchSpace,
    config: &MutationConfig,
) -> Vec<usize> {
    if rng.f64() < config.swap_prob {
        return swap_mutation(rng, point, space);
    }
    if rng.f64() < config.total_random_chaos_prob {
        return total_random_chaos_mutation(rng, space);
    }
    value_mutation(
        rng,
        point,
        space,
        config.index_mutation_prob,
        config.mutate_at_least_one_index,
    )
}

/// Exchange the values at two distinct random positions.
///
/// Each half of the swap only happens if the incoming value fits the
/// destination dimension, so the result may be a one-sided copy or an
/// unchanged point. Points with fewer than two coordinates are returned as is.
pub fn swap_mutation(rng: &mut fastrand::Rng, point: &[usize], space: &SearchSpace) -> Vec<usize> {
    let mut mutated = point.to_vec();
    if point.len() < 2 {
        return mutated;
    }

    let picked = rng_util::sample_k_of_n(rng, 2, point.len());
    let (a, b) = (picked[0], picked[1]);
    if point[b] < space.dimension_size(a) {
        mutated[a] = point[b];
    }
    if point[a] < space.dimension_size(b) {
        mutated[b] = point[a];
    }
    mutated
}

/// A uniformly random point, ignoring any current point.
pub fn total_random_chaos_mutation(rng: &mut fastrand::Rng, space: &SearchSpace) -> Vec<usize> {
    space.random_point(rng)
}

/// Redraw each position with probability `index_mutation_prob`.
///
/// With `mutate_at_least_one_index`, one position chosen up front is always
/// redrawn. A redrawn position always receives a value different from its
/// current one, except in dimensions of size one, which are left alone.
pub fn value_mutation(
    rng: &mut fastrand::Rng,
    point: &[usize],
    space: &SearchSpace,
    index_mutation_prob: f64,
    mutate_at_least_one_index: bool,
) -> Vec<usize> {
    let mut mutated = point.to_vec();
    if point.is_empty() {
        return mutated;
    }

    let forced = mutate_at_least_one_index.then(|| rng.usize(0..point.len()));
    for (i, value) in mutated.iter_mut().enumerate() {
        if rng.f64() < index_mutation_prob || forced == Some(i) {
            *value = mutate_index(rng, *value, space.dimension_size(i));
        }
    }
    mutated
}

/// A value in `0..size` different from `current`, or `current` if `size <= 1`.
fn mutate_index(rng: &mut fastrand::Rng, current: usize, size: usize) -> usize {
    if size <= 1 {
        return current;
    }
    let drawn = rng.usize(0..size - 1);
    if drawn >= current { drawn + 1 } else { drawn }
}
