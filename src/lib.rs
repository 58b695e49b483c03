#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! N-Tuple Bandit Evolutionary Algorithm (NTBEA) for noisy, expensive
//! optimization over discrete search spaces.
//!
//! NTBEA keeps a statistical model of the fitness landscape made of
//! *n-tuples*: bandits over combinations of dimensions that record the
//! values observed for every pattern of those dimensions. Each generation
//! evaluates one point, updates the model, and moves to the mutated
//! neighbour with the highest upper confidence bound. The final answer is the
//! sampled point the model rates highest, so a single unlucky evaluation
//! cannot hide a good point.
//!
//! # Getting Started
//!
//! Maximize the sum of five digits in `0..5`:
//!
//! ```
//! use ntbea::prelude::*;
//!
//! let space = SearchSpace::new(vec![5; 5]).unwrap();
//! let mut ntbea = Ntbea::builder(space, &[1, 2, 5])
//!     .neighbours(100)
//!     .mutate_at_least_one_index(true)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let solution = ntbea
//!     .run(|p: &[usize]| p.iter().sum::<usize>() as f64, 100)
//!     .unwrap();
//! println!("{:?} -> {}", solution.point, solution.value);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`SearchSpace`] | Discrete space: a list of dimension sizes with a mixed-radix point index. |
//! | [`NTuple`] | Bandit statistics for one combination of dimensions. |
//! | [`NTupleSystem`] | The landscape model: mean value and exploration estimates, UCB scores. |
//! | [`MutationConfig`] | Swap, chaos, and per-index value mutations producing neighbours. |
//! | [`Evaluator`] | The (noisy) fitness function, implemented by any `Fn(&[usize]) -> f64`. |
//! | [`Ntbea`] | Drive the evolutionary loop and record per-generation statistics. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `async` | [`Ntbea::run_async`] and [`evaluate_batch_async`] on tokio | off |
//! | `serde` | `Serialize`/`Deserialize` on spaces, configs, and statistics | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for runs and generations | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod config;
mod error;
mod evaluation;
pub mod mutation;
mod ntbea;
mod ntuple;
pub mod rng_util;
mod selector;
mod space;
mod stats;

pub use config::{NtbeaBuilder, NtbeaConfig};
pub use error::{Error, Result};
#[cfg(feature = "async")]
pub use evaluation::evaluate_batch_async;
pub use evaluation::{DEFAULT_EVALUATION_TIMEOUT, Evaluator, evaluate_batch};
pub use mutation::MutationConfig;
pub use ntbea::{EvolutionStatistics, GenerationRecord, Ntbea, RunState, Solution};
pub use ntuple::{NTuple, NTuplePattern, NTupleSystem};
pub use selector::BestSelector;
pub use space::SearchSpace;
pub use stats::{RunningStats, SyncRunningStats, standard_error};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use ntbea::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{NtbeaBuilder, NtbeaConfig};
    pub use crate::error::{Error, Result};
    pub use crate::evaluation::Evaluator;
    pub use crate::mutation::MutationConfig;
    pub use crate::ntbea::{Ntbea, RunState, Solution};
    pub use crate::ntuple::NTupleSystem;
    pub use crate::space::SearchSpace;
}
