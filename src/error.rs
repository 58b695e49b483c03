/// Errors returned by search-space construction, configuration, and runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a search space dimension has size zero.
    #[error("search space dimension {dimension} has size zero")]
    ZeroDimension {
        /// The index of the offending dimension.
        dimension: usize,
    },

    /// Returned when no tuple lengths were requested.
    #[error("at least one tuple length is required")]
    NoTupleLengths,

    /// Returned when a tuple length is zero or exceeds the number of dimensions.
    #[error("invalid tuple length {length}: must be in 1..={dimensions}")]
    InvalidTupleLength {
        /// The requested tuple length.
        length: usize,
        /// The number of dimensions in the search space.
        dimensions: usize,
    },

    /// Returned when a probability is outside `[0.0, 1.0]`.
    #[error("invalid probability for {name}: {value} must be in [0.0, 1.0]")]
    InvalidProbability {
        /// The name of the configuration option.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the exploration epsilon is not strictly positive.
    #[error("invalid epsilon: {0} must be positive and finite")]
    InvalidEpsilon(f64),

    /// Returned when the exploration coefficient is not finite.
    #[error("invalid exploration coefficient: {0} must be finite")]
    InvalidExplorationCoefficient(f64),

    /// Returned when a count option (neighbours, evaluation samples) is zero.
    #[error("invalid {name}: must be at least 1")]
    InvalidCount {
        /// The name of the configuration option.
        name: &'static str,
    },

    /// Returned when the configured initial point does not belong to the search space.
    #[error("initial point {point:?} does not belong to the search space")]
    InvalidInitialPoint {
        /// The rejected point.
        point: Vec<usize>,
    },

    /// Returned when an evaluation batch does not finish before its deadline.
    #[error("evaluation timed out after {timeout:?} ({completed} of {requested} samples done)")]
    EvaluationTimeout {
        /// The configured timeout.
        timeout: core::time::Duration,
        /// Samples finished before the deadline.
        completed: usize,
        /// Samples requested.
        requested: usize,
    },

    /// Returned when the evaluation function panicked.
    #[error("evaluation function panicked: {0}")]
    EvaluationPanicked(String),

    /// Returned when an evaluation task was cancelled before it finished.
    #[error("evaluation task was cancelled: {0}")]
    EvaluationCancelled(String),

    /// Returned when a worker thread for parallel evaluation could not be started.
    #[error("failed to spawn evaluation worker: {0}")]
    WorkerSpawn(String),

    /// Returned when `run` is called on an optimizer that already ran.
    #[error("run already started; call reset() first")]
    RunAlreadyStarted,

    /// Returned when a solution is requested but no point has been sampled.
    #[error("no sampled points available")]
    NoSampledPoints,
}

pub type Result<T> = core::result::Result<T, Error>;
