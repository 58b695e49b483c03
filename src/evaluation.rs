//! Evaluation functions and batched, parallel sampling.
//!
//! An [`Evaluator`] maps a point to a (possibly noisy) fitness value. Plain
//! closures implement it:
//!
//! ```
//! use ntbea::Evaluator;
//!
//! let sum = |point: &[usize]| point.iter().sum::<usize>() as f64;
//! assert_eq!(sum.evaluate(&[1, 2, 3]), 6.0);
//! ```
//!
//! [`evaluate_batch`] draws many samples of one point across worker threads
//! and folds them into a single [`RunningStats`].

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;
use core::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::{Arc, mpsc};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::stats::{RunningStats, SyncRunningStats};

/// Default deadline for one evaluation batch.
pub const DEFAULT_EVALUATION_TIMEOUT: Duration = Duration::from_secs(10 * 60 * 60);

/// A fitness function over points of a search space.
///
/// Repeated calls with the same point may return different values. The
/// evaluator is shared between worker threads, hence `Send + Sync`.
pub trait Evaluator: Send + Sync {
    /// Evaluate `point` once.
    fn evaluate(&self, point: &[usize]) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&[usize]) -> f64 + Send + Sync,
{
    fn evaluate(&self, point: &[usize]) -> f64 {
        self(point)
    }
}

/// Resolve a requested thread count, `0` meaning all hardware threads.
pub(crate) fn resolve_threads(threads: usize) -> usize {
    if threads == 0 {
        std::thread::available_parallelism().map_or(1, core::num::NonZero::get)
    } else {
        threads
    }
}

/// Evaluate `point` `samples` times and summarize the results.
///
/// Samples are spread over `threads` workers (`0` = all hardware threads),
/// never more workers than samples, so even a single sample runs on its own
/// worker and is bounded by the deadline. The call blocks until every sample
/// is done or `timeout` elapses.
///
/// # Errors
///
/// - [`Error::EvaluationTimeout`] if the batch misses its deadline. Workers
///   stop claiming new samples and partial results are discarded.
/// - [`Error::EvaluationPanicked`] if the evaluator panicked.
/// - [`Error::WorkerSpawn`] if a worker thread could not be started.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use ntbea::evaluate_batch;
///
/// let evaluator = Arc::new(|p: &[usize]| p[0] as f64);
/// let stats = evaluate_batch(&evaluator, &[3], 8, 2, Duration::from_secs(5)).unwrap();
/// assert_eq!(stats.count(), 8);
/// assert_eq!(stats.mean(), 3.0);
/// ```
pub fn evaluate_batch<E>(
    evaluator: &Arc<E>,
    point: &[usize],
    samples: usize,
    threads: usize,
    timeout: Duration,
) -> Result<RunningStats>
where
    E: Evaluator + ?Sized + 'static,
{
    if samples == 0 {
        return Ok(RunningStats::new());
    }
    evaluate_parallel(evaluator, point, samples, resolve_threads(threads), timeout)
}

enum SampleOutcome {
    Done,
    Panicked(String),
}

fn evaluate_parallel<E>(
    evaluator: &Arc<E>,
    point: &[usize],
    samples: usize,
    threads: usize,
    timeout: Duration,
) -> Result<RunningStats>
where
    E: Evaluator + ?Sized + 'static,
{
    let workers = threads.clamp(1, samples);
    let stats = Arc::new(SyncRunningStats::new());
    let next = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicBool::new(false));
    let point: Arc<[usize]> = Arc::from(point);
    let (tx, rx) = mpsc::channel();

    trace_debug!(samples, workers, "evaluating batch");

    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let evaluator = Arc::clone(evaluator);
        let stats = Arc::clone(&stats);
        let next = Arc::clone(&next);
        let worker_cancelled = Arc::clone(&cancelled);
        let point = Arc::clone(&point);
        let tx = tx.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("ntbea-eval-{worker}"))
            .spawn(move || {
                while !worker_cancelled.load(Ordering::Relaxed)
                    && next.fetch_add(1, Ordering::Relaxed) < samples
                {
                    match catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&point))) {
                        Ok(value) => {
                            stats.push(value);
                            if tx.send(SampleOutcome::Done).is_err() {
                                return;
                            }
                        }
                        Err(payload) => {
                            let _ = tx.send(SampleOutcome::Panicked(panic_message(
                                payload.as_ref(),
                            )));
                            return;
                        }
                    }
                }
            });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                cancelled.store(true, Ordering::Relaxed);
                return Err(Error::WorkerSpawn(e.to_string()));
            }
        }
    }
    drop(tx);

    let deadline = Instant::now().checked_add(timeout);
    let mut completed = 0;
    while completed < samples {
        let received = match deadline {
            Some(deadline) => rx
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .map_err(|e| match e {
                    mpsc::RecvTimeoutError::Timeout => Error::EvaluationTimeout {
                        timeout,
                        completed,
                        requested: samples,
                    },
                    mpsc::RecvTimeoutError::Disconnected => {
                        Error::EvaluationPanicked("all evaluation workers exited".into())
                    }
                }),
            None => rx
                .recv()
                .map_err(|_| Error::EvaluationPanicked("all evaluation workers exited".into())),
        };

        match received {
            Ok(SampleOutcome::Done) => completed += 1,
            Ok(SampleOutcome::Panicked(message)) => {
                cancelled.store(true, Ordering::Relaxed);
                return Err(Error::EvaluationPanicked(message));
            }
            Err(e) => {
                cancelled.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }
    }

    // Every sample is claimed, so the workers are on their way out.
    for handle in handles {
        let _ = handle.join();
    }
    Ok(stats.snapshot())
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Async counterpart of [`evaluate_batch`] running samples on the tokio
/// blocking pool.
///
/// At most `threads` samples (`0` = all hardware threads) are in flight at
/// once. On timeout every outstanding task is aborted.
///
/// # Errors
///
/// Same failure kinds as [`evaluate_batch`]; a closed semaphore is reported
/// as [`Error::WorkerSpawn`] and a task cancelled by the runtime as
/// [`Error::EvaluationCancelled`].
#[cfg(feature = "async")]
pub async fn evaluate_batch_async<E>(
    evaluator: Arc<E>,
    point: Vec<usize>,
    samples: usize,
    threads: usize,
    timeout: Duration,
) -> Result<RunningStats>
where
    E: Evaluator + ?Sized + 'static,
{
    use tokio::sync::Semaphore;
    use tokio::task::JoinSet;

    let semaphore = Arc::new(Semaphore::new(resolve_threads(threads)));
    let point: Arc<[usize]> = Arc::from(point);
    let mut join_set: JoinSet<Result<f64>> = JoinSet::new();

    for _ in 0..samples {
        let semaphore = Arc::clone(&semaphore);
        let evaluator = Arc::clone(&evaluator);
        let point = Arc::clone(&point);
        join_set.spawn(async move {
            let permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| Error::WorkerSpawn(e.to_string()))?;
            let joined = tokio::task::spawn_blocking(move || evaluator.evaluate(&point)).await;
            drop(permit);
            blocking_outcome(joined)
        });
    }

    let mut stats = RunningStats::new();
    let drain = async {
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(value)) => stats.push(value),
                Ok(Err(e)) => return Err(e),
                Err(e) if e.is_panic() => {
                    return Err(Error::EvaluationPanicked(panic_message(
                        e.into_panic().as_ref(),
                    )));
                }
                Err(e) => return Err(Error::EvaluationCancelled(e.to_string())),
            }
        }
        Ok(())
    };

    let outcome = tokio::time::timeout(timeout, drain).await;
    match outcome {
        Ok(Ok(())) => Ok(stats),
        Ok(Err(e)) => {
            join_set.abort_all();
            Err(e)
        }
        Err(_) => {
            join_set.abort_all();
            Err(Error::EvaluationTimeout {
                timeout,
                completed: usize::try_from(stats.count()).unwrap_or(usize::MAX),
                requested: samples,
            })
        }
    }
}

/// Map a finished blocking evaluation to its value or evaluation error.
#[cfg(feature = "async")]
fn blocking_outcome(joined: core::result::Result<f64, tokio::task::JoinError>) -> Result<f64> {
    joined.map_err(|e| match e.try_into_panic() {
        Ok(payload) => Error::EvaluationPanicked(panic_message(payload.as_ref())),
        Err(e) => Error::EvaluationCancelled(e.to_string()),
    })
}
