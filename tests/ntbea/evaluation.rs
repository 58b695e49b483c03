use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ntbea::{Error, Evaluator, Ntbea, RunState, SearchSpace, evaluate_batch};

use crate::test_functions::{NoisyMaxM, max_m};

struct Counting {
    calls: AtomicUsize,
}

impl Evaluator for Counting {
    fn evaluate(&self, point: &[usize]) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        max_m(point)
    }
}

#[test]
fn test_every_generation_draws_all_samples() {
    let space = SearchSpace::new(vec![3, 3, 3]).unwrap();
    let mut ntbea = Ntbea::builder(space, &[1, 3])
        .evaluation_samples(4)
        .evaluation_threads(2)
        .seed(8)
        .build()
        .unwrap();

    let counter = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });
    let shared = Arc::clone(&counter);
    ntbea
        .run(move |p: &[usize]| shared.evaluate(p), 6)
        .unwrap();
    assert_eq!(counter.calls.load(Ordering::SeqCst), 24);

    // Deterministic evaluator: the sample mean equals the single value.
    for record in ntbea.statistics().records() {
        assert_eq!(record.current_fitness, max_m(&record.current_point));
    }
}

#[test]
fn test_slow_evaluation_times_out_and_fails_run() {
    let space = SearchSpace::new(vec![3, 3]).unwrap();
    let mut ntbea = Ntbea::builder(space, &[1])
        .evaluation_samples(2)
        .evaluation_threads(2)
        .evaluation_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let result = ntbea.run(
        |p: &[usize]| {
            std::thread::sleep(Duration::from_millis(500));
            max_m(p)
        },
        3,
    );
    match result {
        Err(Error::EvaluationTimeout {
            timeout, requested, ..
        }) => {
            assert_eq!(timeout, Duration::from_millis(50));
            assert_eq!(requested, 2);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(ntbea.state(), RunState::Failed);
    assert!(ntbea.statistics().is_empty());
}

#[test]
fn test_single_sample_respects_timeout() {
    let space = SearchSpace::new(vec![3, 3]).unwrap();
    let mut ntbea = Ntbea::builder(space, &[1])
        .evaluation_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    assert_eq!(ntbea.config().evaluation_samples, 1);

    let started = std::time::Instant::now();
    let result = ntbea.run(
        |p: &[usize]| {
            std::thread::sleep(Duration::from_millis(300));
            max_m(p)
        },
        2,
    );
    assert!(started.elapsed() < Duration::from_millis(300));
    assert!(matches!(
        result,
        Err(Error::EvaluationTimeout {
            requested: 1,
            completed: 0,
            ..
        })
    ));
    assert_eq!(ntbea.state(), RunState::Failed);
    assert!(ntbea.solution().is_none());
}

#[test]
fn test_panicking_worker_surfaces_message() {
    let space = SearchSpace::new(vec![3, 3]).unwrap();
    let mut ntbea = Ntbea::builder(space, &[1])
        .evaluation_samples(3)
        .evaluation_threads(3)
        .build()
        .unwrap();

    let err = ntbea
        .run(|_: &[usize]| -> f64 { panic!("simulator crashed") }, 2)
        .unwrap_err();
    match err {
        Error::EvaluationPanicked(msg) => assert!(msg.contains("simulator crashed")),
        other => panic!("expected panic error, got {other:?}"),
    }
    assert_eq!(ntbea.state(), RunState::Failed);
}

#[test]
fn test_batch_of_noisy_samples() {
    let evaluator = Arc::new(NoisyMaxM::new(1, 0.5));
    let stats = evaluate_batch(&evaluator, &[2, 2, 2], 400, 4, Duration::from_secs(30)).unwrap();
    assert_eq!(stats.count(), 400);
    assert!((stats.mean() - 6.0).abs() < 0.2);
    assert!((stats.std_dev() - 0.5).abs() < 0.1);
    assert!(stats.min() < stats.mean() && stats.mean() < stats.max());
}

#[test]
fn test_all_hardware_threads() {
    let evaluator = Arc::new(|p: &[usize]| max_m(p));
    let stats = evaluate_batch(&evaluator, &[1, 2], 16, 0, Duration::from_secs(30)).unwrap();
    assert_eq!(stats.count(), 16);
    assert_eq!(stats.mean(), 3.0);
    assert_eq!(stats.variance(), 0.0);
}
