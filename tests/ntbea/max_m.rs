use ntbea::{Ntbea, SearchSpace};

use crate::test_functions::{NoisyMaxM, max_m, max_m_optimum};

fn max_m_ntbea(seed: u64) -> Ntbea {
    let space = SearchSpace::new(vec![5; 5]).unwrap();
    Ntbea::builder(space, &[1, 2, 3, 4, 5])
        .k_explore(2.0)
        .neighbours(200)
        .mutate_at_least_one_index(true)
        .distinct_neighbours(true)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_noisy_max_m_beats_random_search() {
    let mut ntbea = max_m_ntbea(42);
    let solution = ntbea.run(NoisyMaxM::new(7, 1.0), 200).unwrap();

    // A uniformly random point sums to 10 on average.
    let found = max_m(&solution.point);
    assert!(found >= 15.0, "solution {:?} sums to {found}", solution.point);
    assert!(found <= max_m_optimum(&[5; 5]));

    let records = ntbea.statistics().records();
    assert_eq!(records.len(), 200);
    assert_eq!(records.last().unwrap().best_of_sampled, solution.point);
    assert_eq!(records.last().unwrap().best_of_sampled_value, solution.value);
}

#[test]
fn test_short_tuples_saturate_first() {
    let mut ntbea = max_m_ntbea(3);
    ntbea.run(max_m, 200).unwrap();

    let stats = ntbea.statistics();
    let one = stats
        .generation_fully_covered(1)
        .expect("every value of every dimension is sampled within 200 generations");
    if let Some(five) = stats.generation_fully_covered(5) {
        assert!(one <= five);
    }

    let ones = stats.coverage_series(1);
    let fives = stats.coverage_series(5);
    assert_eq!(*ones.last().unwrap(), 100.0);
    assert!(*fives.last().unwrap() < 100.0);
    for (a, b) in ones.iter().zip(&fives) {
        assert!(a >= b, "1-tuple coverage {a} below 5-tuple coverage {b}");
    }
}

#[test]
fn test_coverage_never_decreases() {
    let mut ntbea = max_m_ntbea(11);
    ntbea.run(max_m, 60).unwrap();
    for length in 1..=5 {
        let series = ntbea.statistics().coverage_series(length);
        assert!(series.windows(2).all(|w| w[0] <= w[1]), "length {length}");
    }
}

#[test]
fn test_solution_is_best_of_sampled() {
    let mut ntbea = max_m_ntbea(5);
    let solution = ntbea.run(max_m, 100).unwrap();

    let model = ntbea.model();
    for point in model.sampled_points() {
        assert!(model.mean_value_estimate(point) <= solution.value);
    }
    assert!(model.sampled_points().contains(&solution.point));
    // Estimates average observed values, which lie in [0, 20].
    assert!((0.0..=20.0).contains(&solution.value));
}
