use ntbea::{Error, Ntbea, NtbeaConfig, RunState, SearchSpace};

use crate::test_functions::{max_m, one_max};

fn space() -> SearchSpace {
    SearchSpace::new(vec![4, 4, 4, 4]).unwrap()
}

#[test]
fn test_run_then_reset_then_rerun_is_identical() {
    let mut ntbea = Ntbea::builder(space(), &[1, 2])
        .neighbours(30)
        .seed(77)
        .build()
        .unwrap();

    let first = ntbea.run(max_m, 25).unwrap();
    let first_points = ntbea.model().sampled_points().to_vec();

    ntbea.reset();
    assert_eq!(ntbea.state(), RunState::NotStarted);
    assert!(ntbea.solution().is_none());
    assert!(ntbea.statistics().is_empty());
    assert!(ntbea.model().tuples().iter().all(|t| t.num_samples() == 0));

    let second = ntbea.run(max_m, 25).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_points, ntbea.model().sampled_points());
}

#[test]
fn test_second_run_requires_reset() {
    let mut ntbea = Ntbea::builder(space(), &[1]).seed(1).build().unwrap();
    ntbea.run(one_max, 3).unwrap();
    let err = ntbea.run(one_max, 3).unwrap_err();
    assert!(matches!(err, Error::RunAlreadyStarted));
    assert_eq!(err.to_string(), "run already started; call reset() first");
    assert_eq!(ntbea.state(), RunState::Completed);
}

#[test]
fn test_new_with_explicit_config() {
    let config = NtbeaConfig {
        neighbours: 10,
        seed: Some(4),
        initial_point: Some(vec![0, 1, 2, 3]),
        ..NtbeaConfig::default()
    };
    let mut ntbea = Ntbea::new(space(), &[1, 2, 2, 1], config).unwrap();
    // Duplicate lengths collapse: 4 singles + 6 pairs.
    assert_eq!(ntbea.model().tuples().len(), 10);
    assert_eq!(ntbea.statistics().tuple_lengths(), &[1, 2]);

    ntbea.run(max_m, 5).unwrap();
    assert_eq!(ntbea.model().sampled_points()[0], vec![0, 1, 2, 3]);
}

#[test]
fn test_invalid_configurations_are_rejected() {
    assert!(matches!(
        Ntbea::builder(space(), &[]).build(),
        Err(Error::NoTupleLengths)
    ));
    assert!(matches!(
        Ntbea::builder(space(), &[0]).build(),
        Err(Error::InvalidTupleLength { length: 0, .. })
    ));
    assert!(matches!(
        Ntbea::builder(space(), &[1]).index_mutation_prob(-0.1).build(),
        Err(Error::InvalidProbability {
            name: "index_mutation_prob",
            ..
        })
    ));
    assert!(matches!(
        Ntbea::builder(space(), &[1]).initial_point(vec![4, 0, 0, 0]).build(),
        Err(Error::InvalidInitialPoint { .. })
    ));
    assert!(matches!(
        SearchSpace::new(vec![3, 0, 2]),
        Err(Error::ZeroDimension { dimension: 1 })
    ));
}

#[test]
fn test_current_point_follows_best_neighbour() {
    let mut ntbea = Ntbea::builder(space(), &[1, 2, 3, 4])
        .neighbours(50)
        .mutate_at_least_one_index(true)
        .distinct_neighbours(true)
        .seed(21)
        .build()
        .unwrap();
    ntbea.run(max_m, 20).unwrap();

    let records = ntbea.statistics().records();
    let sampled = ntbea.model().sampled_points();
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.generation, i + 1);
        assert_eq!(record.current_point, sampled[i]);
        assert_eq!(record.current_fitness, max_m(&sampled[i]));
        assert!(record.best_neighbour_ucb.is_finite());
    }
    // With at least one index mutated every move leaves the current point.
    for pair in sampled.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}
