use std::sync::Arc;

use ntbea::mutation::{self, MutationConfig};
use ntbea::{NTuple, NTuplePattern, NTupleSystem, SearchSpace};

use crate::test_functions::max_m;

fn model(sizes: Vec<usize>, lengths: &[usize]) -> NTupleSystem {
    NTupleSystem::new(Arc::new(SearchSpace::new(sizes).unwrap()), lengths).unwrap()
}

#[test]
fn test_tuple_count_matches_binomials() {
    // C(5,1) + C(5,2) + C(5,3) + C(5,4) + C(5,5)
    assert_eq!(model(vec![5; 5], &[1, 2, 3, 4, 5]).tuples().len(), 31);
    assert_eq!(model(vec![2; 6], &[3]).tuples().len(), 20);
}

#[test]
fn test_tuples_sorted_by_length_then_indices() {
    let m = model(vec![3; 4], &[2, 1]);
    let indices: Vec<Vec<usize>> = m.tuples().iter().map(|t| t.indices().to_vec()).collect();
    assert_eq!(indices[..4], [vec![0], vec![1], vec![2], vec![3]]);
    assert_eq!(indices[4], vec![0, 1]);
    assert_eq!(indices[9], vec![2, 3]);
}

#[test]
fn test_exhaustive_best_solution_on_learned_max_m() {
    let mut m = model(vec![3, 3, 3], &[1]);
    let space = Arc::clone(m.search_space());
    for index in 0..space.size() {
        let point = space.point_at(index);
        m.add_point(&point, max_m(&point));
    }
    let (best, value) = m.best_solution().unwrap();
    assert_eq!(best, vec![2, 2, 2]);
    // Each single value 2 averages 2 + 1 + 1 over the other dimensions.
    assert!((value - 4.0).abs() < 1e-9);
    let coverage = m.coverage_by_length();
    assert_eq!(coverage[&1], 100.0);
}

#[test]
fn test_unobserved_point_prefers_exploration() {
    let mut m = model(vec![4, 4], &[1, 2]);
    for _ in 0..10 {
        m.add_point(&[0, 0], 1.0);
    }
    let seen = m.exploration_estimate(&[0, 0], 0.5);
    let unseen = m.exploration_estimate(&[3, 3], 0.5);
    assert!(unseen > seen);

    let mut rng = fastrand::Rng::with_seed(0);
    let ucb_seen = m.ucb_value(&[0, 0], 0.5, 2.0, &mut rng);
    let ucb_unseen = m.ucb_value(&[3, 3], 0.5, 2.0, &mut rng);
    assert!(ucb_unseen > ucb_seen);
    // No exploration bonus: only the mean counts.
    let greedy = m.ucb_value(&[0, 0], 0.5, 0.0, &mut rng);
    assert!((greedy - 1.0).abs() < 1e-5);
}

#[test]
fn test_pattern_projection() {
    let space = SearchSpace::new(vec![5, 6, 7]).unwrap();
    let tuple = NTuple::new(vec![0, 2], &space);
    assert_eq!(tuple.combinations(), 35);
    let pattern = NTuplePattern::new(&[4, 5, 6], &tuple);
    assert_eq!(pattern.values(), &[4, 6]);
    assert_eq!(pattern.to_string(), "[4, 6]");
}

#[test]
fn test_neighbours_stay_in_space() {
    let space = SearchSpace::new(vec![2, 5, 1, 9]).unwrap();
    let config = MutationConfig {
        swap_prob: 0.3,
        total_random_chaos_prob: 0.2,
        index_mutation_prob: 0.5,
        mutate_at_least_one_index: true,
    };
    let mut rng = fastrand::Rng::with_seed(17);
    let mut point = space.random_point(&mut rng);
    for _ in 0..2_000 {
        point = mutation::mutate_point(&mut rng, &point, &space, &config);
        assert!(space.contains(&point), "{point:?}");
        assert_eq!(point[2], 0);
    }
}
