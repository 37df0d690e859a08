//! Property-based tests for aco-tsp.
//!
//! Uses proptest to check colony invariants across random instances and seeds.

use aco_tsp::{Colony, ColonyConfig, DistanceMatrix, HeuristicField, Tour, Variant};
use proptest::prelude::*;

// ============================================================================
// Instance Generation Strategies
// ============================================================================

/// Symmetric matrix built from its strict upper triangle.
fn symmetric(n: usize, upper: &[u32]) -> DistanceMatrix {
    let mut rows = vec![vec![0.0; n]; n];
    let mut values = upper.iter();
    for i in 0..n {
        for j in i + 1..n {
            let value = f64::from(*values.next().unwrap());
            rows[i][j] = value;
            rows[j][i] = value;
        }
    }
    DistanceMatrix::from_rows(rows).unwrap()
}

/// Random symmetric instance with 3-9 cities and strictly positive distances.
fn random_instance() -> impl Strategy<Value = DistanceMatrix> {
    (3usize..10).prop_flat_map(|n| {
        prop::collection::vec(1u32..100, n * (n - 1) / 2).prop_map(move |upper| symmetric(n, &upper))
    })
}

/// Random square matrix that may contain zero off-diagonal distances.
fn sparse_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..8).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0u32..5, n), n).prop_map(|rows| {
            rows.into_iter()
                .map(|row| row.into_iter().map(f64::from).collect())
                .collect()
        })
    })
}

fn random_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Uniform),
        (0.5..4.0f64).prop_map(|weight| Variant::Elitist { weight }),
        (0.001..0.1f64, 2.0..20.0f64).prop_map(|(min_bound, max_bound)| Variant::MinMax {
            min_bound,
            max_bound
        }),
    ]
}

fn is_hamiltonian(tour: &Tour, cities: usize) -> bool {
    Tour::new(tour.start(), tour.steps().to_vec(), cities).is_ok()
}

// ============================================================================
// Field Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_visibility_is_inverse_or_zero(rows in sparse_matrix()) {
        let n = rows.len();
        let matrix = DistanceMatrix::from_rows(rows).unwrap();
        let heuristic = HeuristicField::new(&matrix);
        for i in 0..n {
            for j in 0..n {
                let distance = matrix.get(i, j);
                let visibility = heuristic.get(i, j);
                if distance == 0.0 {
                    prop_assert_eq!(visibility, 0.0);
                } else {
                    prop_assert_eq!(visibility, 1.0 / distance);
                }
            }
        }
    }

    #[test]
    fn prop_cost_is_rotation_invariant(instance in random_instance(), seed in any::<u64>()) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let colony = Colony::new(instance.clone(), ColonyConfig::default(), &mut rng).unwrap();
        let tour = colony.sample_tour(&mut rng).unwrap();
        let cost = tour.cost(&instance);
        for city in 0..instance.len() {
            let rotated = tour.rotated(city).unwrap();
            prop_assert_eq!(rotated.start(), city);
            prop_assert!((rotated.cost(&instance) - cost).abs() < 1e-9);
        }
    }
}

// ============================================================================
// Colony Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_every_iteration_keeps_invariants(
        instance in random_instance(),
        variant in random_variant(),
        population in 1usize..12,
        decay in 0.3..0.95f64,
        scatter in any::<bool>(),
        seed in any::<u64>()
    ) {
        let cities = instance.len();
        let config = ColonyConfig::new(variant)
            .with_population_size(population)
            .with_iteration_budget(15)
            .with_decay_rate(decay)
            .with_scatter(scatter);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut colony = Colony::new(instance, config, &mut rng).unwrap();

        let mut previous_best = f64::INFINITY;
        while !colony.phase().is_terminal() {
            let iteration = colony.step(&mut rng).unwrap();

            for ant in colony.ants() {
                prop_assert!(is_hamiltonian(ant.tour(), cities));
                prop_assert_eq!(ant.tour().cities().count(), cities + 1);
                prop_assert_eq!(ant.position(), ant.start());
            }

            let full = colony.pheromone().to_array();
            prop_assert_eq!(&full, &full.t());

            if let Some((min, max)) = variant.bounds() {
                prop_assert!(colony.pheromone().levels().all(|level| level >= min && level <= max));
            }

            prop_assert!(iteration.best_cost <= previous_best);
            prop_assert!(iteration.best_cost <= iteration.iteration_best);
            previous_best = iteration.best_cost;
        }

        let best = colony.best().unwrap();
        prop_assert!(is_hamiltonian(&best.tour, cities));
        prop_assert_eq!(best.tour.cost(colony.distances()), best.cost);
    }

    #[test]
    fn prop_seeded_runs_are_deterministic(
        instance in random_instance(),
        variant in random_variant(),
        seed in any::<u64>()
    ) {
        let config = ColonyConfig::new(variant)
            .with_population_size(6)
            .with_iteration_budget(20)
            .with_scatter(true);
        let run = || {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut colony = Colony::new(instance.clone(), config.clone(), &mut rng).unwrap();
            colony.run(&mut rng).unwrap()
        };
        let first = run();
        prop_assert_eq!(&first, &run());
        prop_assert!(first.converged_at <= 20);
        prop_assert_eq!(first.converged, first.converged_at < 20);
    }
}
