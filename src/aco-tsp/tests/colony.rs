//! End-to-end colony runs.

use aco_tsp::{Colony, ColonyConfig, ColonyError, DistanceMatrix, Phase, Replay, Tour, Variant};

fn square() -> DistanceMatrix {
    DistanceMatrix::from_rows(vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0, 0.0, 4.0, 5.0],
        vec![2.0, 4.0, 0.0, 6.0],
        vec![3.0, 5.0, 6.0, 0.0],
    ])
    .unwrap()
}

/// Ten cities where the ring 0-1-...-9-0 costs 42: neighbours are 4 apart, the closing edge
/// 9-0 is 6, everything else 10.
fn ring() -> DistanceMatrix {
    let rows = (0..10)
        .map(|i: usize| {
            (0..10)
                .map(|j: usize| match (i.abs_diff(j), i.min(j), i.max(j)) {
                    (0, _, _) => 0.0,
                    (_, 0, 9) => 6.0,
                    (1, _, _) => 4.0,
                    _ => 10.0,
                })
                .collect()
        })
        .collect();
    DistanceMatrix::from_rows(rows).unwrap()
}

/// A draw of 0.0 always takes the lowest open city, so an ant fed only zeros walks the ring
/// (cost 42). Opening with 0.99 sends it to city 9 first: 0-9-1-2-...-8-0, cost 54.
fn ring_draws(matching: usize, diverging: usize) -> Replay {
    let walker = std::iter::repeat(0.0).take(9);
    let diverger = std::iter::once(0.99).chain(std::iter::repeat(0.0).take(8));
    let draws: Vec<f64> = (0..matching)
        .flat_map(|_| walker.clone())
        .chain((0..diverging).flat_map(|_| diverger.clone()))
        .collect();
    Replay::new(draws)
}

fn ring_colony(population: usize) -> Colony {
    let config = ColonyConfig::default()
        .with_population_size(population)
        .with_iteration_budget(50);
    Colony::new(ring(), config, &mut Replay::new([0.0])).unwrap()
}

#[test]
fn ten_of_eleven_agreeing_ants_converge() {
    let mut colony = ring_colony(11);
    let iteration = colony.step(&mut ring_draws(10, 1)).unwrap();

    let costs: Vec<f64> = colony
        .ants()
        .iter()
        .map(|ant| ant.tour().cost(colony.distances()))
        .collect();
    assert_eq!(&costs[..10], &[42.0; 10]);
    assert_eq!(costs[10], 54.0);

    assert_eq!(iteration.agreeing, 10);
    assert!(iteration.converged);
    assert_eq!(colony.phase(), Phase::Converged);
    assert_eq!(colony.converged_at(), Some(0));

    let outcome = colony.run(&mut ring_draws(10, 1)).unwrap();
    assert_eq!(outcome.cost, 42.0);
    assert_eq!(outcome.tour.steps(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
    assert_eq!(outcome.converged_at, 0);
}

#[test]
fn eight_of_eleven_agreeing_ants_keep_going() {
    let mut colony = ring_colony(11);
    let iteration = colony.step(&mut ring_draws(8, 3)).unwrap();

    assert_eq!(iteration.agreeing, 8);
    assert!(!iteration.converged);
    assert_eq!(iteration.iteration_best, 42.0);
    assert_eq!(colony.phase(), Phase::Continue);
    assert_eq!(colony.converged_at(), None);
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = ColonyConfig::default()
        .with_population_size(5)
        .with_decay_rate(0.9)
        .with_deposit_rate(1.0);

    let run = |seed: u64| {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut colony = Colony::new(square(), config.clone(), &mut rng).unwrap();
        colony.run(&mut rng).unwrap()
    };

    let first = run(42);
    let second = run(42);
    assert_eq!(first, second);
    // Every cycle of this matrix costs 14, so the ants agree straight away.
    assert_eq!(first.cost, 14.0);
    assert!(first.converged);
    assert_eq!(first.converged_at, 0);
    assert!(Tour::new(0, first.tour.steps().to_vec(), 4).is_ok());
}

#[test]
fn seeded_runs_agree_on_larger_instance() {
    let config = ColonyConfig::new(Variant::min_max())
        .with_population_size(12)
        .with_iteration_budget(40)
        .with_scatter(true);

    let run = || {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut colony = Colony::new(ring(), config.clone(), &mut rng).unwrap();
        colony.run(&mut rng).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn every_variant_tracks_best_so_far() {
    for variant in [Variant::Uniform, Variant::elitist(), Variant::min_max()] {
        let config = ColonyConfig::new(variant)
            .with_population_size(20)
            .with_iteration_budget(100);
        let mut rng = fastrand::Rng::with_seed(2024);
        let mut colony = Colony::new(ring(), config, &mut rng).unwrap();
        let outcome = colony.run(&mut rng).unwrap();

        // No cycle beats the ring: it uses all nine 4-edges and the 6-edge.
        assert!(outcome.cost >= 42.0, "{}: {}", variant.name(), outcome.cost);
        assert_eq!(outcome.tour.cost(colony.distances()), outcome.cost);
        assert_eq!(outcome.history.len(), outcome.iterations);
        assert_eq!(outcome.history.last(), Some(&outcome.cost));
        for window in outcome.history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }
}

#[test]
fn min_max_keeps_trails_in_bounds_every_iteration() {
    let config = ColonyConfig::new(Variant::MinMax {
        min_bound: 0.05,
        max_bound: 0.6,
    })
    .with_population_size(8)
    .with_iteration_budget(30)
    .with_scatter(true);
    let mut rng = fastrand::Rng::with_seed(13);
    let mut colony = Colony::new(ring(), config, &mut rng).unwrap();

    while !colony.phase().is_terminal() {
        colony.step(&mut rng).unwrap();
        assert!(colony
            .pheromone()
            .levels()
            .all(|level| (0.05..=0.6).contains(&level)));
        let full = colony.pheromone().to_array();
        assert_eq!(full, full.t());
    }
}

#[test]
fn unreachable_city_stops_the_run() {
    // City 3 is at distance zero from every other city, so no edge into it is ever usable.
    let distances = DistanceMatrix::from_rows(vec![
        vec![0.0, 1.0, 2.0, 0.0],
        vec![1.0, 0.0, 4.0, 0.0],
        vec![2.0, 4.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0],
    ])
    .unwrap();
    let mut rng = fastrand::Rng::with_seed(8);
    let mut colony = Colony::new(distances, ColonyConfig::default(), &mut rng).unwrap();
    let err = colony.run(&mut rng).unwrap_err();
    assert!(matches!(err, ColonyError::DegenerateStep { step: 2, .. }));
    assert!(colony.best().is_none());
}

#[test]
fn sample_tour_follows_trained_trails() {
    let config = ColonyConfig::new(Variant::elitist())
        .with_population_size(10)
        .with_iteration_budget(60);
    let mut rng = fastrand::Rng::with_seed(99);
    let mut colony = Colony::new(ring(), config, &mut rng).unwrap();
    colony.run(&mut rng).unwrap();

    let tour = colony.sample_tour(&mut rng).unwrap();
    assert_eq!(tour.start(), 0);
    assert!(Tour::new(0, tour.steps().to_vec(), 10).is_ok());
}
