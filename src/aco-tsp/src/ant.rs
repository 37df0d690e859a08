//! A single tour-building agent.

use crate::error::{ColonyError, Result};
use crate::field::{HeuristicField, PheromoneField};
use crate::rng::RandomSource;
use crate::tour::Tour;

/// Read-only view of the fields an ant consults while building a tour.
#[derive(Debug, Clone, Copy)]
pub struct TrailView<'a> {
    pub pheromone: &'a PheromoneField,
    pub heuristic: &'a HeuristicField,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Visibility exponent.
    pub beta: f64,
}

impl TrailView<'_> {
    /// Desirability of moving from `from` to `to`. Zero-visibility edges are never usable.
    pub fn score(&self, from: usize, to: usize) -> f64 {
        let visibility = self.heuristic.get(from, to);
        if visibility == 0.0 {
            return 0.0;
        }
        self.pheromone.get(from, to).powf(self.alpha) * visibility.powf(self.beta)
    }

    pub fn cities(&self) -> usize {
        self.pheromone.len()
    }
}

#[derive(Debug, Clone)]
pub struct Ant {
    start: usize,
    position: usize,
    tour: Tour,

    // Reused per-construction buffers.
    open: Vec<bool>,
    scores: Vec<f64>,
}

impl Ant {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            position: start,
            tour: Tour::from_parts(start, Vec::new()),
            open: Vec::new(),
            scores: Vec::new(),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The most recently constructed tour. Empty until [Ant::construct] succeeds.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Returns the ant to its start city and forgets its tour.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.tour.restart(self.start);
    }

    /// Builds a full tour by roulette-wheel selection over `view`.
    ///
    /// Each of the `n - 1` moves closes the current city's column before scoring, so no city is
    /// ever chosen twice. The last move returns to the start city.
    pub fn construct<R>(&mut self, view: TrailView<'_>, rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        let cities = view.cities();
        self.reset();
        self.open.clear();
        self.open.resize(cities, true);

        for step in 0..cities - 1 {
            self.open[self.position] = false;
            let next = self.choose(view, step, rng)?;
            self.tour.push(next);
            self.position = next;
        }

        self.tour.push(self.start);
        self.position = self.start;
        Ok(())
    }

    fn choose<R>(&mut self, view: TrailView<'_>, step: usize, rng: &mut R) -> Result<usize>
    where
        R: RandomSource + ?Sized,
    {
        let from = self.position;
        self.scores.clear();
        self.scores.extend(
            self.open
                .iter()
                .enumerate()
                .map(|(to, &open)| if open { view.score(from, to) } else { 0.0 }),
        );

        let total: f64 = self.scores.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(ColonyError::DegenerateStep { city: from, step });
        }

        let draw = rng.unit();
        let mut cumulative = 0.0;
        for (to, &score) in self.scores.iter().enumerate() {
            cumulative += score / total;
            if cumulative > draw {
                return Ok(to);
            }
        }

        // Rounding left the cumulative sum at or below the draw.
        self.scores
            .iter()
            .rposition(|&score| score > 0.0)
            .ok_or(ColonyError::DegenerateStep { city: from, step })
    }
}
