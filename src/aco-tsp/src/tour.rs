use serde::Serialize;

use crate::error::{ColonyError, Result};
use crate::field::DistanceMatrix;

/// A closed tour rooted at `start`.
///
/// `steps` lists every city visited after leaving `start`, ending with the return to `start`,
/// so it holds exactly one entry per city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    start: usize,
    steps: Vec<usize>,
}

impl Tour {
    /// Builds a tour over `cities` cities, checking that it is a Hamiltonian cycle.
    pub fn new(start: usize, steps: Vec<usize>, cities: usize) -> Result<Self> {
        let invalid = |reason: String| Err(ColonyError::InvalidTour { reason });
        if steps.len() != cities {
            return invalid(format!("{} steps for {} cities", steps.len(), cities));
        }
        if steps.last() != Some(&start) {
            return invalid(format!("tour does not return to start city {start}"));
        }
        let mut seen = vec![false; cities];
        for &city in &steps {
            match seen.get_mut(city) {
                None => return invalid(format!("city {city} out of range")),
                Some(true) => return invalid(format!("city {city} visited twice")),
                Some(hit) => *hit = true,
            }
        }
        Ok(Self { start, steps })
    }

    // Callers guarantee the cycle is valid.
    pub(crate) fn from_parts(start: usize, steps: Vec<usize>) -> Self {
        Self { start, steps }
    }

    pub(crate) fn restart(&mut self, start: usize) {
        self.start = start;
        self.steps.clear();
    }

    pub(crate) fn push(&mut self, city: usize) {
        self.steps.push(city);
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Number of cities on the tour.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The closed visiting sequence, from `start` back to `start`.
    pub fn cities(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.start).chain(self.steps.iter().copied())
    }

    /// Directed edges in travel order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cities().zip(self.steps.iter().copied())
    }

    /// Sum of the distances along the stored edges.
    pub fn cost(&self, distances: &DistanceMatrix) -> f64 {
        self.edges().map(|(from, to)| distances.get(from, to)).sum()
    }

    /// The same cycle re-rooted at `city`, or `None` if `city` is not on the tour.
    pub fn rotated(&self, city: usize) -> Option<Self> {
        let offset = self.steps.iter().position(|&step| step == city)?;
        let steps = self.steps[offset + 1..]
            .iter()
            .chain(&self.steps[..=offset])
            .copied()
            .collect();
        Some(Self { start: city, steps })
    }
}
