//! Square matrices shared by the colony: edge costs, visibility and pheromone trails.

use ndarray::Array2;
use serde::Deserialize;

use crate::error::{ColonyError, Result};
use crate::tour::Tour;

/// Pairwise edge costs for `n` cities. Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    costs: Array2<f64>,
}

impl DistanceMatrix {
    pub fn new(costs: Array2<f64>) -> Result<Self> {
        let (rows, cols) = costs.dim();
        if rows != cols {
            return Err(ColonyError::NotSquare { rows, cols });
        }
        if rows < 2 {
            return Err(ColonyError::TooFewCities { cities: rows });
        }
        if let Some(((row, col), &value)) = costs
            .indexed_iter()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(ColonyError::InvalidDistance { row, col, value });
        }
        Ok(Self { costs })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(ColonyError::NotSquare {
                rows: n,
                cols: row.len(),
            });
        }
        let flat = rows.into_iter().flatten().collect();
        let costs = Array2::from_shape_vec((n, n), flat)
            .map_err(|_| ColonyError::NotSquare { rows: n, cols: n })?;
        Self::new(costs)
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.costs.nrows()
    }

    /// Always false: construction rejects matrices with fewer than two cities.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.costs[[from, to]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.costs
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = ColonyError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

/// Static attractiveness of each edge: the inverse distance, or zero where the distance is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicField {
    visibility: Array2<f64>,
}

impl HeuristicField {
    pub fn new(distances: &DistanceMatrix) -> Self {
        let visibility = distances
            .as_array()
            .mapv(|distance| if distance != 0.0 { 1.0 / distance } else { 0.0 });
        Self { visibility }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.visibility[[from, to]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.visibility
    }
}

/// Pheromone level of every undirected edge.
///
/// Each edge is stored once under its normalized [EdgeKey], so `get(i, j)` and `get(j, i)`
/// always read the same cell and a deposit on one direction is a deposit on both.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    cities: usize,
    levels: Vec<f64>,
}

impl PheromoneField {
    /// Level every trail starts from, and returns to on [PheromoneField::reset].
    pub const INITIAL_LEVEL: f64 = 1.0;

    pub fn new(cities: usize) -> Self {
        Self {
            cities,
            levels: vec![Self::INITIAL_LEVEL; cities * (cities + 1) / 2],
        }
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities
    }

    /// Always false for a field built from a validated [DistanceMatrix].
    pub fn is_empty(&self) -> bool {
        self.cities == 0
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.levels[EdgeKey::new(a, b).slot()]
    }

    /// Adds `amount` to the edge between `a` and `b` in both directions.
    pub fn deposit(&mut self, a: usize, b: usize, amount: f64) {
        self.levels[EdgeKey::new(a, b).slot()] += amount;
    }

    /// Adds `amount` to every edge travelled by `tour`.
    pub fn deposit_tour(&mut self, tour: &Tour, amount: f64) {
        for (from, to) in tour.edges() {
            self.deposit(from, to, amount);
        }
    }

    /// Evaporates every trail by multiplying it with `rate`.
    pub fn decay(&mut self, rate: f64) {
        for level in &mut self.levels {
            *level *= rate;
        }
    }

    /// Clips every trail into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        for level in &mut self.levels {
            *level = level.clamp(min, max);
        }
    }

    /// Restores every trail to [PheromoneField::INITIAL_LEVEL].
    pub fn reset(&mut self) {
        self.levels.fill(Self::INITIAL_LEVEL);
    }

    /// Iterates the level of every undirected edge, self-edges included.
    pub fn levels(&self) -> impl Iterator<Item = f64> + '_ {
        self.levels.iter().copied()
    }

    /// Expands the field into a full `n x n` matrix.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.cities, self.cities), |(a, b)| self.get(a, b))
    }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
struct EdgeKey(usize, usize);

impl EdgeKey {
    fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    // Row-major lower triangle, diagonal included.
    fn slot(self) -> usize {
        self.1 * (self.1 + 1) / 2 + self.0
    }
}
