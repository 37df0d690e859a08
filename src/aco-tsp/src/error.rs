use thiserror::Error;

/// Errors raised while configuring or running a colony.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColonyError {
    #[error("distance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("distance matrix needs at least 2 cities, got {cities}")]
    TooFewCities { cities: usize },
    #[error("distance [{row}][{col}] = {value} must be finite and non-negative")]
    InvalidDistance { row: usize, col: usize, value: f64 },
    #[error("{field} = {value} is invalid, expected {expected}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("min_bound {min} must be below max_bound {max}")]
    InvalidBounds { min: f64, max: f64 },
    /// Every candidate from `city` scored zero. Pheromone vanished without bounding.
    #[error("zero total desirability leaving city {city} at step {step}")]
    DegenerateStep { city: usize, step: usize },
    #[error("invalid tour: {reason}")]
    InvalidTour { reason: String },
    /// The colony already converged or spent its budget. Call `reset` to run again.
    #[error("colony already finished after {iterations} iterations")]
    Finished { iterations: usize },
}

pub type Result<T> = std::result::Result<T, ColonyError>;
