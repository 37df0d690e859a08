//! Ant colony optimization for the travelling salesman problem.
//!
//! A [Colony] owns the pheromone trails and a fixed population of [Ant]s. Each iteration every
//! ant builds a tour by roulette-wheel selection over pheromone and inverse distance, then the
//! configured [Variant] reinforces the trails before they evaporate:
//!
//! - [Variant::Uniform]: Ant System, every tour deposits.
//! - [Variant::Elitist]: Elitist Ant System, the best tour so far deposits again.
//! - [Variant::MinMax]: Max-Min Ant System, only the iteration-best tour deposits and trails are
//!   clipped into fixed bounds.
//!
//! A run stops once more than 90% of the ants agree on a tour cost, or when the iteration budget
//! runs out.

pub mod ant;
pub mod colony;
pub mod config;
pub mod error;
pub mod field;
pub mod rng;
pub mod strategy;
pub mod sweep;
pub mod tour;

pub use ant::{Ant, TrailView};
pub use colony::{agreeing, is_converged, Best, Colony, Iteration, Phase, RunOutcome};
pub use config::ColonyConfig;
pub use error::{ColonyError, Result};
pub use field::{DistanceMatrix, HeuristicField, PheromoneField};
pub use rng::{RandomSource, Replay};
pub use strategy::{Round, Variant};
pub use sweep::{sweep, SweepPoint, SweepResult};
pub use tour::Tour;
