//! Pheromone update strategies: Ant System, Elitist Ant System and Max-Min Ant System.

use serde::{Deserialize, Serialize};

use crate::ant::Ant;
use crate::colony::Best;
use crate::error::{ColonyError, Result};
use crate::field::PheromoneField;

/// Which tours reinforce the pheromone field, and whether the field is bounded afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// Every ant deposits on its own tour.
    Uniform,
    /// Every ant deposits, and the best tour found so far deposits again scaled by `weight`.
    Elitist {
        #[serde(default = "default_elitist_weight")]
        weight: f64,
    },
    /// Only the iteration-best ant deposits. After decay every trail is clipped into
    /// `[min_bound, max_bound]`.
    MinMax {
        #[serde(default = "default_min_bound")]
        min_bound: f64,
        #[serde(default = "default_max_bound")]
        max_bound: f64,
    },
}

fn default_elitist_weight() -> f64 {
    Variant::DEFAULT_ELITIST_WEIGHT
}

fn default_min_bound() -> f64 {
    Variant::DEFAULT_MIN_BOUND
}

fn default_max_bound() -> f64 {
    Variant::DEFAULT_MAX_BOUND
}

impl Default for Variant {
    fn default() -> Self {
        Self::Uniform
    }
}

/// Everything a strategy may draw on after the colony has evaluated one iteration.
#[derive(Debug, Clone, Copy)]
pub struct Round<'a> {
    pub ants: &'a [Ant],
    /// Tour cost of each ant, index-aligned with `ants`.
    pub costs: &'a [f64],
    /// Index of the cheapest ant this iteration.
    pub iteration_best: usize,
    /// Best tour over every iteration so far, this one included.
    pub best: &'a Best,
}

impl Variant {
    pub const DEFAULT_ELITIST_WEIGHT: f64 = 1.0;
    pub const DEFAULT_MIN_BOUND: f64 = 1e-8;
    pub const DEFAULT_MAX_BOUND: f64 = 1e8;

    pub fn elitist() -> Self {
        Self::Elitist {
            weight: Self::DEFAULT_ELITIST_WEIGHT,
        }
    }

    pub fn min_max() -> Self {
        Self::MinMax {
            min_bound: Self::DEFAULT_MIN_BOUND,
            max_bound: Self::DEFAULT_MAX_BOUND,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Elitist { .. } => "elitist",
            Self::MinMax { .. } => "min_max",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Uniform => Ok(()),
            Self::Elitist { weight } => {
                if weight > 0.0 && weight.is_finite() {
                    Ok(())
                } else {
                    Err(ColonyError::InvalidParameter {
                        field: "elitist weight",
                        value: weight,
                        expected: "a finite value > 0",
                    })
                }
            }
            Self::MinMax {
                min_bound,
                max_bound,
            } => {
                if !(min_bound > 0.0 && min_bound.is_finite()) {
                    return Err(ColonyError::InvalidParameter {
                        field: "min_bound",
                        value: min_bound,
                        expected: "a finite value > 0",
                    });
                }
                if !max_bound.is_finite() {
                    return Err(ColonyError::InvalidParameter {
                        field: "max_bound",
                        value: max_bound,
                        expected: "a finite value",
                    });
                }
                if min_bound >= max_bound {
                    return Err(ColonyError::InvalidBounds {
                        min: min_bound,
                        max: max_bound,
                    });
                }
                Ok(())
            }
        }
    }

    /// Trail bounds enforced after decay, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MinMax {
                min_bound,
                max_bound,
            } => Some((min_bound, max_bound)),
            _ => None,
        }
    }

    /// Deposits `deposit_rate / cost` on every edge of each reinforcing tour.
    pub fn reinforce(&self, field: &mut PheromoneField, round: Round<'_>, deposit_rate: f64) {
        match *self {
            Self::Uniform => deposit_all(field, round, deposit_rate),
            Self::Elitist { weight } => {
                deposit_all(field, round, deposit_rate);
                field.deposit_tour(&round.best.tour, weight * deposit_rate / round.best.cost);
            }
            Self::MinMax { .. } => {
                let index = round.iteration_best;
                field.deposit_tour(
                    round.ants[index].tour(),
                    deposit_rate / round.costs[index],
                );
            }
        }
    }

    /// Clips the field into the variant's bounds. A no-op for unbounded variants.
    pub fn bound(&self, field: &mut PheromoneField) {
        if let Some((min, max)) = self.bounds() {
            field.clamp(min, max);
        }
    }
}

fn deposit_all(field: &mut PheromoneField, round: Round<'_>, deposit_rate: f64) {
    for (ant, cost) in round.ants.iter().zip(round.costs) {
        field.deposit_tour(ant.tour(), deposit_rate / cost);
    }
}
