use serde::{Deserialize, Serialize};

use crate::error::{ColonyError, Result};
use crate::strategy::Variant;

/// Tunable parameters of a colony run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Number of ants constructing a tour each iteration.
    pub population_size: usize,
    /// Iterations to run when the colony never converges.
    pub iteration_budget: usize,
    /// Multiplier applied to every trail after reinforcement, in `(0, 1)`.
    pub decay_rate: f64,
    /// Deposit constant `Q`; a tour of cost `c` deposits `Q / c` per edge.
    pub deposit_rate: f64,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Visibility exponent.
    pub beta: f64,
    /// Start each ant at a uniformly drawn city instead of city 0.
    pub scatter_start_positions: bool,
    pub variant: Variant,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            iteration_budget: 300,
            decay_rate: 0.9,
            deposit_rate: 1.0,
            alpha: 2.0,
            beta: 1.0,
            scatter_start_positions: false,
            variant: Variant::Uniform,
        }
    }
}

impl ColonyConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    #[must_use]
    pub fn with_iteration_budget(mut self, iteration_budget: usize) -> Self {
        self.iteration_budget = iteration_budget;
        self
    }

    #[must_use]
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    #[must_use]
    pub fn with_deposit_rate(mut self, deposit_rate: f64) -> Self {
        self.deposit_rate = deposit_rate;
        self
    }

    #[must_use]
    pub fn with_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    #[must_use]
    pub fn with_scatter(mut self, scatter: bool) -> Self {
        self.scatter_start_positions = scatter;
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Rejects any out-of-range option, naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size", 0.0, "an integer > 0"));
        }
        if self.iteration_budget == 0 {
            return Err(invalid("iteration_budget", 0.0, "an integer > 0"));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate < 1.0) {
            return Err(invalid("decay_rate", self.decay_rate, "a value in (0, 1)"));
        }
        if !(self.deposit_rate > 0.0 && self.deposit_rate.is_finite()) {
            return Err(invalid("deposit_rate", self.deposit_rate, "a finite value > 0"));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(invalid("alpha", self.alpha, "a finite value >= 0"));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(invalid("beta", self.beta, "a finite value >= 0"));
        }
        self.variant.validate()
    }
}

fn invalid(field: &'static str, value: f64, expected: &'static str) -> ColonyError {
    ColonyError::InvalidParameter {
        field,
        value,
        expected,
    }
}
