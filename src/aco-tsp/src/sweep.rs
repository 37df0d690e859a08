//! Parameter sweeps: one seeded run per parameter point on a single reused colony.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::colony::{Colony, RunOutcome};
use crate::config::ColonyConfig;
use crate::error::Result;
use crate::field::DistanceMatrix;

/// Overrides applied to the base configuration for one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub decay_rate: Option<f64>,
    pub population_size: Option<usize>,
}

impl SweepPoint {
    pub fn decay(decay_rate: f64) -> Self {
        Self {
            decay_rate: Some(decay_rate),
            ..Self::default()
        }
    }

    pub fn population(population_size: usize) -> Self {
        Self {
            population_size: Some(population_size),
            ..Self::default()
        }
    }

    pub fn apply(&self, base: &ColonyConfig) -> ColonyConfig {
        let mut config = base.clone();
        if let Some(decay_rate) = self.decay_rate {
            config.decay_rate = decay_rate;
        }
        if let Some(population_size) = self.population_size {
            config.population_size = population_size;
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub point: SweepPoint,
    pub outcome: RunOutcome,
}

/// Runs one colony per point, each seeded with `seed`, so a point's result does not depend on
/// its position in `points`. Every derived configuration is validated before the first run.
pub fn sweep(
    distances: DistanceMatrix,
    base: &ColonyConfig,
    points: &[SweepPoint],
    seed: u64,
) -> Result<Vec<SweepResult>> {
    let configs = points
        .iter()
        .map(|point| {
            let config = point.apply(base);
            config.validate().map(|_| config)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut colony = Colony::new(distances, base.clone(), &mut fastrand::Rng::with_seed(seed))?;
    let mut results = Vec::with_capacity(points.len());
    for (point, config) in points.iter().zip(configs) {
        let mut rng = fastrand::Rng::with_seed(seed);
        colony.reconfigure(config, &mut rng)?;
        let outcome = colony.run(&mut rng)?;

        info!(
            decay_rate = colony.config().decay_rate,
            population_size = colony.config().population_size,
            cost = outcome.cost,
            converged_at = outcome.converged_at,
            "Sweep point finished"
        );

        results.push(SweepResult {
            point: *point,
            outcome,
        });
    }

    Ok(results)
}
