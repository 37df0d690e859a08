//! An ant-colony travelling salesman solver.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::ant::{Ant, TrailView};
use crate::config::ColonyConfig;
use crate::error::{ColonyError, Result};
use crate::field::{DistanceMatrix, HeuristicField, PheromoneField};
use crate::rng::RandomSource;
use crate::strategy::Round;
use crate::tour::Tour;

/// Share of the population, in tenths, that must agree on a cost before the colony stops.
const CONVERGENCE_TENTHS: usize = 9;

#[derive(Debug, Clone)]
pub struct Colony {
    distances: DistanceMatrix,
    heuristic: HeuristicField,
    pheromone: PheromoneField,
    ants: Vec<Ant>,
    config: ColonyConfig,

    // The best tour ever found. An infinite cost means no tour has been found yet.
    best: Best,

    // Completed iterations since construction or the last reset.
    iteration: usize,
    converged_at: Option<usize>,
    phase: Phase,
    history: Vec<f64>,

    // A reused per-iteration cost buffer.
    costs: Vec<f64>,
}

/// The best tour found so far and its cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Best {
    pub tour: Tour,
    pub cost: f64,
}

impl Best {
    fn none() -> Self {
        Self {
            tour: Tour::from_parts(0, Vec::new()),
            cost: f64::INFINITY,
        }
    }
}

/// Where the colony is in its iteration cycle.
///
/// Every iteration walks `Constructing -> Evaluating -> Reinforcing -> Decaying`, then
/// `Bounding` for bounded variants, and ends in `Continue` or one of the two terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Constructing,
    Evaluating,
    Reinforcing,
    Decaying,
    Bounding,
    Continue,
    Converged,
    /// The iteration budget ran out without convergence.
    Exhausted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::Exhausted)
    }
}

/// Summary of one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Iteration {
    /// 0-based iteration index.
    pub index: usize,
    /// Cheapest tour cost among this iteration's ants.
    pub iteration_best: f64,
    /// Best cost over every iteration so far.
    pub best_cost: f64,
    /// Ants whose tour cost equals the first ant's.
    pub agreeing: usize,
    pub converged: bool,
}

/// Result of [Colony::run].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub tour: Tour,
    pub cost: f64,
    /// Iteration at which convergence fired, or the iteration budget if it never did.
    pub converged_at: usize,
    pub converged: bool,
    pub iterations: usize,
    /// Best-so-far cost after each iteration.
    pub history: Vec<f64>,
}

impl Colony {
    /// Validates `config` and spawns the population. Scattered start cities are drawn from `rng`.
    pub fn new<R>(distances: DistanceMatrix, config: ColonyConfig, rng: &mut R) -> Result<Self>
    where
        R: RandomSource + ?Sized,
    {
        config.validate()?;
        let cities = distances.len();
        let heuristic = HeuristicField::new(&distances);
        let ants = spawn_ants(&config, cities, rng);

        debug!(
            cities,
            ants = ants.len(),
            variant = config.variant.name(),
            "Created colony"
        );

        Ok(Self {
            distances,
            heuristic,
            pheromone: PheromoneField::new(cities),
            ants,
            config,
            best: Best::none(),
            iteration: 0,
            converged_at: None,
            phase: Phase::Idle,
            history: Vec::new(),
            costs: Vec::new(),
        })
    }

    /// Runs iterations until the colony converges or exhausts its iteration budget, and returns
    /// the best tour seen along the way.
    ///
    /// A colony that already finished returns its recorded outcome without iterating again.
    pub fn run<R>(&mut self, rng: &mut R) -> Result<RunOutcome>
    where
        R: RandomSource + ?Sized,
    {
        while !self.phase.is_terminal() {
            self.step(rng)?;
        }

        let outcome = RunOutcome {
            tour: self.best.tour.clone(),
            cost: self.best.cost,
            converged_at: self.converged_at.unwrap_or(self.config.iteration_budget),
            converged: self.converged_at.is_some(),
            iterations: self.iteration,
            history: self.history.clone(),
        };

        info!(
            variant = self.config.variant.name(),
            converged = outcome.converged,
            converged_at = outcome.converged_at,
            best_cost = outcome.cost,
            "Colony run finished"
        );

        Ok(outcome)
    }

    /// Runs a single iteration: construct, evaluate, reinforce, decay and (for bounded
    /// variants) clip.
    ///
    /// Fails with [ColonyError::Finished] once the colony has converged or exhausted its
    /// budget, leaving the trails and history untouched.
    pub fn step<R>(&mut self, rng: &mut R) -> Result<Iteration>
    where
        R: RandomSource + ?Sized,
    {
        if self.phase.is_terminal() {
            return Err(ColonyError::Finished {
                iterations: self.iteration,
            });
        }

        let index = self.iteration;
        let variant = self.config.variant;

        self.enter(Phase::Constructing);
        let view = TrailView {
            pheromone: &self.pheromone,
            heuristic: &self.heuristic,
            alpha: self.config.alpha,
            beta: self.config.beta,
        };
        for ant in &mut self.ants {
            ant.construct(view, rng)?;
        }

        self.enter(Phase::Evaluating);
        self.costs.clear();
        self.costs.extend(
            self.ants
                .iter()
                .map(|ant| ant.tour().cost(&self.distances)),
        );
        let mut iteration_best = 0;
        for (ant, &cost) in self.costs.iter().enumerate() {
            if cost < self.best.cost {
                self.best = Best {
                    tour: self.ants[ant].tour().clone(),
                    cost,
                };
            }
            if cost <= self.costs[iteration_best] {
                iteration_best = ant;
            }
        }

        self.enter(Phase::Reinforcing);
        variant.reinforce(
            &mut self.pheromone,
            Round {
                ants: &self.ants,
                costs: &self.costs,
                iteration_best,
                best: &self.best,
            },
            self.config.deposit_rate,
        );
        let agreeing = agreeing(&self.costs);
        let converged = is_converged(agreeing, self.ants.len());

        self.enter(Phase::Decaying);
        self.pheromone.decay(self.config.decay_rate);

        if variant.bounds().is_some() {
            self.enter(Phase::Bounding);
            variant.bound(&mut self.pheromone);
        }

        self.iteration += 1;
        self.history.push(self.best.cost);

        let iteration = Iteration {
            index,
            iteration_best: self.costs[iteration_best],
            best_cost: self.best.cost,
            agreeing,
            converged,
        };

        debug!(
            iteration = index,
            iteration_best = iteration.iteration_best,
            best_cost = iteration.best_cost,
            agreeing,
            "Finished iteration"
        );

        if converged {
            self.converged_at.get_or_insert(index);
            self.enter(Phase::Converged);
        } else if self.iteration >= self.config.iteration_budget {
            self.enter(Phase::Exhausted);
        } else {
            self.enter(Phase::Continue);
        }

        Ok(iteration)
    }

    /// Lets a fresh ant at city 0 build one tour against the current trails. Colony state is
    /// left untouched.
    pub fn sample_tour<R>(&self, rng: &mut R) -> Result<Tour>
    where
        R: RandomSource + ?Sized,
    {
        let mut ant = Ant::new(0);
        ant.construct(self.view(), rng)?;
        Ok(ant.tour().clone())
    }

    /// Restores uniform trails and forgets all run state, keeping the current population.
    pub fn reset(&mut self) {
        self.pheromone.reset();
        for ant in &mut self.ants {
            ant.reset();
        }
        self.best = Best::none();
        self.iteration = 0;
        self.converged_at = None;
        self.history.clear();
        self.enter(Phase::Idle);
    }

    /// Replaces the population with freshly spawned ants and starts a fresh run, as [Self::reset]
    /// does. Tours found by the previous population are forgotten.
    pub fn regenerate_ants<R>(&mut self, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        self.ants = spawn_ants(&self.config, self.distances.len(), rng);
        self.reset();
    }

    /// Swaps in a new configuration, respawns the population and resets the run.
    pub fn reconfigure<R>(&mut self, config: ColonyConfig, rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        config.validate()?;
        self.config = config;
        self.regenerate_ants(rng);
        Ok(())
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn heuristic(&self) -> &HeuristicField {
        &self.heuristic
    }

    pub fn pheromone(&self) -> &PheromoneField {
        &self.pheromone
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// The best tour found so far, or `None` before the first iteration.
    pub fn best(&self) -> Option<&Best> {
        self.best.cost.is_finite().then_some(&self.best)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn converged_at(&self) -> Option<usize> {
        self.converged_at
    }

    /// Completed iterations.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    fn view(&self) -> TrailView<'_> {
        TrailView {
            pheromone: &self.pheromone,
            heuristic: &self.heuristic,
            alpha: self.config.alpha,
            beta: self.config.beta,
        }
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
    }
}

fn spawn_ants<R>(config: &ColonyConfig, cities: usize, rng: &mut R) -> Vec<Ant>
where
    R: RandomSource + ?Sized,
{
    (0..config.population_size)
        .map(|_| {
            let start = if config.scatter_start_positions {
                rng.below(cities)
            } else {
                0
            };
            Ant::new(start)
        })
        .collect()
}

/// Counts the costs equal to the first one, the first included.
pub fn agreeing(costs: &[f64]) -> usize {
    match costs.first() {
        Some(&reference) => costs.iter().filter(|&&cost| cost == reference).count(),
        None => 0,
    }
}

/// True once strictly more than 90% of `population` agree.
pub fn is_converged(agreeing: usize, population: usize) -> bool {
    agreeing * 10 > population * CONVERGENCE_TENTHS
}
