//! Random number sources threaded through tour construction.

/// A source of uniform draws. Every random decision in a run goes through one of these, so a
/// fixed source makes a run reproducible.
pub trait RandomSource {
    /// Returns a uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Returns a uniform index in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize;
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f64 {
        self.f64()
    }

    fn below(&mut self, n: usize) -> usize {
        self.usize(..n)
    }
}

/// Replays a fixed list of unit draws, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct Replay {
    draws: Vec<f64>,
    cursor: usize,
}

impl Replay {
    /// Creates a replay source. Draws are clamped into `[0, 1)`; an empty list replays `0.0`.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let draws = draws
            .into_iter()
            .map(|draw| draw.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { draws, cursor: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for Replay {
    fn unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }

    fn below(&mut self, n: usize) -> usize {
        ((self.unit() * n as f64) as usize).min(n - 1)
    }
}
