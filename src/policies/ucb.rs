use super::index::IndexPolicy;
use super::policy::{Policy, PolicyCore};

use crate::errors::PolicyError;

/// The UCB policy for bounded rewards [Lai & Robbins, 1985]:
/// `I_k(t) = X_k / N_k + sqrt(2 ln(t) / N_k)`, `+inf` for an arm never pulled.
#[derive(Clone, Debug)]
pub struct Ucb {
    core: PolicyCore,
    indexes: Vec<f64>,
}

impl Ucb {
    pub fn new(
        nb_arms: usize,
        lower: f64,
        amplitude: f64,
        seed: Option<u64>,
    ) -> Result<Self, PolicyError> {
        Ok(Self {
            core: PolicyCore::new(nb_arms, lower, amplitude, seed)?,
            indexes: vec![0.0; nb_arms],
        })
    }

    fn index_at(&self, arm: usize, log_t: f64) -> f64 {
        let stats = self.core.stats();
        let Some(&pulls) = stats.pulls().get(arm) else {
            return f64::NAN;
        };
        if pulls < 1 {
            return f64::INFINITY;
        }

        let pulls = pulls as f64;
        stats.rewards()[arm] / pulls + (2.0 * log_t / pulls).sqrt()
    }
}

impl Policy for Ucb {
    fn name(&self) -> &'static str {
        "UCB"
    }

    fn core(&self) -> &PolicyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PolicyCore {
        &mut self.core
    }

    fn start_game(&mut self) {
        self.core.stats_mut().reset();
        self.indexes.fill(0.0);
    }

    fn choice(&mut self) -> usize {
        self.index_choice()
    }

    fn choice_multiple(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
        self.index_choice_multiple(size)
    }
}

impl IndexPolicy for Ucb {
    fn indexes(&self) -> &[f64] {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut [f64] {
        &mut self.indexes
    }

    fn compute_index(&self, arm: usize) -> f64 {
        self.index_at(arm, (self.core.stats().t() as f64).ln())
    }

    fn compute_all_index(&mut self) {
        let log_t = (self.core.stats().t() as f64).ln();
        let indexes = (0..self.indexes.len())
            .map(|arm| self.index_at(arm, log_t))
            .collect::<Vec<f64>>();
        self.indexes = indexes;
    }
}
