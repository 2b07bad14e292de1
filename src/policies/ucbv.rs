use super::index::IndexPolicy;
use super::policy::{Policy, PolicyCore};

use crate::errors::PolicyError;

/// UCB with a variance correction term [Audibert, Munos & Szepesvári, 2009].
///
/// With rewards in `[a, a + b]`, `Z_k` the sum of squared normalized rewards of arm `k`:
/// `mu_k = X_k / N_k`, `V_k = Z_k / N_k - mu_k^2` and
/// `I_k(t) = mu_k + sqrt(2 ln(t) V_k / N_k) + 3 b ln(t) / N_k`.
#[derive(Clone, Debug)]
pub struct UcbV {
    core: PolicyCore,
    indexes: Vec<f64>,
}

impl UcbV {
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
        let mean = stats.rewards()[arm] / pulls;
        let variance = stats.rewards_squared()[arm] / pulls - mean.powi(2);

        mean + (2.0 * log_t * variance / pulls).sqrt() + 3.0 * self.core.amplitude() * log_t / pulls
    }
}

impl Policy for UcbV {
    fn name(&self) -> &'static str {
        "UCB-V"
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

    /// Also accumulates the squared reward, normalized to [0, 1] but not weighted.
    fn get_reward(&mut self, arm: usize, reward: f64, weight: f64) -> Result<(), PolicyError> {
        let normalized = (reward - self.core.lower()) / self.core.amplitude();
        let stats = self.core.stats_mut();
        stats.record(arm, reward, weight)?;
        stats.record_squared(arm, normalized.powi(2))
    }

    fn choice(&mut self) -> usize {
        self.index_choice()
    }

    fn choice_multiple(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
        self.index_choice_multiple(size)
    }
}

impl IndexPolicy for UcbV {
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
