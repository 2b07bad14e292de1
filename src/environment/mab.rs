use super::sparse::SparseBoundSolver;

use crate::arms::{Arm, RewardDistribution};
use crate::errors::EnvironmentError;

use rand::Rng;
use std::fmt;
use tracing::{debug, warn};

/// A fixed set of arms and the statistics derived from their history.
///
/// The aggregates are a snapshot taken at construction, they do not follow the play.
#[derive(Clone, Debug)]
pub struct Mab {
    arms: Vec<Arm>,
    means: Vec<f64>,
    pulls: Vec<u64>,
    rewards: Vec<f64>,
    rewards_squared: Vec<f64>,
    total_consumption: Vec<f64>,
    ids: Vec<String>,
    t: u64,
    max_arm: f64,
    min_arm: f64,
    sparsity: Option<usize>,
}

impl Mab {
    pub fn new(arms: Vec<Arm>) -> Result<Self, EnvironmentError> {
        if arms.is_empty() {
            return Err(EnvironmentError::NoArms);
        }

        let means = arms.iter().map(|arm| arm.mean()).collect::<Vec<f64>>();
        let pulls = arms.iter().map(|arm| arm.size()).collect::<Vec<u64>>();
        let rewards = arms
            .iter()
            .map(|arm| arm.discounted_sum())
            .collect::<Vec<f64>>();
        let rewards_squared = rewards.iter().map(|r| r * r).collect();
        let total_consumption = arms.iter().map(|arm| arm.consumption()).collect();
        let ids = arms.iter().map(|arm| arm.id().to_string()).collect();
        let max_arm = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_arm = means.iter().copied().fold(f64::INFINITY, f64::min);

        debug!(
            nb_arms = arms.len(),
            max_arm = %max_arm,
            min_arm = %min_arm,
            "Built bandit environment"
        );

        Ok(Self {
            t: pulls.iter().sum(),
            arms,
            means,
            pulls,
            rewards,
            rewards_squared,
            total_consumption,
            ids,
            max_arm,
            min_arm,
            sparsity: None,
        })
    }

    /// Overrides the sparsity estimated from the means.
    pub fn with_sparsity(mut self, sparsity: usize) -> Result<Self, EnvironmentError> {
        if sparsity > self.nb_arms() {
            return Err(EnvironmentError::InvalidSparsity {
                sparsity,
                nb_arms: self.nb_arms(),
            });
        }
        debug!(sparsity, "Environment sparsity overridden");
        self.sparsity = Some(sparsity);
        Ok(self)
    }

    pub fn nb_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn pulls(&self) -> &[u64] {
        &self.pulls
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn rewards_squared(&self) -> &[f64] {
        &self.rewards_squared
    }

    pub fn total_consumption(&self) -> &[f64] {
        &self.total_consumption
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Total number of historical samples.
    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn max_arm(&self) -> f64 {
        self.max_arm
    }

    pub fn min_arm(&self) -> f64 {
        self.min_arm
    }

    fn arm(&self, arm_id: usize) -> Result<&Arm, EnvironmentError> {
        self.arms
            .get(arm_id)
            .ok_or(EnvironmentError::ArmNotFound(arm_id))
    }

    pub fn draw<R: Rng + ?Sized>(
        &self,
        arm_id: usize,
        rng: &mut R,
    ) -> Result<f64, EnvironmentError> {
        Ok(self.arm(arm_id)?.draw(rng))
    }

    pub fn draw_batch<R: Rng + ?Sized>(
        &self,
        arm_id: usize,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, EnvironmentError> {
        Ok(self.arm(arm_id)?.draw_batch(rng, size))
    }

    /// One sample from every arm.
    pub fn draw_each<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.arms.iter().map(|arm| arm.draw(rng)).collect()
    }

    fn check_count(&self, m: usize) -> Result<(), EnvironmentError> {
        if m == 0 || m > self.nb_arms() {
            Err(EnvironmentError::InvalidCount {
                m,
                nb_arms: self.nb_arms(),
            })
        } else {
            Ok(())
        }
    }

    fn sorted_means(&self) -> Vec<f64> {
        let mut sorted = self.means.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// The `m` largest means, in increasing order.
    pub fn m_best(&self, m: usize) -> Result<Vec<f64>, EnvironmentError> {
        self.check_count(m)?;
        let sorted = self.sorted_means();
        Ok(sorted[sorted.len() - m..].to_vec())
    }

    /// The `m` smallest means, in increasing order.
    pub fn m_worst(&self, m: usize) -> Result<Vec<f64>, EnvironmentError> {
        self.check_count(m)?;
        let sorted = self.sorted_means();
        Ok(sorted[..m].to_vec())
    }

    pub fn sum_best_means(&self, m: usize) -> Result<f64, EnvironmentError> {
        Ok(self.m_best(m)?.iter().sum())
    }

    pub fn get_min_arm(&self, horizon: usize) -> Vec<f64> {
        vec![self.min_arm; horizon]
    }

    pub fn get_max_arm(&self, horizon: usize) -> Vec<f64> {
        vec![self.max_arm; horizon]
    }

    pub fn get_max_arms(&self, m: usize, horizon: usize) -> Result<Vec<f64>, EnvironmentError> {
        Ok(vec![self.sum_best_means(m)?; horizon])
    }

    /// Means of every arm repeated over the horizon, one row per arm.
    pub fn get_all_means(&self, horizon: usize) -> Vec<Vec<f64>> {
        self.means.iter().map(|&mean| vec![mean; horizon]).collect()
    }

    /// Number of arms with a positive mean, unless overridden.
    pub fn sparsity(&self) -> usize {
        self.sparsity
            .unwrap_or_else(|| self.means.iter().filter(|&&mean| mean > 0.0).count())
    }

    fn suboptimal_arms(&self) -> impl Iterator<Item = &Arm> {
        self.arms
            .iter()
            .filter(move |arm| arm.mean() != self.max_arm)
    }

    /// Constant `C(mu)` of the Lai & Robbins lower bound.
    pub fn lowerbound(&self) -> f64 {
        self.suboptimal_arms()
            .map(|arm| arm.one_lr(self.max_arm, arm.mean()))
            .sum()
    }

    /// Optimal arm identification factor `H_OI(mu)`.
    pub fn hoifactor(&self) -> f64 {
        self.suboptimal_arms()
            .map(|arm| arm.one_hoi(self.max_arm, arm.mean()))
            .sum::<f64>()
            / self.nb_arms() as f64
    }

    /// Constant of the sparse bandit lower bound [Kwon, Perchet & Vernade, 2017], or NaN when it
    /// cannot be computed.
    pub fn lowerbound_sparse(
        &self,
        sparsity: Option<usize>,
        solver: Option<&dyn SparseBoundSolver>,
    ) -> f64 {
        let sparsity = sparsity.or(self.sparsity).unwrap_or(self.nb_arms());
        if sparsity > self.nb_arms() {
            warn!(sparsity, nb_arms = self.nb_arms(), "Invalid sparsity");
            return f64::NAN;
        }
        let Some(solver) = solver else {
            warn!("No sparse solver available");
            return f64::NAN;
        };

        match solver.solve(&self.means, sparsity) {
            Ok(coefficients) if coefficients.len() == self.nb_arms() => self
                .means
                .iter()
                .zip(coefficients)
                .map(|(mean, c)| (self.max_arm - mean) * c)
                .sum(),
            Ok(coefficients) => {
                warn!(
                    got = coefficients.len(),
                    expected = self.nb_arms(),
                    "Sparse solver returned the wrong number of coefficients"
                );
                f64::NAN
            }
            Err(err) => {
                warn!(error = %err, "Sparse solver failed");
                f64::NAN
            }
        }
    }
}

impl fmt::Display for Mab {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arms = self
            .arms
            .iter()
            .map(|arm| arm.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        write!(
            f,
            "MAB(nb_arms: {}, arms: [{}], min_arm: {:.3}, max_arm: {:.3})",
            self.nb_arms(),
            arms,
            self.min_arm,
            self.max_arm
        )
    }
}
