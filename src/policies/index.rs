use super::policy::Policy;

use crate::errors::PolicyError;

use rand::{
    seq::{IndexedRandom, SliceRandom},
    Rng,
};
use tracing::warn;

/// A policy choosing, each round, the arm with the highest optimistic index.
pub trait IndexPolicy: Policy {
    /// Indexes of the last decision, one per arm.
    fn indexes(&self) -> &[f64];

    fn indexes_mut(&mut self) -> &mut [f64];

    fn compute_index(&self, arm: usize) -> f64;

    fn compute_all_index(&mut self) {
        for arm in 0..self.nb_arms() {
            let index = self.compute_index(arm);
            self.indexes_mut()[arm] = index;
        }
    }

    /// Uniform choice among the arms of maximal index.
    fn index_choice(&mut self) -> usize {
        self.compute_all_index();
        let arms = (0..self.nb_arms()).collect::<Vec<usize>>();
        select_best(self, &arms)
    }

    /// The `size` arms of largest index, ties broken at random.
    fn index_choice_multiple(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
        let nb_arms = self.nb_arms();
        if size == 0 || size > nb_arms {
            return Err(PolicyError::InvalidBatchSize { size, nb_arms });
        }

        self.compute_all_index();
        let indexes = self.indexes().to_vec();
        let mut order = (0..nb_arms).collect::<Vec<usize>>();
        order.shuffle(self.core_mut().rng_mut());

        if indexes.iter().any(|index| index.is_nan()) {
            warn!(?indexes, "Indexes cannot be ranked, choosing arms at random");
        } else {
            order.sort_by(|&a, &b| indexes[b].total_cmp(&indexes[a]));
        }
        order.truncate(size);

        Ok(order)
    }

    /// Choose an arm whose index is the `rank`-th largest, `rank == 1` being the best arm.
    fn choice_with_rank(&mut self, rank: usize) -> Result<usize, PolicyError> {
        let nb_arms = self.nb_arms();
        if rank == 0 || rank > nb_arms {
            return Err(PolicyError::InvalidRank { rank, nb_arms });
        }
        if rank == 1 {
            return Ok(self.choice());
        }

        self.compute_all_index();
        let indexes = self.indexes().to_vec();
        let arms = (0..nb_arms).collect::<Vec<usize>>();
        if indexes.iter().any(|index| index.is_nan()) {
            warn!(?indexes, "Indexes cannot be ranked, choosing an arm at random");
            return Ok(choose_uniform(self, &arms));
        }

        let mut sorted = indexes.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let target = sorted[rank - 1];
        let tied = arms
            .into_iter()
            .filter(|&arm| indexes[arm] == target)
            .collect::<Vec<usize>>();

        Ok(choose_uniform(self, &tied))
    }

    /// Best arm restricted to `subset`. An empty subset falls back to a choice over all arms.
    fn choice_from_subset(&mut self, subset: &[usize]) -> Result<usize, PolicyError> {
        if subset.is_empty() {
            warn!("Empty subset of available arms, choosing among all arms");
            return Ok(self.choice());
        }
        if let Some(&arm) = subset.iter().find(|&&arm| arm >= self.nb_arms()) {
            return Err(PolicyError::ArmNotFound(arm));
        }

        for &arm in subset {
            let index = self.compute_index(arm);
            self.indexes_mut()[arm] = index;
        }

        Ok(select_best(self, subset))
    }

    /// IMP strategy: `size - 1` arms of best empirical mean, plus one arm of best index among
    /// the others inserted at a random position. Pure exploration until every arm was pulled.
    fn choice_imp(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
        let nb_arms = self.nb_arms();
        if size == 0 || size > nb_arms {
            return Err(PolicyError::InvalidBatchSize { size, nb_arms });
        }
        if size == 1 {
            return Ok(vec![self.choice()]);
        }
        if self.stats().min_pulls() < 1 {
            return self.choice_multiple(size);
        }

        let stats = self.stats();
        let means = stats
            .rewards()
            .iter()
            .zip(stats.pulls())
            .map(|(&reward, &pulls)| reward / pulls as f64)
            .collect::<Vec<f64>>();
        let mut sorted = means.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let threshold = sorted[size - 1];

        let candidates = (0..nb_arms)
            .filter(|&arm| means[arm] >= threshold)
            .collect::<Vec<usize>>();
        let mut chosen = candidates
            .choose_multiple(self.core_mut().rng_mut(), size - 1)
            .copied()
            .collect::<Vec<usize>>();

        let available = (0..nb_arms)
            .filter(|arm| !chosen.contains(arm))
            .collect::<Vec<usize>>();
        let exploration = self.choice_from_subset(&available)?;

        let position = self.core_mut().rng_mut().random_range(0..=chosen.len());
        chosen.insert(position, exploration);

        Ok(chosen)
    }

    /// Permutation of the arms by increasing index.
    fn estimated_order(&mut self) -> Vec<usize> {
        self.compute_all_index();
        let indexes = self.indexes();
        let mut order = (0..self.nb_arms()).collect::<Vec<usize>>();
        order.sort_by(|&a, &b| indexes[a].total_cmp(&indexes[b]));
        order
    }

    /// The `m` arms estimated best, in no particular order.
    fn estimated_best_arms(&mut self, m: usize) -> Result<Vec<usize>, PolicyError> {
        let nb_arms = self.nb_arms();
        if m == 0 || m > nb_arms {
            return Err(PolicyError::InvalidBestArmCount { m, nb_arms });
        }

        let order = self.estimated_order();
        Ok(order[nb_arms - m..].to_vec())
    }
}

fn choose_uniform<P: IndexPolicy + ?Sized>(policy: &mut P, arms: &[usize]) -> usize {
    arms.choose(policy.core_mut().rng_mut())
        .copied()
        .unwrap_or_default()
}

fn select_best<P: IndexPolicy + ?Sized>(policy: &mut P, arms: &[usize]) -> usize {
    let indexes = policy.indexes();
    if arms.iter().any(|&arm| indexes[arm].is_nan()) {
        warn!(
            indexes = ?indexes,
            "Indexes could not be used to select an arm, choosing one at random"
        );
        return choose_uniform(policy, arms);
    }

    let max = arms
        .iter()
        .map(|&arm| indexes[arm])
        .fold(f64::NEG_INFINITY, f64::max);
    let best = arms
        .iter()
        .copied()
        .filter(|&arm| indexes[arm] == max)
        .collect::<Vec<usize>>();

    choose_uniform(policy, &best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::policy::PolicyCore;
    use crate::test_utils::count_warnings;

    const SEED: Option<u64> = Some(1234);

    /// Index policy with indexes set by hand.
    struct Fixed {
        core: PolicyCore,
        values: Vec<f64>,
        indexes: Vec<f64>,
    }

    impl Fixed {
        fn new(values: Vec<f64>) -> Self {
            Self {
                core: PolicyCore::new(values.len(), 0.0, 1.0, SEED).unwrap(),
                indexes: vec![0.0; values.len()],
                values,
            }
        }
    }

    impl Policy for Fixed {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn core(&self) -> &PolicyCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PolicyCore {
            &mut self.core
        }

        fn choice(&mut self) -> usize {
            self.index_choice()
        }

        fn choice_multiple(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
            self.index_choice_multiple(size)
        }
    }

    impl IndexPolicy for Fixed {
        fn indexes(&self) -> &[f64] {
            &self.indexes
        }

        fn indexes_mut(&mut self) -> &mut [f64] {
            &mut self.indexes
        }

        fn compute_index(&self, arm: usize) -> f64 {
            self.values[arm]
        }
    }

    #[test]
    fn choice_picks_max() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5]);
        assert_eq!(policy.choice(), 1);
        assert_eq!(policy.indexes(), &[0.1, 0.9, 0.5]);
    }

    #[test]
    fn choice_breaks_ties_uniformly() {
        let mut policy = Fixed::new(vec![1.0, 0.0, 1.0, 1.0]);
        let mut counts = [0usize; 4];
        for _ in 0..3000 {
            counts[policy.choice()] += 1;
        }
        assert_eq!(counts[1], 0);
        for arm in [0, 2, 3] {
            assert!(counts[arm] > 850, "{counts:?}");
        }
    }

    #[test]
    fn choice_with_nan_falls_back() {
        let mut policy = Fixed::new(vec![f64::NAN, 0.2, 0.3]);
        let mut seen = [false; 3];
        for _ in 0..300 {
            seen[policy.choice()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn choice_with_rank() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5, 0.3]);
        assert_eq!(policy.choice_with_rank(1), Ok(1));
        assert_eq!(policy.choice_with_rank(2), Ok(2));
        assert_eq!(policy.choice_with_rank(4), Ok(0));
        assert_eq!(
            policy.choice_with_rank(0),
            Err(PolicyError::InvalidRank { rank: 0, nb_arms: 4 })
        );
        assert!(policy.choice_with_rank(5).is_err());
    }

    #[test]
    fn choice_with_rank_ties() {
        let mut policy = Fixed::new(vec![0.5, 0.9, 0.5]);
        for _ in 0..50 {
            let arm = policy.choice_with_rank(2).unwrap();
            assert!(arm == 0 || arm == 2);
        }
    }

    #[test]
    fn choice_from_subset() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5, 0.3]);
        assert_eq!(policy.choice_from_subset(&[0, 2, 3]), Ok(2));
        assert_eq!(policy.choice_from_subset(&[]), Ok(1));
        assert_eq!(
            policy.choice_from_subset(&[0, 7]),
            Err(PolicyError::ArmNotFound(7))
        );
    }

    #[test]
    fn index_choice_multiple() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5, 0.3]);
        assert_eq!(policy.index_choice_multiple(2), Ok(vec![1, 2]));
        assert!(policy.index_choice_multiple(0).is_err());
        assert!(policy.index_choice_multiple(5).is_err());
    }

    #[test]
    fn estimated_order() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5, 0.3]);
        assert_eq!(policy.estimated_order(), vec![0, 3, 2, 1]);

        let mut best = policy.estimated_best_arms(2).unwrap();
        best.sort();
        assert_eq!(best, vec![1, 2]);
        assert_eq!(
            policy.estimated_best_arms(0),
            Err(PolicyError::InvalidBestArmCount { m: 0, nb_arms: 4 })
        );
        assert!(policy.estimated_best_arms(5).is_err());
    }

    #[test]
    fn choice_imp_explores_first() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5, 0.3]);
        // no pulls yet: delegates to choice_multiple
        assert_eq!(policy.choice_imp(2), Ok(vec![1, 2]));
        assert_eq!(policy.choice_imp(1), Ok(vec![1]));
        assert!(policy.choice_imp(0).is_err());
    }

    #[test]
    fn choice_imp_exploits_and_explores() {
        let mut policy = Fixed::new(vec![0.0, 0.0, 0.0, 1.0]);
        // empirical means: 0.8, 0.6, 0.2, 0.1
        for (arm, reward) in [(0, 0.8), (1, 0.6), (2, 0.2), (3, 0.1)] {
            policy.get_reward(arm, reward, 1.0).unwrap();
        }

        for _ in 0..20 {
            let arms = policy.choice_imp(2).unwrap();
            assert_eq!(arms.len(), 2);
            // one of the two best empirical means, plus the best index among the rest
            assert!(arms.contains(&0) || arms.contains(&1));
            assert!(arms.contains(&3));
        }
        assert_eq!(policy.choice_imp(4).unwrap().len(), 4);
    }

    #[test]
    fn fallbacks_warn() {
        let mut policy = Fixed::new(vec![f64::NAN, 0.2, 0.3]);
        let (_, warnings) = count_warnings(|| policy.choice());
        assert_eq!(warnings, 1);
        let (_, warnings) = count_warnings(|| policy.choice_with_rank(2));
        assert_eq!(warnings, 1);
        let (_, warnings) = count_warnings(|| policy.index_choice_multiple(2));
        assert_eq!(warnings, 1);

        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5]);
        let (arm, warnings) = count_warnings(|| policy.choice_from_subset(&[]));
        assert_eq!(arm, Ok(1));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn regular_choices_do_not_warn() {
        let mut policy = Fixed::new(vec![0.1, 0.9, 0.5]);
        let (_, warnings) = count_warnings(|| {
            policy.choice();
            policy.choice_with_rank(2).unwrap();
            policy.choice_from_subset(&[0, 2]).unwrap();
        });
        assert_eq!(warnings, 0);
    }
}
