//! Partitioning a small set of weighted items into groups.
//!
//! Two instantiations share this module:
//! - [`EqualPartition`]: can the items be split into `k` groups of equal
//!   sum? Items are added one at a time; the current group's fill level is
//!   `sum(mask) mod target`, so the mask alone identifies a state.
//! - [`MinCostPartition`]: cover every item with disjoint groups, each with a
//!   precomputed cost, at minimum total cost. One step consumes a whole
//!   submask of the uncovered items; anchoring each group on the lowest
//!   uncovered item produces every unordered partition exactly once.

use crate::aggregate::{MinCost, Reachability};
use crate::engine::MaskEngine;
use crate::error::{MaskDpError, Result};
use crate::mask::{Mask, Universe};
use crate::memo::StateKey;
use crate::subsets::anchored_submasks;
use crate::traits::{MaskProblem, Transition};
use crate::utils::{expect_len, subset_sums, DEFAULT_STATE_LIMIT};

#[derive(Clone, Debug)]
pub struct EqualPartition {
    universe: Universe,
    weights: Vec<i64>,
    sums: Vec<i64>,
    k: usize,
    /// Per-group sum, or `None` when no split can exist.
    target: Option<i64>,
}

impl EqualPartition {
    /// Weights must be positive and `k` at least one.
    pub fn new(weights: &[i64], k: usize) -> Result<Self> {
        if k == 0 {
            return Err(MaskDpError::InvalidInput("k must be at least 1".into()));
        }
        if let Some(w) = weights.iter().find(|&&w| w <= 0) {
            return Err(MaskDpError::InvalidInput(format!(
                "weights must be positive, got {w}"
            )));
        }
        let universe = Universe::encode(weights)?;
        let sums = subset_sums(weights)?;
        let total = sums[universe.full() as usize];
        let target = (total % k as i64 == 0)
            .then(|| total / k as i64)
            .filter(|&t| t > 0 && weights.iter().all(|&w| w <= t));
        Ok(Self {
            universe,
            weights: weights.to_vec(),
            sums,
            k,
            target,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }

    pub fn is_feasible(&self) -> Result<bool> {
        if self.weights.is_empty() {
            return Ok(true);
        }
        if self.target.is_none() {
            return Ok(false);
        }
        MaskEngine::new(self.clone()).value()
    }

    /// The `k` groups of item indices, if a split exists.
    pub fn groups(&self) -> Result<Option<Vec<Vec<usize>>>> {
        if self.weights.is_empty() {
            return Ok(Some(vec![Vec::new(); self.k]));
        }
        let Some(target) = self.target else {
            return Ok(None);
        };
        let solution = MaskEngine::new(self.clone()).run()?;
        if !solution.value {
            return Ok(None);
        }
        let mut groups = Vec::with_capacity(self.k);
        let mut current = Vec::new();
        let mut fill = 0;
        for item in solution.choices() {
            current.push(item);
            fill += self.weights[item];
            if fill == target {
                groups.push(std::mem::take(&mut current));
                fill = 0;
            }
        }
        Ok(Some(groups))
    }
}

impl MaskProblem for EqualPartition {
    type Agg = Reachability;
    type Choice = usize;

    fn universe(&self) -> Universe {
        self.universe
    }

    fn aggregator(&self) -> &Reachability {
        &Reachability
    }

    fn initial_state(&self) -> StateKey {
        StateKey::bare(0)
    }

    fn terminal(&self, state: StateKey) -> Option<()> {
        (state.mask == self.universe.full()).then_some(())
    }

    fn choices(&self, state: StateKey, out: &mut Vec<usize>) {
        out.extend(self.universe.absent(state.mask));
    }

    fn can_apply(&self, state: StateKey, item: usize) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        self.sums[state.mask as usize] % target + self.weights[item] <= target
    }

    fn apply(&self, state: StateKey, item: usize) -> Transition<()> {
        Transition::new(StateKey::bare(state.mask | self.universe.singleton(item)), ())
    }
}

#[derive(Clone, Debug)]
pub struct MinCostPartition {
    universe: Universe,
    /// group_cost[g] for every mask g; `MinCost::INFINITY` forbids the group.
    group_cost: Vec<i64>,
}

/// A cheapest cover of the items by disjoint groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub cost: i64,
    pub groups: Vec<Mask>,
}

impl Partition {
    /// Item indices of each group, ascending.
    pub fn members(&self) -> Vec<Vec<usize>> {
        self.groups
            .iter()
            .map(|&g| (0..64).filter(|&i| g >> i & 1 == 1).collect())
            .collect()
    }
}

impl MinCostPartition {
    /// `group_cost` must have one entry per mask of an `n`-element universe.
    pub fn new(n: usize, group_cost: Vec<i64>) -> Result<Self> {
        let universe = Universe::new(n)?;
        expect_len("group_cost", universe.states() as usize, group_cost.len())?;
        Ok(Self {
            universe,
            group_cost,
        })
    }

    /// Every group costs one and may hold at most `capacity` total weight:
    /// the minimum number of sessions/trips needed to process all items.
    pub fn with_capacity(weights: &[i64], capacity: i64) -> Result<Self> {
        if let Some(w) = weights.iter().find(|&&w| w < 0) {
            return Err(MaskDpError::InvalidInput(format!(
                "weights must be non-negative, got {w}"
            )));
        }
        let group_cost = subset_sums(weights)?
            .into_iter()
            .map(|s| if s <= capacity { 1 } else { MinCost::INFINITY })
            .collect();
        Self::new(weights.len(), group_cost)
    }

    pub fn solve(&self) -> Result<Option<Partition>> {
        let solution = MaskEngine::new(self.clone()).run_bottom_up()?;
        Ok(MinCost::finite(solution.value).map(|cost| Partition {
            cost,
            groups: solution.choices(),
        }))
    }

    pub fn min_cost(&self) -> Result<Option<i64>> {
        let engine = MaskEngine::with_options(self.clone(), DEFAULT_STATE_LIMIT, false);
        Ok(MinCost::finite(engine.run_bottom_up()?.value))
    }
}

impl MaskProblem for MinCostPartition {
    type Agg = MinCost;
    type Choice = Mask;

    fn universe(&self) -> Universe {
        self.universe
    }

    fn aggregator(&self) -> &MinCost {
        &MinCost
    }

    fn initial_state(&self) -> StateKey {
        StateKey::bare(0)
    }

    fn terminal(&self, state: StateKey) -> Option<i64> {
        (state.mask == self.universe.full()).then_some(0)
    }

    fn choices(&self, state: StateKey, out: &mut Vec<Mask>) {
        out.extend(anchored_submasks(self.universe.complement(state.mask)));
    }

    fn can_apply(&self, _state: StateKey, group: Mask) -> bool {
        self.group_cost[group as usize] != MinCost::INFINITY
    }

    fn apply(&self, state: StateKey, group: Mask) -> Transition<i64> {
        Transition::new(
            StateKey::bare(state.mask | group),
            self.group_cost[group as usize],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_equal_groups() {
        let problem = EqualPartition::new(&[4, 3, 2, 3, 5, 2, 1], 4).unwrap();
        assert_eq!(problem.target(), Some(5));
        assert!(problem.is_feasible().unwrap());
        let groups = problem.groups().unwrap().unwrap();
        assert_eq!(groups.len(), 4);
        let weights = [4, 3, 2, 3, 5, 2, 1];
        for g in &groups {
            assert_eq!(g.iter().map(|&i| weights[i]).sum::<i64>(), 5);
        }
    }

    #[test]
    fn rejects_unsplittable_weights() {
        assert!(!EqualPartition::new(&[1, 2, 3, 4], 3).unwrap().is_feasible().unwrap());
        // Sum 13 has no divisor other than 1 and 13.
        let problem = EqualPartition::new(&[3, 3, 2, 2, 2, 1], 2).unwrap();
        assert_eq!(problem.target(), None);
        assert!(!problem.is_feasible().unwrap());
        assert!(EqualPartition::new(&[3, 3, 2, 2, 2, 1], 1).unwrap().is_feasible().unwrap());
        // Divisible total, but no group of three fives and a one reaches 8.
        assert!(!EqualPartition::new(&[1, 5, 5, 5], 2).unwrap().is_feasible().unwrap());
    }

    #[test]
    fn bad_configuration_is_an_error() {
        assert!(EqualPartition::new(&[1, 2], 0).is_err());
        assert!(EqualPartition::new(&[1, -2], 1).is_err());
    }

    #[test]
    fn minimum_sessions() {
        let problem = MinCostPartition::with_capacity(&[1, 2, 3], 3).unwrap();
        let best = problem.solve().unwrap().unwrap();
        assert_eq!(best.cost, 2);
        assert_eq!(best.groups.iter().fold(0, |acc, g| acc | g), 0b111);

        let problem = MinCostPartition::with_capacity(&[3, 1, 3, 1, 1], 8).unwrap();
        assert_eq!(problem.min_cost().unwrap(), Some(2));
        let problem = MinCostPartition::with_capacity(&[1, 2, 3, 4, 5], 15).unwrap();
        assert_eq!(problem.min_cost().unwrap(), Some(1));
    }

    #[test]
    fn oversized_item_is_infeasible() {
        let problem = MinCostPartition::with_capacity(&[2, 9], 5).unwrap();
        assert_eq!(problem.solve().unwrap(), None);
    }

    #[test]
    fn custom_group_costs() {
        // Pairs are cheap, singletons expensive, the triple forbidden.
        let costs = vec![0, 5, 5, 1, 5, 1, 1, MinCost::INFINITY];
        let problem = MinCostPartition::new(3, costs).unwrap();
        let best = problem.solve().unwrap().unwrap();
        assert_eq!(best.cost, 6);
        assert_eq!(best.members().concat().len(), 3);
        assert!(MinCostPartition::new(3, vec![0; 7]).is_err());
    }
}
