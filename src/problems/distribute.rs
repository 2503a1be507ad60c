//! Distributing repeated values to customers who each want an exact
//! quantity of a single value.
//!
//! Customers form the universe; the auxiliary key is the index of the next
//! distinct value to hand out. One step gives a copy-count of that value to
//! a whole group of unserved customers at once (a submask of the
//! complement), or skips the value with the empty group.

use std::collections::BTreeMap;

use crate::aggregate::Reachability;
use crate::engine::MaskEngine;
use crate::error::{MaskDpError, Result};
use crate::mask::{Mask, Universe};
use crate::memo::StateKey;
use crate::subsets::Submasks;
use crate::traits::{Coverage, MaskProblem, Transition};
use crate::utils::subset_sums;

#[derive(Clone, Debug)]
pub struct Distribution {
    customers: Universe,
    /// Distinct values with their multiplicities, most frequent first.
    stock: Vec<(i64, i64)>,
    /// need[g] = total quantity wanted by customer group g.
    need: Vec<i64>,
    coverage: Coverage,
}

impl Distribution {
    /// `nums` is the multiset on hand; `quantity[c]` is customer `c`'s order.
    pub fn new(nums: &[i64], quantity: &[i64]) -> Result<Self> {
        let mut counts = BTreeMap::new();
        for &v in nums {
            *counts.entry(v).or_insert(0i64) += 1;
        }
        Self::from_counts(counts.into_iter().collect(), quantity)
    }

    /// `stock` pairs each distinct value with how many copies are on hand.
    pub fn from_counts(stock: Vec<(i64, i64)>, quantity: &[i64]) -> Result<Self> {
        if let Some(q) = quantity.iter().find(|&&q| q <= 0) {
            return Err(MaskDpError::InvalidInput(format!(
                "quantities must be positive, got {q}"
            )));
        }
        if let Some((v, c)) = stock.iter().find(|(_, c)| *c < 0) {
            return Err(MaskDpError::InvalidInput(format!(
                "value {v} has negative count {c}"
            )));
        }
        let customers = Universe::encode(quantity)?;
        let need = subset_sums(quantity)?;
        let mut stock: Vec<_> = stock.into_iter().filter(|&(_, c)| c > 0).collect();
        stock.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        // Every customer is served from one value, so at most `m` values are
        // ever used, and the `m` largest stocks dominate the rest.
        stock.truncate(customers.len());
        Ok(Self {
            customers,
            stock,
            need,
            coverage: Coverage::All,
        })
    }

    pub fn with_coverage(mut self, coverage: Coverage) -> Result<Self> {
        if let Coverage::AtLeast(k) = coverage {
            if k > self.customers.len() {
                return Err(MaskDpError::InvalidInput(format!(
                    "cannot serve {k} of {} customers",
                    self.customers.len()
                )));
            }
        }
        self.coverage = coverage;
        Ok(self)
    }

    pub fn is_possible(&self) -> Result<bool> {
        MaskEngine::new(self.clone()).run_bottom_up().map(|s| s.value)
    }

    /// The value each customer receives (`None` for customers left out
    /// under partial coverage), or `None` if no distribution exists.
    pub fn allocation(&self) -> Result<Option<Vec<Option<i64>>>> {
        let solution = MaskEngine::new(self.clone()).run()?;
        if !solution.value {
            return Ok(None);
        }
        let mut served = vec![None; self.customers.len()];
        for step in &solution.path {
            let (value, _) = self.stock[step.from.extra];
            for c in self.customers.bits(step.choice) {
                served[c] = Some(value);
            }
        }
        Ok(Some(served))
    }
}

impl MaskProblem for Distribution {
    type Agg = Reachability;
    type Choice = Mask;

    fn universe(&self) -> Universe {
        self.customers
    }

    fn extra_bound(&self) -> usize {
        self.stock.len() + 1
    }

    fn aggregator(&self) -> &Reachability {
        &Reachability
    }

    fn initial_state(&self) -> StateKey {
        StateKey::new(0, 0)
    }

    fn terminal(&self, state: StateKey) -> Option<()> {
        self.coverage
            .is_met(&self.customers, state.mask)
            .then_some(())
    }

    fn choices(&self, state: StateKey, out: &mut Vec<Mask>) {
        if state.extra < self.stock.len() {
            out.extend(Submasks::new(self.customers.complement(state.mask)));
        }
    }

    fn can_apply(&self, state: StateKey, group: Mask) -> bool {
        self.need[group as usize] <= self.stock[state.extra].1
    }

    fn apply(&self, state: StateKey, group: Mask) -> Transition<()> {
        Transition::new(StateKey::new(state.mask | group, state.extra + 1), ())
    }
}
