//! Optimal account balancing: the fewest transfers that settle every debt.
//!
//! Only people with a non-zero net balance matter, and they form the
//! universe. A group whose balances sum to zero can always be settled with
//! `size - 1` chained transfers, so the answer is `people - groups` for the
//! largest number of disjoint zero-sum groups. Adding people one at a time,
//! that number is the most times an ordering's running sum returns to zero.

use std::collections::BTreeMap;

use crate::aggregate::MaxProfit;
use crate::engine::MaskEngine;
use crate::error::{MaskDpError, Result};
use crate::mask::Universe;
use crate::memo::StateKey;
use crate::traits::{MaskProblem, Transition};
use crate::utils::subset_sums;

#[derive(Clone, Debug)]
pub struct AccountBalance {
    universe: Universe,
    /// Person id of each universe element.
    people: Vec<usize>,
    /// Net amount owed to each universe element (negative: they owe).
    net: Vec<i64>,
    sums: Vec<i64>,
}

/// `from` pays `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: usize,
    pub to: usize,
    pub amount: i64,
}

impl AccountBalance {
    /// `(from, to, amount)`: `from` paid `amount` on behalf of `to`.
    pub fn from_transactions(transactions: &[(usize, usize, i64)]) -> Result<Self> {
        let mut net: BTreeMap<usize, i64> = BTreeMap::new();
        for &(from, to, amount) in transactions {
            if amount < 0 {
                return Err(MaskDpError::InvalidInput(format!(
                    "negative amount {amount} from {from} to {to}"
                )));
            }
            for (person, delta) in [(from, amount), (to, -amount)] {
                let entry = net.entry(person).or_insert(0);
                *entry = entry.checked_add(delta).ok_or_else(|| {
                    MaskDpError::InvalidInput(format!("balance of person {person} overflows"))
                })?;
            }
        }
        Self::from_net(net.into_iter().collect())
    }

    /// `balances[p]` is what person `p` is owed; must sum to zero.
    pub fn from_balances(balances: &[i64]) -> Result<Self> {
        Self::from_net(balances.iter().copied().enumerate().collect())
    }

    fn from_net(net: Vec<(usize, i64)>) -> Result<Self> {
        let (people, net): (Vec<usize>, Vec<i64>) =
            net.into_iter().filter(|&(_, b)| b != 0).unzip();
        let universe = Universe::encode(&people)?;
        let sums = subset_sums(&net)?;
        if sums[universe.full() as usize] != 0 {
            return Err(MaskDpError::InvalidInput(format!(
                "balances sum to {}, not zero",
                sums[universe.full() as usize]
            )));
        }
        Ok(Self {
            universe,
            people,
            net,
            sums,
        })
    }

    /// People with an unsettled balance.
    pub fn unsettled(&self) -> usize {
        self.universe.len()
    }

    pub fn min_transfers(&self) -> Result<usize> {
        let groups = MaskEngine::new(self.clone()).run_bottom_up()?.value;
        Ok(self.unsettled() - groups as usize)
    }

    /// A settlement using exactly [`min_transfers`](Self::min_transfers)
    /// transfers.
    pub fn settlement(&self) -> Result<Vec<Transfer>> {
        let solution = MaskEngine::new(self.clone()).run_bottom_up()?;
        let mut transfers = Vec::new();
        let mut running = 0i64;
        let mut prev: Option<usize> = None;
        for i in solution.choices() {
            if let Some(p) = prev {
                let (from, to) = if running > 0 { (i, p) } else { (p, i) };
                transfers.push(Transfer {
                    from: self.people[from],
                    to: self.people[to],
                    amount: running.abs(),
                });
            }
            running += self.net[i];
            prev = (running != 0).then_some(i);
        }
        Ok(transfers)
    }
}

impl MaskProblem for AccountBalance {
    type Agg = MaxProfit;
    type Choice = usize;

    fn universe(&self) -> Universe {
        self.universe
    }

    fn aggregator(&self) -> &MaxProfit {
        &MaxProfit
    }

    fn initial_state(&self) -> StateKey {
        StateKey::bare(0)
    }

    fn terminal(&self, state: StateKey) -> Option<i64> {
        (state.mask == self.universe.full()).then_some(0)
    }

    fn choices(&self, state: StateKey, out: &mut Vec<usize>) {
        out.extend(self.universe.absent(state.mask));
    }

    fn apply(&self, state: StateKey, i: usize) -> Transition<i64> {
        let next = state.mask | self.universe.singleton(i);
        let closes = self.sums[next as usize] == 0;
        Transition::new(StateKey::bare(next), i64::from(closes))
    }
}
