//! Counting "good" subsets: non-empty sub-multisets of values in `1..=30`
//! whose product is a product of distinct primes.
//!
//! The universe is the ten primes below 30. Values are visited in order
//! (the auxiliary key), and taking value `v` adds its prime factors to the
//! mask with multiplicity `count[v]`, since any one of its copies may be
//! chosen. Copies of `1` never change the product and multiply the final
//! count by `2^ones`.

use crate::aggregate::{Aggregator, CountMod};
use crate::engine::MaskEngine;
use crate::error::{MaskDpError, Result};
use crate::mask::{Mask, Universe};
use crate::memo::StateKey;
use crate::traits::{MaskProblem, Transition};

const PRIMES: [u64; 10] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29];
const MAX_VALUE: usize = 30;
const FIRST_VALUE: usize = 2;
/// Values 2..=30 occupy indices 0..=28; index 29 means every value was seen.
const VALUES: usize = MAX_VALUE - FIRST_VALUE + 1;

#[derive(Clone, Debug)]
pub struct GoodSubsets {
    primes: Universe,
    counts: [i64; MAX_VALUE + 1],
    factors: [Option<Mask>; MAX_VALUE + 1],
    agg: CountMod,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueChoice {
    Skip,
    Take,
}

/// Prime-factor mask of `v`, or `None` if a square divides it.
fn squarefree_mask(v: u64) -> Option<Mask> {
    let mut rest = v;
    let mut mask = 0;
    for (i, &p) in PRIMES.iter().enumerate() {
        if rest % p == 0 {
            rest /= p;
            if rest % p == 0 {
                return None;
            }
            mask |= 1 << i;
        }
    }
    Some(mask)
}

impl GoodSubsets {
    pub fn new(nums: &[u32]) -> Result<Self> {
        let mut counts = [0i64; MAX_VALUE + 1];
        for &v in nums {
            if v == 0 || v as usize > MAX_VALUE {
                return Err(MaskDpError::InvalidInput(format!(
                    "value {v} outside 1..={MAX_VALUE}"
                )));
            }
            counts[v as usize] += 1;
        }
        let mut factors = [None; MAX_VALUE + 1];
        for (v, slot) in factors.iter_mut().enumerate().skip(FIRST_VALUE) {
            *slot = squarefree_mask(v as u64);
        }
        Ok(Self {
            primes: Universe::new(PRIMES.len())?,
            counts,
            factors,
            agg: CountMod::default(),
        })
    }

    pub fn with_modulus(mut self, modulus: i64) -> Result<Self> {
        self.agg = CountMod::new(modulus)?;
        Ok(self)
    }

    pub fn count(&self) -> Result<i64> {
        let without_ones = MaskEngine::new(self.clone()).value()?;
        let ones = self.agg.pow(2, self.counts[1] as u64);
        self.agg
            .extend(without_ones, ones)
            .ok_or_else(|| MaskDpError::ArithmeticOverflow {
                state: self.initial_state(),
                detail: "scaling by the ones factor".to_string(),
            })
    }

    fn value_at(step: usize) -> usize {
        step + FIRST_VALUE
    }
}

impl MaskProblem for GoodSubsets {
    type Agg = CountMod;
    type Choice = ValueChoice;

    fn universe(&self) -> Universe {
        self.primes
    }

    fn extra_bound(&self) -> usize {
        VALUES + 1
    }

    fn aggregator(&self) -> &CountMod {
        &self.agg
    }

    fn initial_state(&self) -> StateKey {
        StateKey::new(0, 0)
    }

    fn terminal(&self, state: StateKey) -> Option<i64> {
        // The empty product does not count as a good subset.
        (state.extra == VALUES).then_some(i64::from(state.mask != 0))
    }

    fn choices(&self, _state: StateKey, out: &mut Vec<ValueChoice>) {
        out.push(ValueChoice::Skip);
        out.push(ValueChoice::Take);
    }

    fn can_apply(&self, state: StateKey, choice: ValueChoice) -> bool {
        match choice {
            ValueChoice::Skip => true,
            ValueChoice::Take => {
                let v = Self::value_at(state.extra);
                self.counts[v] > 0
                    && self.factors[v].is_some_and(|f| f & state.mask == 0)
            }
        }
    }

    fn apply(&self, state: StateKey, choice: ValueChoice) -> Transition<i64> {
        let next = state.extra + 1;
        match choice {
            ValueChoice::Skip => Transition::new(StateKey::new(state.mask, next), 1),
            ValueChoice::Take => {
                let v = Self::value_at(state.extra);
                let factors = self.factors[v].unwrap_or(0);
                Transition::new(StateKey::new(state.mask | factors, next), self.counts[v])
            }
        }
    }
}
