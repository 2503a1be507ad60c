//! Aggregators: the semirings that merge child results.
//!
//! An [`Aggregator`] supplies
//! - `identity`: the value of a state with no legal transition (0 ways,
//!   +∞ cost, `false`),
//! - `unit`: the value carried by the start of a path (1 way, 0 cost, `true`),
//! - `combine`: how sibling contributions merge (sum, min, max, OR, AND),
//! - `extend`: how a transition weight is applied to a child value (product
//!   with a multiplicity, addition of a cost, negation for games).
//!
//! `extend` returns `None` when the arithmetic overflows; the engine turns that
//! into [`MaskDpError::ArithmeticOverflow`](crate::error::MaskDpError) with
//! the offending state attached. Infeasible values are never poisoned by
//! `extend`: an infinite cost stays infinite.

use std::fmt::Debug;

use crate::error::{MaskDpError, Result};

pub trait Aggregator {
    type Value: Copy + PartialEq + Debug;
    type Weight: Copy + Debug;

    fn identity(&self) -> Self::Value;

    fn unit(&self) -> Self::Value;

    fn combine(&self, acc: Self::Value, x: Self::Value) -> Self::Value;

    fn extend(&self, value: Self::Value, weight: Self::Weight) -> Option<Self::Value>;

    /// Whether `candidate` should replace `incumbent` as the recorded witness.
    ///
    /// Must imply `combine(incumbent, candidate) != incumbent`.
    fn improves(&self, candidate: Self::Value, incumbent: Self::Value) -> bool;
}

/// Aggregators whose `extend` composes along a path, so values can be pushed
/// forward from the start state as well as pulled back from terminal states.
///
/// Only these may drive a bottom-up sweep.
pub trait PathSemiring: Aggregator {}

/// Number of ways, modulo a positive modulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountMod {
    modulus: i64,
}

impl CountMod {
    pub const DEFAULT_MODULUS: i64 = 1_000_000_007;

    pub fn new(modulus: i64) -> Result<Self> {
        if modulus <= 0 {
            return Err(MaskDpError::InvalidModulus(modulus));
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> i64 {
        self.modulus
    }

    /// Reduces an arbitrary integer into `[0, modulus)`.
    pub fn reduce(&self, x: i128) -> i64 {
        x.rem_euclid(self.modulus as i128) as i64
    }

    /// `base^exp mod M` by repeated squaring.
    pub fn pow(&self, base: i64, mut exp: u64) -> i64 {
        let m = self.modulus as i128;
        let mut b = self.reduce(base as i128) as i128;
        let mut acc = 1i128 % m;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * b % m;
            }
            b = b * b % m;
            exp >>= 1;
        }
        acc as i64
    }
}

impl Default for CountMod {
    fn default() -> Self {
        Self {
            modulus: Self::DEFAULT_MODULUS,
        }
    }
}

impl Aggregator for CountMod {
    type Value = i64;
    /// Multiplicity of the transition.
    type Weight = i64;

    fn identity(&self) -> i64 {
        0
    }

    fn unit(&self) -> i64 {
        1 % self.modulus
    }

    fn combine(&self, acc: i64, x: i64) -> i64 {
        self.reduce(acc as i128 + x as i128)
    }

    fn extend(&self, value: i64, weight: i64) -> Option<i64> {
        Some(self.reduce(value as i128 * self.reduce(weight as i128) as i128))
    }

    fn improves(&self, candidate: i64, incumbent: i64) -> bool {
        incumbent == 0 && candidate != 0
    }
}

impl PathSemiring for CountMod {}

/// Minimum total cost; [`MinCost::INFINITY`] marks an infeasible state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinCost;

impl MinCost {
    pub const INFINITY: i64 = i64::MAX;

    pub fn finite(value: i64) -> Option<i64> {
        (value != Self::INFINITY).then_some(value)
    }
}

impl Aggregator for MinCost {
    type Value = i64;
    type Weight = i64;

    fn identity(&self) -> i64 {
        Self::INFINITY
    }

    fn unit(&self) -> i64 {
        0
    }

    fn combine(&self, acc: i64, x: i64) -> i64 {
        acc.min(x)
    }

    fn extend(&self, value: i64, weight: i64) -> Option<i64> {
        if value == Self::INFINITY || weight == Self::INFINITY {
            return Some(Self::INFINITY);
        }
        value.checked_add(weight).filter(|&v| v != Self::INFINITY)
    }

    fn improves(&self, candidate: i64, incumbent: i64) -> bool {
        candidate < incumbent
    }
}

impl PathSemiring for MinCost {}

/// Maximum total profit; [`MaxProfit::NEG_INFINITY`] marks an infeasible state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxProfit;

impl MaxProfit {
    pub const NEG_INFINITY: i64 = i64::MIN;

    pub fn finite(value: i64) -> Option<i64> {
        (value != Self::NEG_INFINITY).then_some(value)
    }
}

impl Aggregator for MaxProfit {
    type Value = i64;
    type Weight = i64;

    fn identity(&self) -> i64 {
        Self::NEG_INFINITY
    }

    fn unit(&self) -> i64 {
        0
    }

    fn combine(&self, acc: i64, x: i64) -> i64 {
        acc.max(x)
    }

    fn extend(&self, value: i64, weight: i64) -> Option<i64> {
        if value == Self::NEG_INFINITY || weight == Self::NEG_INFINITY {
            return Some(Self::NEG_INFINITY);
        }
        value
            .checked_add(weight)
            .filter(|&v| v != Self::NEG_INFINITY)
    }

    fn improves(&self, candidate: i64, incumbent: i64) -> bool {
        candidate > incumbent
    }
}

impl PathSemiring for MaxProfit {}

/// Does any sequence of transitions reach a terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reachability;

impl Aggregator for Reachability {
    type Value = bool;
    type Weight = ();

    fn identity(&self) -> bool {
        false
    }

    fn unit(&self) -> bool {
        true
    }

    fn combine(&self, acc: bool, x: bool) -> bool {
        acc || x
    }

    fn extend(&self, value: bool, _weight: ()) -> Option<bool> {
        Some(value)
    }

    fn improves(&self, candidate: bool, incumbent: bool) -> bool {
        candidate && !incumbent
    }
}

impl PathSemiring for Reachability {}

/// Do all transitions out of a state lead to a terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllOf;

impl Aggregator for AllOf {
    type Value = bool;
    type Weight = ();

    fn identity(&self) -> bool {
        true
    }

    fn unit(&self) -> bool {
        true
    }

    fn combine(&self, acc: bool, x: bool) -> bool {
        acc && x
    }

    fn extend(&self, value: bool, _weight: ()) -> Option<bool> {
        Some(value)
    }

    fn improves(&self, candidate: bool, incumbent: bool) -> bool {
        !candidate && incumbent
    }
}

/// Two-player game outcome from the perspective of the player to move.
///
/// A state is a win if any move leads to a state that is a loss for the
/// opponent, so `extend` negates the child's value. `unit` is the outcome
/// for the player who made the last move, which makes a terminal state a
/// loss for the player facing it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Game;

impl Aggregator for Game {
    type Value = bool;
    type Weight = ();

    fn identity(&self) -> bool {
        false
    }

    fn unit(&self) -> bool {
        true
    }

    fn combine(&self, acc: bool, x: bool) -> bool {
        acc || x
    }

    fn extend(&self, value: bool, _weight: ()) -> Option<bool> {
        Some(!value)
    }

    fn improves(&self, candidate: bool, incumbent: bool) -> bool {
        candidate && !incumbent
    }
}
