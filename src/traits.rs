//! Core trait definitions for mask-indexed state-space problems.
//!
//! To run a problem on [`MaskEngine`](crate::engine::MaskEngine), implement
//! [`MaskProblem`] for a struct that captures the instance (weights, costs,
//! preference masks, …).
//!
//! The trait encodes the transition rule of the search:
//! - State space: keys `(mask, extra)` with `mask < 2^n` and `extra < extra_bound`.
//! - Start: a single initial state.
//! - Terminal states: states whose path ends there, with a closing weight.
//! - Choices: the candidate moves out of a state, a legality predicate, and
//!   the successor state plus transition weight for each legal move.
//! - Aggregation: the semiring that merges the values of all legal moves.
//!
//! Choices come in a few recurring shapes, all expressed through the same
//! trait:
//! - per-element: add one unset bit (assignment counting, account balancing),
//! - per-submask: add a whole submask of the complement in one step
//!   (distribution to customers, minimum-cost partitions),
//! - ordered-pair: state is `(visited, last)` and a choice moves to an
//!   unvisited index (tours, superstring assembly),
//! - game: state is the set of moves already played and aggregation is
//!   [`Game`](crate::aggregate::Game).

use std::fmt::Debug;

use crate::aggregate::Aggregator;
use crate::mask::{Mask, Universe};
use crate::memo::StateKey;

/// Value type of a problem's aggregator.
pub type ValueOf<P> = <<P as MaskProblem>::Agg as Aggregator>::Value;
/// Weight type of a problem's aggregator.
pub type WeightOf<P> = <<P as MaskProblem>::Agg as Aggregator>::Weight;

/// Successor of a legal choice and the weight the move contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<W> {
    pub next: StateKey,
    pub weight: W,
}

impl<W> Transition<W> {
    pub fn new(next: StateKey, weight: W) -> Self {
        Self { next, weight }
    }
}

/// Trait for a bitmask state-space problem instance.
///
/// Semantics, for the value `v(s)` of a state `s`:
/// - if `terminal(s) == Some(w)`, then `v(s) = extend(unit, w)`;
/// - otherwise `v(s) = combine` over legal choices `c` of
///   `extend(v(next), weight)`, and the identity when there is none.
///
/// The answer is `v(initial_state())`.
pub trait MaskProblem {
    type Agg: Aggregator;

    /// A move out of a state: an element index, a submask, a next city, …
    type Choice: Copy + Debug;

    fn universe(&self) -> Universe;

    /// Number of values the auxiliary key component can take.
    fn extra_bound(&self) -> usize {
        1
    }

    fn aggregator(&self) -> &Self::Agg;

    fn initial_state(&self) -> StateKey;

    /// `Some(w)` if paths end at `state`, closing with weight `w`.
    ///
    /// Terminal states are never expanded.
    fn terminal(&self, state: StateKey) -> Option<WeightOf<Self>>;

    /// Pushes candidate choices at `state` into `out` (cleared by the caller).
    fn choices(&self, state: StateKey, out: &mut Vec<Self::Choice>);

    /// Legality predicate; candidates failing it are skipped.
    fn can_apply(&self, _state: StateKey, _choice: Self::Choice) -> bool {
        true
    }

    fn apply(&self, state: StateKey, choice: Self::Choice) -> Transition<WeightOf<Self>>;
}

/// When a partial selection counts as complete.
///
/// `All` requires every element of the universe to be covered; `AtLeast(k)`
/// accepts any selection covering `k` or more elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Coverage {
    #[default]
    All,
    AtLeast(usize),
}

impl Coverage {
    pub fn is_met(&self, universe: &Universe, mask: Mask) -> bool {
        match *self {
            Coverage::All => mask & universe.full() == universe.full(),
            Coverage::AtLeast(k) => (mask & universe.full()).count_ones() as usize >= k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_boundaries() {
        let u = Universe::new(3).unwrap();
        assert!(Coverage::All.is_met(&u, 0b111));
        assert!(!Coverage::All.is_met(&u, 0b101));
        assert!(Coverage::AtLeast(2).is_met(&u, 0b101));
        assert!(!Coverage::AtLeast(2).is_met(&u, 0b100));
        assert!(Coverage::AtLeast(0).is_met(&u, 0));
    }
}
