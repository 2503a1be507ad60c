//! Bitmask-indexed memoized state-space search.
//!
//! This crate solves dynamic programs whose state is a subset of a small
//! universe (up to about 20–24 elements), optionally paired with a bounded
//! auxiliary index such as "last city visited" or "next value to hand out".
//! A result is an aggregate over all paths through the state space: a count
//! modulo a prime, a minimum or maximum cost, or a feasibility/game outcome.
//!
//! ## Core idea
//! 1. Encode the domain elements as bits of a [`Mask`] via a [`Universe`].
//! 2. Implement [`MaskProblem`] for the instance: the initial state, terminal
//!    states, candidate choices, their legality and their successors.
//! 3. Let [`MaskEngine`] resolve every reachable state exactly once, either
//!    top-down through a write-once memo or bottom-up in one ascending sweep,
//!    and rebuild a witness path when one is wanted.
//!
//! ## Quick start
//! ```
//! use mask_dp::problems::hats::HatAssignment;
//!
//! let likes = vec![vec![3, 5, 1], vec![3, 5]];
//! let ways = HatAssignment::new(&likes).unwrap().count().unwrap();
//! assert_eq!(ways, 4);
//! ```
//!
//! ## Built-in problems
//! The `problems` module contains:
//! - Hat assignment counting and good-subset counting
//! - Equal-sum and minimum-cost partitions
//! - Distribution of repeated values to customers
//! - Optimal account balancing
//! - Travelling salesman tours and paths, and shortest common superstring
//! - Sum over subsets and Möbius inversion
//! - The "can I win" number-picking game
//!
//! Each is a worked example of one transition shape and a template for
//! new problems.

pub mod aggregate;
pub mod builder;
pub mod engine;
pub mod error;
pub mod mask;
pub mod memo;
pub mod problems;
pub mod subsets;
pub mod traits;
pub mod utils;

pub use crate::builder::MaskEngineBuilder;
pub use crate::engine::{MaskEngine, Solution, Strategy};
pub use crate::error::{MaskDpError, Result};
pub use crate::mask::{Mask, Universe};
pub use crate::memo::StateKey;
pub use crate::traits::{Coverage, MaskProblem, Transition};
