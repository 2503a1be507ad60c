//! Built-in problems for the mask DP engine.
//!
//! Each module implements [`MaskProblem`](crate::traits::MaskProblem) for
//! one family of subset-state searches and wraps it in a small typed API:
//! - [`hats`]         : counting distinct-hat assignments (per-element, count mod M).
//! - [`good_subsets`] : counting square-free products over prime-factor masks.
//! - [`partition`]    : equal-sum `k`-partition and minimum-cost partition (per-submask).
//! - [`distribute`]   : distributing repeated values to customers (per-submask, feasibility).
//! - [`balance`]      : fewest transfers to settle a set of debts (max-profit sweep).
//! - [`tsp`]          : Held–Karp closed tours and open paths (ordered pair).
//! - [`superstring`]  : shortest common superstring via the open path.
//! - [`sos`]          : sum over subsets / supersets and Möbius inversion.
//! - [`game`]         : two-player "can I win" (game aggregation).

pub mod balance;
pub mod distribute;
pub mod game;
pub mod good_subsets;
pub mod hats;
pub mod partition;
pub mod sos;
pub mod superstring;
pub mod tsp;
