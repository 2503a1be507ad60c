//! Error types for the mask DP engine.
//!
//! Configuration errors are raised before any table is allocated. Arithmetic
//! and logic errors abort a run and carry the state that triggered them.
//! Infeasibility is never an error: it is the aggregator's identity value.

use thiserror::Error;

use crate::memo::StateKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskDpError {
    /// The universe does not fit the chosen state width.
    #[error("universe of {n} elements exceeds the {limit}-element limit of {width}-bit state")]
    DomainTooLarge { n: usize, limit: usize, width: u32 },

    /// 2^n × extra_bound exceeds the configured number of memo entries.
    #[error("state space of {states} entries exceeds the limit of {limit}")]
    StateSpaceTooLarge { states: u128, limit: usize },

    #[error("modulus must be positive, got {0}")]
    InvalidModulus(i64),

    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("arithmetic overflow at {state}: {detail}")]
    ArithmeticOverflow { state: StateKey, detail: String },

    /// A memo entry was written twice.
    #[error("state {0} resolved twice")]
    MemoRewrite(StateKey),

    /// A state was re-entered while its own value was still being computed.
    #[error("cyclic transition re-entered {0}")]
    CyclicTransition(StateKey),

    /// Bottom-up sweeps only accept transitions towards larger supersets.
    #[error("transition from {from} to {to} does not move to a later superset state")]
    NonMonotoneTransition { from: StateKey, to: StateKey },

    #[error("state {key} lies outside {masks} masks × {extra_bound} extra values")]
    StateOutOfRange {
        key: StateKey,
        masks: u64,
        extra_bound: usize,
    },
}

pub type Result<T> = std::result::Result<T, MaskDpError>;
