//! Assorted utilities and helpers shared by the built-in problems.

use crate::error::{MaskDpError, Result};
use crate::mask::Universe;
use crate::memo::StateKey;

/// Default cap on `2^n × extra_bound` memo entries (64 Mi keys).
///
/// Enough for a 20-element per-element sweep with a 64-wide auxiliary index,
/// or a 21-city tour.
pub const DEFAULT_STATE_LIMIT: usize = 1 << 26;

/// Sum of `weights[i]` over the elements of every mask, indexed by mask.
///
/// Built incrementally from the lowest set bit, so each entry costs one
/// checked addition. The table has `2^n` entries and is bounded by
/// [`DEFAULT_STATE_LIMIT`].
pub fn subset_sums(weights: &[i64]) -> Result<Vec<i64>> {
    let universe = Universe::encode(weights)?;
    if universe.states() > DEFAULT_STATE_LIMIT as u64 {
        return Err(MaskDpError::StateSpaceTooLarge {
            states: universe.states() as u128,
            limit: DEFAULT_STATE_LIMIT,
        });
    }
    let states = universe.states() as usize;
    let mut sums = vec![0i64; states];
    for mask in 1..states {
        let low = mask.trailing_zeros() as usize;
        let rest = mask & (mask - 1);
        sums[mask] = sums[rest].checked_add(weights[low]).ok_or_else(|| {
            MaskDpError::ArithmeticOverflow {
                state: StateKey::bare(mask as u64),
                detail: format!("sum of weights exceeds i64 when adding element {low}"),
            }
        })?;
    }
    Ok(sums)
}

/// Fails with [`MaskDpError::LengthMismatch`] unless `found == expected`.
pub fn expect_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(MaskDpError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_every_mask() {
        let sums = subset_sums(&[1, 2, 4]).unwrap();
        assert_eq!(sums, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn empty_weights_have_one_empty_sum() {
        assert_eq!(subset_sums(&[]).unwrap(), vec![0]);
    }

    #[test]
    fn overflow_is_reported_with_the_mask() {
        let err = subset_sums(&[i64::MAX, 1]).unwrap_err();
        assert!(matches!(
            err,
            MaskDpError::ArithmeticOverflow { state, .. } if state.mask == 0b11
        ));
    }

    #[test]
    fn length_check() {
        assert!(expect_len("costs", 3, 3).is_ok());
        assert_eq!(
            expect_len("costs", 3, 2),
            Err(MaskDpError::LengthMismatch {
                what: "costs",
                expected: 3,
                found: 2
            })
        );
    }
}
