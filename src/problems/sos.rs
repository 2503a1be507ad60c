//! Sum over subsets (zeta transform) and its relatives.
//!
//! For `f` indexed by the masks of an `n`-bit universe, the sweeps here
//! compute in `O(n · 2^n)`:
//! - `F[m] = Σ f[s]` over `s ⊆ m` ([`sum_over_subsets`]),
//! - `F[m] = Σ f[s]` over `s ⊇ m` ([`sum_over_supersets`]),
//! - the inverse of the first ([`mobius_subsets`]),
//! - the first under any path semiring's `combine` ([`fold_over_subsets`]).
//!
//! One pass per bit: after pass `i`, entry `m` aggregates every `s` that
//! agrees with `m` outside bits `0..=i` and is a subset of `m` on them.

use crate::aggregate::PathSemiring;
use crate::error::{MaskDpError, Result};
use crate::mask::Universe;
use crate::memo::StateKey;
use crate::subsets::for_each_submask;

/// Universe whose masks index a table of `len` entries.
fn universe_of(len: usize) -> Result<Universe> {
    if !len.is_power_of_two() {
        return Err(MaskDpError::InvalidInput(format!(
            "table length {len} is not a power of two"
        )));
    }
    Universe::new(len.trailing_zeros() as usize)
}

fn overflow(mask: usize) -> MaskDpError {
    MaskDpError::ArithmeticOverflow {
        state: StateKey::bare(mask as u64),
        detail: "subset sum exceeds i64".to_string(),
    }
}

/// Applies `step(target, source)` for every pair of masks differing in one
/// bit, where `target` has the bit and `source` lacks it.
fn sweep<T>(
    table: &mut [T],
    mut step: impl FnMut(&mut [T], usize, usize) -> Result<()>,
) -> Result<()> {
    let universe = universe_of(table.len())?;
    for bit in 0..universe.len() {
        let b = 1usize << bit;
        for mask in 0..table.len() {
            if mask & b != 0 {
                step(table, mask, mask ^ b)?;
            }
        }
    }
    Ok(())
}

pub fn sum_over_subsets(values: &[i64]) -> Result<Vec<i64>> {
    let mut f = values.to_vec();
    sweep(&mut f, |f, with, without| {
        f[with] = f[with].checked_add(f[without]).ok_or_else(|| overflow(with))?;
        Ok(())
    })?;
    Ok(f)
}

pub fn sum_over_supersets(values: &[i64]) -> Result<Vec<i64>> {
    let mut f = values.to_vec();
    sweep(&mut f, |f, with, without| {
        f[without] = f[without]
            .checked_add(f[with])
            .ok_or_else(|| overflow(without))?;
        Ok(())
    })?;
    Ok(f)
}

/// Recovers `f` from its subset sums.
pub fn mobius_subsets(sums: &[i64]) -> Result<Vec<i64>> {
    let mut f = sums.to_vec();
    sweep(&mut f, |f, with, without| {
        f[with] = f[with].checked_sub(f[without]).ok_or_else(|| overflow(with))?;
        Ok(())
    })?;
    Ok(f)
}

/// `F[m] = combine` of `values[s]` over `s ⊆ m`.
///
/// `combine` must be commutative and associative, which holds for every
/// path semiring in this crate.
pub fn fold_over_subsets<A: PathSemiring>(
    agg: &A,
    values: &[A::Value],
) -> Result<Vec<A::Value>> {
    let mut f = values.to_vec();
    sweep(&mut f, |f, with, without| {
        f[with] = agg.combine(f[with], f[without]);
        Ok(())
    })?;
    Ok(f)
}

/// Same result as [`sum_over_subsets`], by enumerating each mask's
/// submasks directly in `O(3^n)`.
pub fn sum_over_subsets_by_enumeration(values: &[i64]) -> Result<Vec<i64>> {
    universe_of(values.len())?;
    let mut out = Vec::with_capacity(values.len());
    for mask in 0..values.len() {
        let mut acc = Some(0i64);
        for_each_submask(mask as u64, |sub| {
            acc = acc.and_then(|a| a.checked_add(values[sub as usize]));
        });
        out.push(acc.ok_or_else(|| overflow(mask))?);
    }
    Ok(out)
}
