//! Submask and superset enumeration.
//!
//! Walking the submasks of every mask of an `n`-bit universe with
//! `sub = (sub - 1) & mask` costs `3^n` steps in total, not `4^n`: each
//! element is independently outside the mask, in the mask but not the
//! submask, or in both. Every per-submask transition in this crate goes
//! through the iterators below instead of open-coding the loop.

use crate::mask::{complement, Mask};

/// Submasks of a mask in descending numeric order, `mask` first and `0` last.
#[derive(Clone, Debug)]
pub struct Submasks {
    mask: Mask,
    next: Option<Mask>,
}

impl Submasks {
    pub fn new(mask: Mask) -> Self {
        Self {
            mask,
            next: Some(mask),
        }
    }
}

impl Iterator for Submasks {
    type Item = Mask;

    fn next(&mut self) -> Option<Mask> {
        let sub = self.next?;
        self.next = (sub != 0).then(|| (sub - 1) & self.mask);
        Some(sub)
    }
}

/// Supersets of a mask within an `n`-element universe, ascending, from
/// `mask` itself up to the full mask.
#[derive(Clone, Debug)]
pub struct Supersets {
    mask: Mask,
    full: Mask,
    next: Option<Mask>,
}

impl Supersets {
    pub fn new(mask: Mask, n: usize) -> Self {
        let full = complement(0, n);
        Self {
            mask: mask & full,
            full,
            next: Some(mask & full),
        }
    }
}

impl Iterator for Supersets {
    type Item = Mask;

    fn next(&mut self) -> Option<Mask> {
        let sup = self.next?;
        self.next = (sup != self.full).then(|| (sup + 1) | self.mask);
        Some(sup)
    }
}

/// Calls `visit` once for every `sub ⊆ mask`, descending, including `0`.
#[inline]
pub fn for_each_submask<F: FnMut(Mask)>(mask: Mask, mut visit: F) {
    let mut sub = mask;
    loop {
        visit(sub);
        if sub == 0 {
            break;
        }
        sub = (sub - 1) & mask;
    }
}

/// Calls `visit` once for every superset of `mask` inside the `n`-element
/// universe, in ascending order, `mask` first.
#[inline]
pub fn for_each_superset<F: FnMut(Mask)>(mask: Mask, n: usize, mut visit: F) {
    let full = complement(0, n);
    let mask = mask & full;
    let mut sup = mask;
    loop {
        visit(sup);
        if sup == full {
            break;
        }
        sup = (sup + 1) | mask;
    }
}

/// Submasks of `mask` that contain its lowest set bit.
///
/// Partition DPs use this to fix which group the lowest uncovered element
/// joins, so each unordered partition is produced once.
pub fn anchored_submasks(mask: Mask) -> impl Iterator<Item = Mask> {
    let anchor = mask & mask.wrapping_neg();
    let rest = mask & !anchor;
    Submasks::new(rest).map(move |sub| sub | anchor).filter(move |_| anchor != 0)
}
