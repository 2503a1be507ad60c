//! Bit universe and subset encoding.
//!
//! A universe `{0, …, n-1}` is mapped onto the low `n` bits of a [`Mask`].
//! Every operation here is pure integer arithmetic: masks are values and new
//! masks are always derived, never edited in place.

use crate::error::{MaskDpError, Result};

/// Integer encoding of a subset: bit `i` set ⇔ element `i` is present.
pub type Mask = u64;

/// Integer width used to hold a state mask.
///
/// Two bits of headroom are reserved so that `1 << n` and `full + 1`
/// never overflow the host integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateWidth {
    U32,
    U64,
}

impl StateWidth {
    pub fn bits(self) -> u32 {
        match self {
            StateWidth::U32 => 32,
            StateWidth::U64 => 64,
        }
    }

    /// Largest universe this width accepts.
    pub fn max_elements(self) -> usize {
        self.bits() as usize - 2
    }
}

/// Fixed-size index space `{0, …, n-1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Universe {
    n: u32,
}

impl Universe {
    /// A universe of `n` elements held in 64-bit state.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_width(n, StateWidth::U64)
    }

    pub fn with_width(n: usize, width: StateWidth) -> Result<Self> {
        if n > width.max_elements() {
            return Err(MaskDpError::DomainTooLarge {
                n,
                limit: width.max_elements(),
                width: width.bits(),
            });
        }
        Ok(Self { n: n as u32 })
    }

    /// A universe with one index per element of `elements`.
    pub fn encode<T>(elements: &[T]) -> Result<Self> {
        Self::new(elements.len())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of distinct masks, `2^n`.
    #[inline]
    pub fn states(&self) -> u64 {
        1u64 << self.n
    }

    /// Mask with every element present.
    #[inline]
    pub fn full(&self) -> Mask {
        self.states() - 1
    }

    #[inline]
    pub fn singleton(&self, i: usize) -> Mask {
        debug_assert!(i < self.len(), "element {i} outside universe of {}", self.n);
        1 << i
    }

    #[inline]
    pub fn complement(&self, mask: Mask) -> Mask {
        complement(mask, self.len())
    }

    /// Set elements of `mask`, ascending.
    pub fn bits(&self, mask: Mask) -> Bits {
        Bits(mask & self.full())
    }

    /// Elements of the universe missing from `mask`, ascending.
    pub fn absent(&self, mask: Mask) -> Bits {
        Bits(self.complement(mask))
    }
}

#[inline]
pub fn contains(mask: Mask, i: usize) -> bool {
    (mask >> i) & 1 == 1
}

#[inline]
pub fn insert(mask: Mask, i: usize) -> Mask {
    mask | 1 << i
}

#[inline]
pub fn remove(mask: Mask, i: usize) -> Mask {
    mask & !(1 << i)
}

/// Elements of the `n`-element universe not in `mask`.
#[inline]
pub fn complement(mask: Mask, n: usize) -> Mask {
    !mask & ((1u64 << n) - 1)
}

/// Index of the lowest set bit, if any.
#[inline]
pub fn lowest(mask: Mask) -> Option<usize> {
    (mask != 0).then(|| mask.trailing_zeros() as usize)
}

/// Iterator over set bit indices, lowest first.
#[derive(Clone, Debug)]
pub struct Bits(Mask);

impl Iterator for Bits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = lowest(self.0)?;
        self.0 &= self.0 - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let c = self.0.count_ones() as usize;
        (c, Some(c))
    }
}

impl ExactSizeIterator for Bits {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_universes_wider_than_the_state() {
        assert!(Universe::with_width(30, StateWidth::U32).is_ok());
        assert_eq!(
            Universe::with_width(31, StateWidth::U32),
            Err(MaskDpError::DomainTooLarge {
                n: 31,
                limit: 30,
                width: 32
            })
        );
        assert!(Universe::new(62).is_ok());
        assert!(Universe::new(63).is_err());
    }

    #[test]
    fn membership_and_updates() {
        let m = insert(insert(0, 1), 4);
        assert!(contains(m, 1) && contains(m, 4));
        assert!(!contains(m, 0));
        assert_eq!(remove(m, 4), 0b10);
        assert_eq!(remove(m, 3), m);
        assert_eq!(complement(m, 5), 0b01101);
    }

    #[test]
    fn encode_sizes_from_elements() {
        let u = Universe::encode(&["a", "b", "c"]).unwrap();
        assert_eq!(u.len(), 3);
        assert_eq!(u.full(), 0b111);
        assert_eq!(u.states(), 8);
        assert_eq!(u.absent(0b010).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(u.bits(0b110).len(), 2);
    }

    #[test]
    fn empty_universe_has_one_state() {
        let u = Universe::new(0).unwrap();
        assert!(u.is_empty());
        assert_eq!(u.states(), 1);
        assert_eq!(u.full(), 0);
        assert_eq!(u.absent(0).count(), 0);
    }

    #[test]
    fn lowest_bit() {
        assert_eq!(lowest(0), None);
        assert_eq!(lowest(0b1000), Some(3));
    }
}
