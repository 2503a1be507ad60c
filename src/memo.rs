//! State keys and the per-run memoization store.
//!
//! A state is a mask plus a small auxiliary index (`extra`): the last visited
//! city, the next element to consider, or `0` when the mask alone identifies
//! the state. Tables are dense over `2^n × extra_bound` keys, sized once per
//! run and dropped with it.

use std::fmt;

use crate::error::{MaskDpError, Result};
use crate::mask::{Mask, Universe};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub mask: Mask,
    pub extra: usize,
}

impl StateKey {
    pub const fn new(mask: Mask, extra: usize) -> Self {
        Self { mask, extra }
    }

    /// A key identified by its mask alone.
    pub const fn bare(mask: Mask) -> Self {
        Self { mask, extra: 0 }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(mask={:#b}, extra={})", self.mask, self.extra)
    }
}

/// Shape of a dense table: which keys exist and where each one lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpace {
    masks: u64,
    extra_bound: usize,
}

impl KeySpace {
    /// Validates `2^n × extra_bound ≤ limit` before anything is allocated.
    pub fn new(universe: &Universe, extra_bound: usize, limit: usize) -> Result<Self> {
        let masks = universe.states();
        let states = masks as u128 * extra_bound.max(1) as u128;
        if states > limit as u128 {
            return Err(MaskDpError::StateSpaceTooLarge { states, limit });
        }
        Ok(Self {
            masks,
            extra_bound: extra_bound.max(1),
        })
    }

    pub fn len(&self) -> usize {
        self.masks as usize * self.extra_bound
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn masks(&self) -> u64 {
        self.masks
    }

    pub fn extra_bound(&self) -> usize {
        self.extra_bound
    }

    #[inline]
    pub fn index(&self, key: StateKey) -> Result<usize> {
        if key.mask >= self.masks || key.extra >= self.extra_bound {
            return Err(MaskDpError::StateOutOfRange {
                key,
                masks: self.masks,
                extra_bound: self.extra_bound,
            });
        }
        Ok(key.mask as usize * self.extra_bound + key.extra)
    }

    /// Every key in sweep order: masks ascending, then `extra` ascending.
    pub fn keys(&self) -> impl Iterator<Item = StateKey> + '_ {
        (0..self.masks)
            .flat_map(move |mask| (0..self.extra_bound).map(move |extra| StateKey::new(mask, extra)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot<V> {
    Vacant,
    Pending,
    Resolved(V),
}

/// Write-once memo for top-down recursion.
///
/// A key moves `Vacant → Pending → Resolved` exactly once. Entering a
/// pending key means the transitions contain a cycle; resolving a key twice
/// means the solver overwrote a finished state. Both are reported as errors.
#[derive(Debug)]
pub struct MemoTable<V> {
    space: KeySpace,
    slots: Vec<Slot<V>>,
    resolved: usize,
}

impl<V: Copy> MemoTable<V> {
    pub fn new(space: KeySpace) -> Self {
        Self {
            space,
            slots: vec![Slot::Vacant; space.len()],
            resolved: 0,
        }
    }

    pub fn space(&self) -> &KeySpace {
        &self.space
    }

    pub fn get(&self, key: StateKey) -> Result<Option<V>> {
        let idx = self.space.index(key)?;
        match self.slots[idx] {
            Slot::Resolved(v) => Ok(Some(v)),
            Slot::Vacant => Ok(None),
            Slot::Pending => Err(MaskDpError::CyclicTransition(key)),
        }
    }

    /// Marks `key` as under evaluation.
    pub fn begin(&mut self, key: StateKey) -> Result<()> {
        let idx = self.space.index(key)?;
        match self.slots[idx] {
            Slot::Vacant => {
                self.slots[idx] = Slot::Pending;
                Ok(())
            }
            Slot::Pending => Err(MaskDpError::CyclicTransition(key)),
            Slot::Resolved(_) => Err(MaskDpError::MemoRewrite(key)),
        }
    }

    pub fn resolve(&mut self, key: StateKey, value: V) -> Result<()> {
        let idx = self.space.index(key)?;
        if let Slot::Resolved(_) = self.slots[idx] {
            return Err(MaskDpError::MemoRewrite(key));
        }
        self.slots[idx] = Slot::Resolved(value);
        self.resolved += 1;
        Ok(())
    }

    /// Number of keys with a final value.
    pub fn resolved(&self) -> usize {
        self.resolved
    }
}

/// Dense table pre-filled with one value, for bottom-up sweeps where every
/// key starts at the aggregator identity.
#[derive(Debug)]
pub struct DenseTable<V> {
    space: KeySpace,
    values: Vec<V>,
}

impl<V: Copy> DenseTable<V> {
    pub fn filled(space: KeySpace, value: V) -> Self {
        Self {
            space,
            values: vec![value; space.len()],
        }
    }

    pub fn space(&self) -> &KeySpace {
        &self.space
    }

    pub fn get(&self, key: StateKey) -> Result<V> {
        Ok(self.values[self.space.index(key)?])
    }

    pub fn set(&mut self, key: StateKey, value: V) -> Result<()> {
        let idx = self.space.index(key)?;
        self.values[idx] = value;
        Ok(())
    }
}

/// Predecessor of each state on its best-known path, for reconstruction.
#[derive(Debug)]
pub struct ParentTable<C> {
    space: KeySpace,
    parents: Vec<Option<(StateKey, C)>>,
}

impl<C: Copy> ParentTable<C> {
    pub fn new(space: KeySpace) -> Self {
        Self {
            space,
            parents: vec![None; space.len()],
        }
    }

    pub fn get(&self, key: StateKey) -> Result<Option<(StateKey, C)>> {
        Ok(self.parents[self.space.index(key)?])
    }

    pub fn set(&mut self, key: StateKey, from: StateKey, choice: C) -> Result<()> {
        let idx = self.space.index(key)?;
        self.parents[idx] = Some((from, choice));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(n: usize, extra: usize) -> KeySpace {
        KeySpace::new(&Universe::new(n).unwrap(), extra, 1 << 20).unwrap()
    }

    #[test]
    fn key_space_rejects_oversized_tables() {
        let u = Universe::new(20).unwrap();
        let err = KeySpace::new(&u, 4, 1 << 21).unwrap_err();
        assert_eq!(
            err,
            MaskDpError::StateSpaceTooLarge {
                states: 1 << 22,
                limit: 1 << 21
            }
        );
    }

    #[test]
    fn keys_follow_sweep_order() {
        let s = space(1, 2);
        let keys: Vec<_> = s.keys().collect();
        assert_eq!(
            keys,
            vec![
                StateKey::new(0, 0),
                StateKey::new(0, 1),
                StateKey::new(1, 0),
                StateKey::new(1, 1)
            ]
        );
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(s.index(*k).unwrap(), i);
        }
    }

    #[test]
    fn out_of_range_keys_are_reported() {
        let s = space(2, 3);
        assert!(matches!(
            s.index(StateKey::new(4, 0)),
            Err(MaskDpError::StateOutOfRange { .. })
        ));
        assert!(s.index(StateKey::new(3, 3)).is_err());
    }

    #[test]
    fn memo_is_write_once() {
        let mut memo = MemoTable::new(space(2, 1));
        let key = StateKey::bare(0b10);
        assert_eq!(memo.get(key), Ok(None));
        memo.begin(key).unwrap();
        assert_eq!(memo.get(key), Err(MaskDpError::CyclicTransition(key)));
        memo.resolve(key, 7i64).unwrap();
        assert_eq!(memo.get(key), Ok(Some(7)));
        assert_eq!(memo.resolve(key, 8), Err(MaskDpError::MemoRewrite(key)));
        assert_eq!(memo.begin(key), Err(MaskDpError::MemoRewrite(key)));
        assert_eq!(memo.resolved(), 1);
    }

    #[test]
    fn parent_table_round_trips() {
        let mut parents = ParentTable::new(space(2, 2));
        let to = StateKey::new(0b11, 1);
        parents.set(to, StateKey::new(0b01, 0), 1usize).unwrap();
        assert_eq!(parents.get(to).unwrap(), Some((StateKey::new(0b01, 0), 1)));
        assert_eq!(parents.get(StateKey::bare(0)).unwrap(), None);
    }
}
