//! Counting ways to give people distinct hats they like.
//!
//! Hats are the outer dimension: the state is `(people already wearing a
//! hat, next hat to consider)`, and each hat is either skipped or given to
//! one person who likes it and has none yet. People form the universe, so
//! the table is `2^people × (hats + 1)` rather than exponential in hats.

use crate::aggregate::CountMod;
use crate::engine::MaskEngine;
use crate::error::{MaskDpError, Result};
use crate::mask::{Mask, Universe};
use crate::memo::{KeySpace, StateKey};
use crate::traits::{Coverage, MaskProblem, Transition};
use crate::utils::DEFAULT_STATE_LIMIT;

#[derive(Clone, Debug)]
pub struct HatAssignment {
    people: Universe,
    /// likers[h] = people who like hat h.
    likers: Vec<Mask>,
    agg: CountMod,
    coverage: Coverage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatChoice {
    Skip,
    Give(usize),
}

/// One person wearing one hat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fitting {
    pub person: usize,
    pub hat: usize,
}

impl HatAssignment {
    /// `preferences[p]` lists the hat ids person `p` likes.
    pub fn new(preferences: &[Vec<usize>]) -> Result<Self> {
        let people = Universe::encode(preferences)?;
        let hats = preferences
            .iter()
            .flatten()
            .max()
            .map_or(Some(0), |&h| h.checked_add(1))
            .ok_or_else(|| MaskDpError::InvalidInput("hat id usize::MAX is out of range".into()))?;
        // One auxiliary slot per hat plus the end marker.
        let bound = hats.checked_add(1).ok_or_else(|| {
            MaskDpError::InvalidInput(format!("{hats} hats overflow the state index"))
        })?;
        KeySpace::new(&people, bound, DEFAULT_STATE_LIMIT)?;
        let mut likers = vec![0; hats];
        for (person, liked) in preferences.iter().enumerate() {
            for &hat in liked {
                likers[hat] |= people.singleton(person);
            }
        }
        Ok(Self {
            people,
            likers,
            agg: CountMod::default(),
            coverage: Coverage::All,
        })
    }

    pub fn with_modulus(mut self, modulus: i64) -> Result<Self> {
        self.agg = CountMod::new(modulus)?;
        Ok(self)
    }

    /// Counts assignments where only `coverage` of the people need a hat.
    pub fn with_coverage(mut self, coverage: Coverage) -> Result<Self> {
        if let Coverage::AtLeast(k) = coverage {
            if k > self.people.len() {
                return Err(MaskDpError::InvalidInput(format!(
                    "cannot cover {k} of {} people",
                    self.people.len()
                )));
            }
        }
        self.coverage = coverage;
        Ok(self)
    }

    pub fn hats(&self) -> usize {
        self.likers.len()
    }

    /// Number of valid assignments modulo the configured modulus.
    pub fn count(&self) -> Result<i64> {
        MaskEngine::new(self.clone()).value()
    }

    /// One valid assignment, or `None` if there is none.
    pub fn assignment(&self) -> Result<Option<Vec<Fitting>>> {
        let solution = MaskEngine::new(self.clone()).run()?;
        if solution.terminal.is_none() {
            return Ok(None);
        }
        let fittings = solution
            .path
            .iter()
            .filter_map(|step| match step.choice {
                HatChoice::Give(person) => Some(Fitting {
                    person,
                    hat: step.from.extra,
                }),
                HatChoice::Skip => None,
            })
            .collect();
        Ok(Some(fittings))
    }
}

impl MaskProblem for HatAssignment {
    type Agg = CountMod;
    type Choice = HatChoice;

    fn universe(&self) -> Universe {
        self.people
    }

    fn extra_bound(&self) -> usize {
        self.hats() + 1
    }

    fn aggregator(&self) -> &CountMod {
        &self.agg
    }

    fn initial_state(&self) -> StateKey {
        StateKey::new(0, 0)
    }

    fn terminal(&self, state: StateKey) -> Option<i64> {
        // Once everyone wears a hat the remaining hats can only be skipped.
        if state.mask == self.people.full() {
            return Some(1);
        }
        if state.extra == self.hats() {
            return Some(i64::from(self.coverage.is_met(&self.people, state.mask)));
        }
        None
    }

    fn choices(&self, state: StateKey, out: &mut Vec<HatChoice>) {
        out.push(HatChoice::Skip);
        let free = self.likers[state.extra] & !state.mask;
        out.extend(self.people.bits(free).map(HatChoice::Give));
    }

    fn apply(&self, state: StateKey, choice: HatChoice) -> Transition<i64> {
        let mask = match choice {
            HatChoice::Skip => state.mask,
            HatChoice::Give(person) => state.mask | self.people.singleton(person),
        };
        Transition::new(StateKey::new(mask, state.extra + 1), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_hat_ids_are_rejected_before_allocating() {
        assert!(matches!(
            HatAssignment::new(&[vec![usize::MAX]]),
            Err(MaskDpError::InvalidInput(_))
        ));
        assert!(matches!(
            HatAssignment::new(&[vec![1usize << 40]]),
            Err(MaskDpError::StateSpaceTooLarge { limit: DEFAULT_STATE_LIMIT, .. })
        ));
        assert!(HatAssignment::new(&[vec![1000], vec![3]]).is_ok());
    }

    #[test]
    fn single_forced_assignment() {
        let prefs = vec![vec![3, 4], vec![4, 5], vec![5]];
        let problem = HatAssignment::new(&prefs).unwrap();
        assert_eq!(problem.count().unwrap(), 1);
        let fittings = problem.assignment().unwrap().unwrap();
        assert_eq!(
            fittings,
            vec![
                Fitting { person: 0, hat: 3 },
                Fitting { person: 1, hat: 4 },
                Fitting { person: 2, hat: 5 }
            ]
        );
    }

    #[test]
    fn shared_preferences() {
        let prefs = vec![vec![3, 5, 1], vec![3, 5]];
        assert_eq!(HatAssignment::new(&prefs).unwrap().count().unwrap(), 4);

        let prefs = vec![vec![1, 2, 3, 4]; 4];
        assert_eq!(HatAssignment::new(&prefs).unwrap().count().unwrap(), 24);

        let prefs = vec![vec![1, 2, 3], vec![2, 3, 5, 6], vec![1, 3, 7, 9], vec![1, 8, 9], vec![2, 5, 7]];
        assert_eq!(HatAssignment::new(&prefs).unwrap().count().unwrap(), 111);
    }

    #[test]
    fn impossible_assignment_counts_zero() {
        let prefs = vec![vec![1], vec![1]];
        let problem = HatAssignment::new(&prefs).unwrap();
        assert_eq!(problem.count().unwrap(), 0);
        assert_eq!(problem.assignment().unwrap(), None);
    }

    #[test]
    fn at_least_coverage_counts_partial_assignments() {
        // Either person alone, or both with distinct hats: 1 + 1 + 0.
        let prefs = vec![vec![1], vec![1]];
        let problem = HatAssignment::new(&prefs)
            .unwrap()
            .with_coverage(Coverage::AtLeast(1))
            .unwrap();
        assert_eq!(problem.count().unwrap(), 2);
        assert!(HatAssignment::new(&prefs)
            .unwrap()
            .with_coverage(Coverage::AtLeast(3))
            .is_err());
    }

    #[test]
    fn small_modulus_wraps() {
        let prefs = vec![vec![1, 2, 3, 4]; 4];
        let problem = HatAssignment::new(&prefs).unwrap().with_modulus(7).unwrap();
        assert_eq!(problem.count().unwrap(), 24 % 7);
        assert!(HatAssignment::new(&prefs).unwrap().with_modulus(0).is_err());
    }

    #[test]
    fn nobody_needs_a_hat() {
        let problem = HatAssignment::new(&[]).unwrap();
        assert_eq!(problem.count().unwrap(), 1);
    }
}
