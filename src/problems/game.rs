//! "Can I win": two players alternately take unused numbers from
//! `1..=max_choice`; whoever brings the running total to at least `target`
//! wins. Decides whether the first player can force a win.
//!
//! The state is the set of numbers already taken by either player, which
//! also fixes the running total. A state where the total has reached the
//! target is a loss for the player facing it; any other state is a win if
//! some move leads to a loss for the opponent.

use crate::aggregate::Game;
use crate::engine::MaskEngine;
use crate::error::Result;
use crate::mask::Universe;
use crate::memo::StateKey;
use crate::traits::{MaskProblem, Transition};
use crate::utils::subset_sums;

#[derive(Clone, Debug)]
pub struct CanIWin {
    universe: Universe,
    target: i64,
    /// totals[m] = sum of the numbers in m.
    totals: Vec<i64>,
}

impl CanIWin {
    pub fn new(max_choice: u32, target: i64) -> Result<Self> {
        let universe = Universe::new(max_choice as usize)?;
        let numbers: Vec<i64> = (1..=i64::from(max_choice)).collect();
        let totals = subset_sums(&numbers)?;
        Ok(Self {
            universe,
            target,
            totals,
        })
    }

    pub fn max_choice(&self) -> u32 {
        self.universe.len() as u32
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    fn decided(&self) -> Option<bool> {
        if self.target <= 0 {
            return Some(true);
        }
        if self.totals[self.universe.full() as usize] < self.target {
            return Some(false);
        }
        None
    }

    pub fn first_player_wins(&self) -> Result<bool> {
        match self.decided() {
            Some(outcome) => Ok(outcome),
            None => MaskEngine::new(self.clone()).value(),
        }
    }

    /// A number the first player can take to force a win, if one exists.
    /// `None` also when the target is already met before anyone moves.
    pub fn winning_move(&self) -> Result<Option<u32>> {
        if self.decided().is_some() {
            return Ok(None);
        }
        let solution = MaskEngine::new(self.clone()).run()?;
        if !solution.value {
            return Ok(None);
        }
        Ok(solution.path.first().map(|step| step.choice as u32 + 1))
    }
}

impl MaskProblem for CanIWin {
    type Agg = Game;
    type Choice = usize;

    fn universe(&self) -> Universe {
        self.universe
    }

    fn aggregator(&self) -> &Game {
        &Game
    }

    fn initial_state(&self) -> StateKey {
        StateKey::bare(0)
    }

    fn terminal(&self, state: StateKey) -> Option<()> {
        (self.totals[state.mask as usize] >= self.target).then_some(())
    }

    fn choices(&self, state: StateKey, out: &mut Vec<usize>) {
        out.extend(self.universe.absent(state.mask));
    }

    fn apply(&self, state: StateKey, i: usize) -> Transition<()> {
        Transition::new(StateKey::bare(state.mask | self.universe.singleton(i)), ())
    }
}
