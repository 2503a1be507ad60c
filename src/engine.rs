//! Generic memoized engine over mask-indexed state spaces.
//!
//! Two interchangeable strategies evaluate the same [`MaskProblem`]:
//! 1. Top-down: memoized recursion from the initial state. Only reachable
//!    states are touched, and the recursion depth is bounded by the longest
//!    chain of transitions (at most `n` element additions plus the range of
//!    the auxiliary index).
//! 2. Bottom-up: one ascending sweep over every key `(mask, extra)`, pushing
//!    each state's value into its successors. Successors must be supersets
//!    that come later in the sweep, which guarantees every state is final
//!    before it is read. Only [`PathSemiring`] aggregators qualify.
//!
//! Both strategies allocate their tables per call; nothing survives a run.
//! Either can record a witness path: the sequence of choices leading from
//! the initial state to a terminal state that realises the reported value.

use crate::aggregate::{Aggregator, PathSemiring};
use crate::error::{MaskDpError, Result};
use crate::memo::{DenseTable, KeySpace, MemoTable, ParentTable, StateKey};
use crate::traits::{MaskProblem, ValueOf};
use crate::utils::DEFAULT_STATE_LIMIT;

/// Evaluation order of the state space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    TopDown,
    BottomUp,
}

/// One move on a reconstructed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step<C> {
    pub from: StateKey,
    pub choice: C,
    pub to: StateKey,
}

/// Result of a run: the aggregate value and, when requested, a witness.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<V, C> {
    pub value: V,
    /// Moves from the initial state to `terminal`; empty when no path was
    /// recorded or the value is the aggregator's identity.
    pub path: Vec<Step<C>>,
    pub terminal: Option<StateKey>,
    /// States that received a final value during the run.
    pub states_resolved: usize,
}

impl<V, C: Copy> Solution<V, C> {
    pub fn choices(&self) -> Vec<C> {
        self.path.iter().map(|s| s.choice).collect()
    }
}

/// Solution type produced for problem `P`.
pub type SolutionOf<P> = Solution<ValueOf<P>, <P as MaskProblem>::Choice>;

/// Memoized engine for a problem instance `P`.
///
/// ```
/// use mask_dp::problems::tsp::Tsp;
///
/// let dist = vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ];
/// let tour = Tsp::closed(dist).unwrap().solve().unwrap().unwrap();
/// assert_eq!(tour.cost, 80);
/// assert_eq!(tour.order.first(), Some(&0));
/// ```
pub struct MaskEngine<P: MaskProblem> {
    problem: P,
    state_limit: usize,
    record_path: bool,
}

impl<P: MaskProblem> MaskEngine<P> {
    /// Engine with the default state limit that records witness paths.
    pub fn new(problem: P) -> Self {
        Self::with_options(problem, DEFAULT_STATE_LIMIT, true)
    }

    pub fn with_options(problem: P, state_limit: usize, record_path: bool) -> Self {
        Self {
            problem,
            state_limit,
            record_path,
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn state_limit(&self) -> usize {
        self.state_limit
    }

    pub fn records_path(&self) -> bool {
        self.record_path
    }

    fn key_space(&self) -> Result<KeySpace> {
        KeySpace::new(
            &self.problem.universe(),
            self.problem.extra_bound(),
            self.state_limit,
        )
    }

    /// Value of the initial state, top-down, without a witness.
    pub fn value(&self) -> Result<ValueOf<P>> {
        let mut search = TopDown::new(&self.problem, self.key_space()?);
        search.solve(self.problem.initial_state())
    }

    /// Top-down run.
    pub fn run(&self) -> Result<SolutionOf<P>> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "mask_dp_run",
            strategy = "top_down",
            n = self.problem.universe().len(),
            extra_bound = self.problem.extra_bound()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let start = self.problem.initial_state();
        let mut search = TopDown::new(&self.problem, self.key_space()?);
        let value = search.solve(start)?;
        let found = value != self.problem.aggregator().identity();
        let (path, terminal) = if self.record_path && found {
            search.witness(start)?
        } else {
            (Vec::new(), None)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            resolved = search.memo.resolved(),
            path_len = path.len(),
            value = ?value,
            "top-down search finished"
        );

        Ok(Solution {
            value,
            path,
            terminal,
            states_resolved: search.memo.resolved(),
        })
    }
}

impl<P: MaskProblem> MaskEngine<P>
where
    P::Agg: PathSemiring,
{
    /// Bottom-up run: a single ascending sweep over every key.
    pub fn run_bottom_up(&self) -> Result<SolutionOf<P>> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "mask_dp_run",
            strategy = "bottom_up",
            n = self.problem.universe().len(),
            extra_bound = self.problem.extra_bound()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let problem = &self.problem;
        let agg = problem.aggregator();
        let space = self.key_space()?;
        let start = problem.initial_state();

        let mut table = DenseTable::filled(space, agg.identity());
        let mut parents = self.record_path.then(|| ParentTable::new(space));
        table.set(start, agg.unit())?;

        let mut best = agg.identity();
        let mut best_terminal = None;
        let mut resolved = 0usize;
        let mut choices = Vec::new();

        for key in space.keys() {
            let value = table.get(key)?;
            if value == agg.identity() {
                continue;
            }
            resolved += 1;

            if let Some(w) = problem.terminal(key) {
                let total = extend_at(agg, key, value, w)?;
                if agg.improves(total, best) {
                    best_terminal = Some(key);
                }
                best = agg.combine(best, total);
                continue;
            }

            choices.clear();
            problem.choices(key, &mut choices);
            for &choice in &choices {
                if !problem.can_apply(key, choice) {
                    continue;
                }
                let t = problem.apply(key, choice);
                if !advances(key, t.next) {
                    return Err(MaskDpError::NonMonotoneTransition {
                        from: key,
                        to: t.next,
                    });
                }
                let candidate = extend_at(agg, key, value, t.weight)?;
                let current = table.get(t.next)?;
                if let Some(parents) = parents.as_mut() {
                    if agg.improves(candidate, current) {
                        parents.set(t.next, key, choice)?;
                    }
                }
                table.set(t.next, agg.combine(current, candidate))?;
            }
        }

        let path = match (&parents, best_terminal) {
            (Some(parents), Some(end)) => unwind(parents, start, end)?,
            _ => Vec::new(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            resolved,
            keys = space.len(),
            path_len = path.len(),
            value = ?best,
            "bottom-up sweep finished"
        );

        Ok(Solution {
            value: best,
            path,
            terminal: best_terminal.filter(|_| self.record_path),
            states_resolved: resolved,
        })
    }

    /// Runs with an explicitly chosen strategy.
    pub fn run_with(&self, strategy: Strategy) -> Result<SolutionOf<P>> {
        match strategy {
            Strategy::TopDown => self.run(),
            Strategy::BottomUp => self.run_bottom_up(),
        }
    }
}

struct TopDown<'a, P: MaskProblem> {
    problem: &'a P,
    memo: MemoTable<ValueOf<P>>,
}

impl<'a, P: MaskProblem> TopDown<'a, P> {
    fn new(problem: &'a P, space: KeySpace) -> Self {
        Self {
            problem,
            memo: MemoTable::new(space),
        }
    }

    fn solve(&mut self, state: StateKey) -> Result<ValueOf<P>> {
        if let Some(v) = self.memo.get(state)? {
            return Ok(v);
        }
        self.memo.begin(state)?;

        let problem = self.problem;
        let agg = problem.aggregator();
        let value = match problem.terminal(state) {
            Some(w) => extend_at(agg, state, agg.unit(), w)?,
            None => {
                let mut choices = Vec::new();
                problem.choices(state, &mut choices);
                let mut acc = agg.identity();
                for choice in choices {
                    if !problem.can_apply(state, choice) {
                        continue;
                    }
                    let t = problem.apply(state, choice);
                    let child = self.solve(t.next)?;
                    acc = agg.combine(acc, extend_at(agg, state, child, t.weight)?);
                }
                acc
            }
        };

        self.memo.resolve(state, value)?;
        Ok(value)
    }

    /// Follows, from `start`, the first choice at each state whose
    /// contribution improves on everything before it.
    #[allow(clippy::type_complexity)]
    fn witness(&self, start: StateKey) -> Result<(Vec<Step<P::Choice>>, Option<StateKey>)> {
        let problem = self.problem;
        let agg = problem.aggregator();
        let mut path = Vec::new();
        let mut choices = Vec::new();
        let mut state = start;

        loop {
            if problem.terminal(state).is_some() {
                return Ok((path, Some(state)));
            }
            choices.clear();
            problem.choices(state, &mut choices);

            let mut best = agg.identity();
            let mut pick = None;
            for &choice in &choices {
                if !problem.can_apply(state, choice) {
                    continue;
                }
                let t = problem.apply(state, choice);
                let Some(child) = self.memo.get(t.next)? else {
                    continue;
                };
                let candidate = extend_at(agg, state, child, t.weight)?;
                if agg.improves(candidate, best) {
                    best = candidate;
                    pick = Some((choice, t.next));
                }
            }

            match pick {
                Some((choice, next)) => {
                    path.push(Step {
                        from: state,
                        choice,
                        to: next,
                    });
                    state = next;
                }
                None => return Ok((path, None)),
            }
        }
    }
}

fn extend_at<A: Aggregator>(
    agg: &A,
    state: StateKey,
    value: A::Value,
    weight: A::Weight,
) -> Result<A::Value> {
    agg.extend(value, weight)
        .ok_or_else(|| MaskDpError::ArithmeticOverflow {
            state,
            detail: format!("extending {value:?} by weight {weight:?}"),
        })
}

/// `to` is a superset of `from` that the sweep reaches strictly later.
fn advances(from: StateKey, to: StateKey) -> bool {
    to.mask & from.mask == from.mask && (to.mask != from.mask || to.extra > from.extra)
}

fn unwind<C: Copy>(
    parents: &ParentTable<C>,
    start: StateKey,
    end: StateKey,
) -> Result<Vec<Step<C>>> {
    let mut path = Vec::new();
    let mut key = end;
    while key != start {
        let Some((from, choice)) = parents.get(key)? else {
            break;
        };
        path.push(Step {
            from,
            choice,
            to: key,
        });
        key = from;
    }
    path.reverse();
    Ok(path)
}
