//! Held–Karp search for the cheapest tour or Hamiltonian path.
//!
//! State is `(visited, last)`. A closed tour starts at city 0 with
//! `visited = {0}` and pays `dist[last][0]` to return. An open path starts
//! in a virtual position `last = n` with nothing visited, pays an optional
//! per-city start cost for its first city, and pays nothing at the end.
//!
//! Edges of weight [`MinCost::INFINITY`] are missing; the legality
//! predicate never crosses them.

use crate::aggregate::MinCost;
use crate::engine::{MaskEngine, Strategy};
use crate::error::Result;
use crate::mask::Universe;
use crate::memo::StateKey;
use crate::traits::{MaskProblem, Transition};
use crate::utils::expect_len;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourKind {
    /// Returns to city 0.
    Closed,
    /// Ends anywhere.
    Open,
}

#[derive(Clone, Debug)]
pub struct Tsp {
    universe: Universe,
    dist: Vec<Vec<i64>>,
    kind: TourKind,
    start_cost: Option<Vec<i64>>,
}

/// Cities in visiting order and the total cost.
///
/// A closed tour starts at city 0 and its cost includes the return edge,
/// which is not repeated in `order`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    pub cost: i64,
    pub order: Vec<usize>,
}

impl Tsp {
    fn with_kind(dist: Vec<Vec<i64>>, kind: TourKind) -> Result<Self> {
        let universe = Universe::encode(&dist)?;
        for row in &dist {
            expect_len("distance row", dist.len(), row.len())?;
        }
        Ok(Self {
            universe,
            dist,
            kind,
            start_cost: None,
        })
    }

    pub fn closed(dist: Vec<Vec<i64>>) -> Result<Self> {
        Self::with_kind(dist, TourKind::Closed)
    }

    pub fn open(dist: Vec<Vec<i64>>) -> Result<Self> {
        Self::with_kind(dist, TourKind::Open)
    }

    /// Open path whose first city `c` costs `start_cost[c]`.
    pub fn open_with_start_costs(dist: Vec<Vec<i64>>, start_cost: Vec<i64>) -> Result<Self> {
        let mut tsp = Self::with_kind(dist, TourKind::Open)?;
        expect_len("start costs", tsp.cities(), start_cost.len())?;
        tsp.start_cost = Some(start_cost);
        Ok(tsp)
    }

    pub fn cities(&self) -> usize {
        self.universe.len()
    }

    pub fn kind(&self) -> TourKind {
        self.kind
    }

    /// Cheapest tour, or `None` if missing edges make every tour impossible.
    pub fn solve(&self) -> Result<Option<Tour>> {
        self.solve_with(Strategy::BottomUp)
    }

    pub fn solve_with(&self, strategy: Strategy) -> Result<Option<Tour>> {
        if self.kind == TourKind::Closed && self.universe.is_empty() {
            return Ok(Some(Tour {
                cost: 0,
                order: Vec::new(),
            }));
        }
        let solution = MaskEngine::new(self.clone()).run_with(strategy)?;
        let Some(cost) = MinCost::finite(solution.value) else {
            return Ok(None);
        };
        let mut order = Vec::with_capacity(self.cities());
        if self.kind == TourKind::Closed {
            order.push(0);
        }
        order.extend(solution.choices());
        Ok(Some(Tour { cost, order }))
    }

    /// Cost of visiting `order` under this instance's rules, if every edge
    /// exists.
    ///
    /// `None` also when `order` names a city outside the instance.
    pub fn cost_of(&self, order: &[usize]) -> Option<i64> {
        if order.iter().any(|&city| city >= self.cities()) {
            return None;
        }
        let mut total = match (self.kind, order.first(), &self.start_cost) {
            (TourKind::Open, Some(&first), Some(start)) => MinCost::finite(start[first])?,
            _ => 0,
        };
        for pair in order.windows(2) {
            total = total.checked_add(MinCost::finite(self.dist[pair[0]][pair[1]])?)?;
        }
        if self.kind == TourKind::Closed && order.len() > 1 {
            let last = *order.last()?;
            total = total.checked_add(MinCost::finite(self.dist[last][0])?)?;
        }
        Some(total)
    }

    fn edge(&self, last: usize, next: usize) -> i64 {
        if last == self.cities() {
            self.start_cost.as_ref().map_or(0, |s| s[next])
        } else {
            self.dist[last][next]
        }
    }
}

impl MaskProblem for Tsp {
    type Agg = MinCost;
    type Choice = usize;

    fn universe(&self) -> Universe {
        self.universe
    }

    fn extra_bound(&self) -> usize {
        match self.kind {
            TourKind::Closed => self.cities(),
            TourKind::Open => self.cities() + 1,
        }
    }

    fn aggregator(&self) -> &MinCost {
        &MinCost
    }

    fn initial_state(&self) -> StateKey {
        match self.kind {
            TourKind::Closed => StateKey::new(1, 0),
            TourKind::Open => StateKey::new(0, self.cities()),
        }
    }

    fn terminal(&self, state: StateKey) -> Option<i64> {
        if state.mask != self.universe.full() {
            return None;
        }
        match self.kind {
            TourKind::Closed if self.cities() > 1 => Some(self.dist[state.extra][0]),
            _ => Some(0),
        }
    }

    fn choices(&self, state: StateKey, out: &mut Vec<usize>) {
        out.extend(self.universe.absent(state.mask));
    }

    fn can_apply(&self, state: StateKey, next: usize) -> bool {
        self.edge(state.extra, next) != MinCost::INFINITY
    }

    fn apply(&self, state: StateKey, next: usize) -> Transition<i64> {
        Transition::new(
            StateKey::new(state.mask | self.universe.singleton(next), next),
            self.edge(state.extra, next),
        )
    }
}
