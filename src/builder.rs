use crate::traits::MaskProblem;
use crate::utils::DEFAULT_STATE_LIMIT;
use crate::MaskEngine;

pub struct MaskEngineBuilder<P: MaskProblem> {
    problem: P,
    state_limit: Option<usize>,
    record_path: bool,
}

impl<P: MaskProblem> MaskEngineBuilder<P> {
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            state_limit: None,
            record_path: true,
        }
    }
    /// Maximum number of `(mask, extra)` keys a run may allocate.
    pub fn state_limit(mut self, limit: usize) -> Self {
        self.state_limit = Some(limit);
        self
    }
    pub fn record_path(mut self, record: bool) -> Self {
        self.record_path = record;
        self
    }
    pub fn build(self) -> MaskEngine<P> {
        let limit = self.state_limit.unwrap_or(DEFAULT_STATE_LIMIT);
        MaskEngine::with_options(self.problem, limit, self.record_path)
    }
}
