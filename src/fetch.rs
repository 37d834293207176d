//! Fetch lifecycle for the pull request shown on screen.
//!
//! Every fetch attempt is tagged with a generation token. A completion only
//! lands if its token is still the current one, so a slow response from an
//! earlier attempt can never overwrite the state of a later one.

use std::fmt;
use std::sync::Arc;

use crate::types::PullRequest;

/// Identifies the pull request the screen was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrParams {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrParams {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for PrParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Error(String),
    /// `None` when the forge answered without a pull request.
    Success(Option<Arc<PullRequest>>),
}

impl FetchState {
    pub fn resource(&self) -> Option<&PullRequest> {
        match self {
            FetchState::Success(Some(pr)) => Some(pr),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Result of one fetch attempt as reported by the spawned task.
pub type FetchOutcome = std::result::Result<Option<PullRequest>, String>;

#[derive(Debug)]
pub struct FetchController {
    params: PrParams,
    state: FetchState,
    generation: u64,
}

impl FetchController {
    pub fn new(params: PrParams) -> Self {
        Self {
            params,
            state: FetchState::Loading,
            generation: 0,
        }
    }

    pub fn params(&self) -> &PrParams {
        &self.params
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Start a new attempt. Returns the token the attempt must report back with.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = FetchState::Loading;
        tracing::debug!(pr = %self.params, generation = self.generation, "fetch started");
        self.generation
    }

    /// Apply the outcome of an attempt. Returns false when it was dropped as stale.
    pub fn complete(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if generation != self.generation || !self.state.is_loading() {
            tracing::debug!(
                pr = %self.params,
                generation,
                current = self.generation,
                "dropping stale fetch result"
            );
            return false;
        }

        self.state = match outcome {
            Ok(pr) => FetchState::Success(pr.map(Arc::new)),
            Err(cause) => {
                tracing::warn!(pr = %self.params, %cause, "fetch failed");
                FetchState::Error(cause)
            }
        };
        true
    }
}

/// Visibility of the merge confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    Closed,
    Open,
}

impl Confirmation {
    pub fn is_open(&self) -> bool {
        matches!(self, Confirmation::Open)
    }

    pub fn open(&mut self) {
        *self = Confirmation::Open;
    }

    /// Close the dialog. True only if it was open, i.e. the action should run.
    pub fn confirm(&mut self) -> bool {
        let fire = self.is_open();
        *self = Confirmation::Closed;
        fire
    }

    pub fn cancel(&mut self) {
        *self = Confirmation::Closed;
    }

    pub fn reset(&mut self) {
        *self = Confirmation::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_pr;

    fn controller() -> FetchController {
        FetchController::new(PrParams::new("acme", "widgets", 42))
    }

    #[test]
    fn begin_enters_loading_and_bumps_generation() {
        let mut fetch = controller();
        let first = fetch.begin();
        let second = fetch.begin();
        assert!(second > first);
        assert!(fetch.state().is_loading());
    }

    #[test]
    fn success_resolves_loading() {
        let mut fetch = controller();
        let gen = fetch.begin();
        assert!(fetch.complete(gen, Ok(Some(sample_pr(3, 5)))));
        let pr = fetch.state().resource().unwrap();
        assert_eq!(pr.commits.len(), 5);
    }

    #[test]
    fn error_resolves_loading() {
        let mut fetch = controller();
        let gen = fetch.begin();
        assert!(fetch.complete(gen, Err("network down".to_string())));
        assert_eq!(fetch.state(), &FetchState::Error("network down".to_string()));
        assert!(fetch.state().resource().is_none());
    }

    #[test]
    fn stale_result_is_ignored_when_it_arrives_last() {
        let mut fetch = controller();
        let old = fetch.begin();
        let new = fetch.begin();
        assert!(fetch.complete(new, Err("newer".to_string())));
        assert!(!fetch.complete(old, Ok(Some(sample_pr(1, 1)))));
        assert_eq!(fetch.state(), &FetchState::Error("newer".to_string()));
    }

    #[test]
    fn stale_result_is_ignored_when_it_arrives_first() {
        let mut fetch = controller();
        let old = fetch.begin();
        let new = fetch.begin();
        assert!(!fetch.complete(old, Err("older".to_string())));
        assert!(fetch.state().is_loading());
        assert!(fetch.complete(new, Ok(Some(sample_pr(0, 2)))));
        assert_eq!(fetch.state().resource().unwrap().commits.len(), 2);
    }

    #[test]
    fn second_completion_for_same_generation_is_ignored() {
        let mut fetch = controller();
        let gen = fetch.begin();
        assert!(fetch.complete(gen, Ok(Some(sample_pr(0, 0)))));
        assert!(!fetch.complete(gen, Err("late".to_string())));
        assert!(fetch.state().resource().is_some());
    }

    #[test]
    fn success_without_resource_has_nothing_to_show() {
        let mut fetch = controller();
        let gen = fetch.begin();
        assert!(fetch.complete(gen, Ok(None)));
        assert_eq!(fetch.state(), &FetchState::Success(None));
        assert!(fetch.state().resource().is_none());
    }

    #[test]
    fn confirm_after_open_fires_once() {
        let mut dialog = Confirmation::default();
        assert!(!dialog.is_open());
        dialog.open();
        assert!(dialog.is_open());
        assert!(dialog.confirm());
        assert!(!dialog.is_open());
        assert!(!dialog.confirm());
    }

    #[test]
    fn cancel_closes_without_firing() {
        let mut dialog = Confirmation::default();
        dialog.open();
        dialog.cancel();
        assert_eq!(dialog, Confirmation::Closed);
    }

    #[test]
    fn params_display() {
        assert_eq!(PrParams::new("acme", "widgets", 42).to_string(), "acme/widgets#42");
    }
}
