//! Phase machine for a pull-request review workflow.
//!
//! A review alternates between local review and an external hand-off until
//! it completes or fails. `completed` and `error` form the settled set that
//! callers poll against.

use crate::machine::{Candidate, Definition, Machine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Idle,
    Reviewing,
    ExternalReview,
    Completed,
    Error,
}

impl ReviewState {
    pub const ALL: [ReviewState; 5] = [
        ReviewState::Idle,
        ReviewState::Reviewing,
        ReviewState::ExternalReview,
        ReviewState::Completed,
        ReviewState::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reviewing => "reviewing",
            // Historic wire spelling, kept camelCase for legacy consumers.
            Self::ExternalReview => "externalReview",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Whether no further automatic progress is expected.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// String-level settled check for callers holding a persisted state name.
/// Total: unknown names are not settled.
pub fn is_settled(name: &str) -> bool {
    matches!(name, "completed" | "error")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewContext {
    /// Failure description supplied by the review driver on `Fail`.
    pub error: Option<String>,
    /// Number of hand-offs to the external reviewer so far.
    pub external_rounds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    Start,
    AwaitExternal,
    ResumeLocal,
    Complete,
    Fail { message: String },
}

fn count_external_round(ctx: &mut ReviewContext, _event: &ReviewEvent, _from: ReviewState) {
    ctx.external_rounds += 1;
}

fn record_failure(ctx: &mut ReviewContext, event: &ReviewEvent, _from: ReviewState) {
    if let ReviewEvent::Fail { message } = event {
        ctx.error = Some(message.clone());
    }
}

/// Machine definition for the review workflow.
pub struct ReviewFlow;

pub type ReviewMachine = Machine<ReviewFlow>;

impl Definition for ReviewFlow {
    type State = ReviewState;
    type Event = ReviewEvent;
    type Context = ReviewContext;

    const INITIAL: ReviewState = ReviewState::Idle;

    fn candidates(
        state: ReviewState,
        event: &ReviewEvent,
    ) -> Vec<Candidate<ReviewState, ReviewEvent, ReviewContext>> {
        use ReviewEvent as E;
        use ReviewState::*;

        match (state, event) {
            (Idle, E::Start) => vec![Candidate::to(Reviewing)],
            (Reviewing, E::AwaitExternal) => {
                vec![Candidate::to(ExternalReview).run(count_external_round)]
            }
            (ExternalReview, E::ResumeLocal) => vec![Candidate::to(Reviewing)],
            (Reviewing | ExternalReview, E::Complete) => vec![Candidate::to(Completed)],
            (Reviewing | ExternalReview, E::Fail { .. }) => {
                vec![Candidate::to(Error).run(record_failure)]
            }
            _ => Vec::new(),
        }
    }

    fn state_name(state: ReviewState) -> &'static str {
        state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_round_trip() {
        let mut review = ReviewMachine::new();
        assert_eq!(review.state(), ReviewState::Idle);

        review.dispatch(&ReviewEvent::Start);
        assert_eq!(review.state(), ReviewState::Reviewing);

        review.dispatch(&ReviewEvent::AwaitExternal);
        assert_eq!(review.state(), ReviewState::ExternalReview);
        assert_eq!(review.context().external_rounds, 1);

        review.dispatch(&ReviewEvent::ResumeLocal);
        assert_eq!(review.state(), ReviewState::Reviewing);

        review.dispatch(&ReviewEvent::Complete);
        assert_eq!(review.state(), ReviewState::Completed);
        assert!(review.state().is_settled());
    }

    #[test]
    fn test_external_rounds_accumulate() {
        let mut review = ReviewMachine::new();
        review.dispatch(&ReviewEvent::Start);

        for _ in 0..3 {
            review.dispatch(&ReviewEvent::AwaitExternal);
            review.dispatch(&ReviewEvent::ResumeLocal);
        }
        assert_eq!(review.context().external_rounds, 3);
    }

    #[test]
    fn test_complete_from_external_review() {
        let mut review = ReviewMachine::new();
        review.dispatch(&ReviewEvent::Start);
        review.dispatch(&ReviewEvent::AwaitExternal);
        review.dispatch(&ReviewEvent::Complete);
        assert_eq!(review.state(), ReviewState::Completed);
    }

    #[test]
    fn test_fail_records_message() {
        let mut review = ReviewMachine::new();
        review.dispatch(&ReviewEvent::Start);
        review.dispatch(&ReviewEvent::Fail {
            message: "review tool crashed".to_string(),
        });
        assert_eq!(review.state(), ReviewState::Error);
        assert_eq!(review.context().error.as_deref(), Some("review tool crashed"));
    }

    #[test]
    fn test_idle_ignores_everything_but_start() {
        let mut review = ReviewMachine::new();
        let before = review.context().clone();

        review.dispatch(&ReviewEvent::AwaitExternal);
        review.dispatch(&ReviewEvent::Complete);
        review.dispatch(&ReviewEvent::Fail {
            message: "x".to_string(),
        });

        assert_eq!(review.state(), ReviewState::Idle);
        assert_eq!(review.context(), &before);
    }

    #[test]
    fn test_settled_set_is_exact() {
        assert!(!ReviewState::Idle.is_settled());
        assert!(!ReviewState::Reviewing.is_settled());
        assert!(!ReviewState::ExternalReview.is_settled());
        assert!(ReviewState::Completed.is_settled());
        assert!(ReviewState::Error.is_settled());
    }

    #[test]
    fn test_string_settled_check() {
        assert!(is_settled("completed"));
        assert!(is_settled("error"));
        assert!(!is_settled("idle"));
        assert!(!is_settled("reviewing"));
        assert!(!is_settled("externalReview"));
        assert!(!is_settled(""));
        assert!(!is_settled("finished"));
    }
}
