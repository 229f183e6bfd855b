//! Lifecycle machine for a roadmap feature.
//!
//! A feature moves between review, planning, active work, and done. `Done`
//! is reachable from every other state (a linked task can resolve at any
//! planning stage) and is reversible: the machine remembers the state it
//! left on the way in and `Revert` returns there.

use crate::machine::{Candidate, Definition, Machine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureState {
    UnderReview,
    Planned,
    InProgress,
    Done,
}

impl FeatureState {
    /// Every state this machine can occupy. Used by the status translation
    /// boundary checks.
    pub const ALL: [FeatureState; 4] = [
        FeatureState::UnderReview,
        FeatureState::Planned,
        FeatureState::InProgress,
        FeatureState::Done,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::UnderReview => "under_review",
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

/// How a linked task resolved when the feature entered `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Deleted,
    Archived,
}

/// Auxiliary data carried alongside the feature state.
///
/// `previous_status` is `Some` only while the machine sits in `Done`; every
/// transition out of `Done` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureContext {
    pub linked_spec_id: Option<String>,
    pub task_outcome: Option<TaskOutcome>,
    pub previous_status: Option<FeatureState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureEvent {
    Plan,
    StartProgress,
    LinkSpec { spec_id: String },
    MarkDone,
    TaskCompleted,
    TaskDeleted,
    TaskArchived,
    MoveToReview,
    Revert,
}

fn record_previous(ctx: &mut FeatureContext, _event: &FeatureEvent, from: FeatureState) {
    ctx.previous_status = Some(from);
}

fn record_outcome(ctx: &mut FeatureContext, event: &FeatureEvent, _from: FeatureState) {
    ctx.task_outcome = match event {
        FeatureEvent::TaskCompleted => Some(TaskOutcome::Completed),
        FeatureEvent::TaskDeleted => Some(TaskOutcome::Deleted),
        FeatureEvent::TaskArchived => Some(TaskOutcome::Archived),
        _ => ctx.task_outcome,
    };
}

fn link_spec(ctx: &mut FeatureContext, event: &FeatureEvent, _from: FeatureState) {
    if let FeatureEvent::LinkSpec { spec_id } = event {
        ctx.linked_spec_id = Some(spec_id.clone());
    }
}

fn clear_done_memory(ctx: &mut FeatureContext, _event: &FeatureEvent, _from: FeatureState) {
    ctx.task_outcome = None;
    ctx.previous_status = None;
}

fn was_in_progress(ctx: &FeatureContext, _event: &FeatureEvent) -> bool {
    ctx.previous_status == Some(FeatureState::InProgress)
}

fn was_planned(ctx: &FeatureContext, _event: &FeatureEvent) -> bool {
    ctx.previous_status == Some(FeatureState::Planned)
}

/// Machine definition for the feature lifecycle.
pub struct FeatureLifecycle;

pub type FeatureMachine = Machine<FeatureLifecycle>;

impl Definition for FeatureLifecycle {
    type State = FeatureState;
    type Event = FeatureEvent;
    type Context = FeatureContext;

    const INITIAL: FeatureState = FeatureState::UnderReview;

    fn candidates(
        state: FeatureState,
        event: &FeatureEvent,
    ) -> Vec<Candidate<FeatureState, FeatureEvent, FeatureContext>> {
        use FeatureEvent as E;
        use FeatureState::*;

        match (state, event) {
            (UnderReview, E::Plan) => vec![Candidate::to(Planned)],
            (Done, E::Plan) => vec![Candidate::to(Planned).run(clear_done_memory)],

            (UnderReview | Planned, E::StartProgress) => vec![Candidate::to(InProgress)],

            // Linking a spec pulls the feature into active work; from
            // InProgress it only records the id.
            (UnderReview | Planned | InProgress, E::LinkSpec { .. }) => {
                vec![Candidate::to(InProgress).run(link_spec)]
            }

            (UnderReview | Planned | InProgress, E::MarkDone) => {
                vec![Candidate::to(Done).run(record_previous)]
            }
            (UnderReview | Planned | InProgress, E::TaskCompleted | E::TaskDeleted | E::TaskArchived) => {
                vec![
                    Candidate::to(Done)
                        .run(record_previous)
                        .run(record_outcome),
                ]
            }

            // Re-entering Done updates the task outcome but must not
            // overwrite the remembered previous status.
            (Done, E::MarkDone) => vec![Candidate::to(Done)],
            (Done, E::TaskCompleted | E::TaskDeleted | E::TaskArchived) => {
                vec![Candidate::to(Done).run(record_outcome)]
            }

            (InProgress | Done, E::MoveToReview) => {
                vec![Candidate::to(UnderReview).run(clear_done_memory)]
            }

            // Guard order encodes seniority: in_progress beats planned
            // beats the under_review default.
            (Done, E::Revert) => vec![
                Candidate::to(InProgress)
                    .with_guard(was_in_progress)
                    .run(clear_done_memory),
                Candidate::to(Planned)
                    .with_guard(was_planned)
                    .run(clear_done_memory),
                Candidate::to(UnderReview).run(clear_done_memory),
            ],

            _ => Vec::new(),
        }
    }

    fn state_name(state: FeatureState) -> &'static str {
        state.name()
    }
}
