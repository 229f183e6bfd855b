//! Phase machine for a one-shot roadmap generation run.
//!
//! The pipeline progresses linearly through analysis, discovery, and
//! generation; any working stage can fail into `Error`. `Complete` and
//! `Error` are settled: a fresh run gets a fresh machine instance.

use crate::machine::{Candidate, Definition, Machine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Analyzing,
    Discovering,
    Generating,
    Complete,
    Error,
}

impl GenerationState {
    pub const ALL: [GenerationState; 6] = [
        GenerationState::Idle,
        GenerationState::Analyzing,
        GenerationState::Discovering,
        GenerationState::Generating,
        GenerationState::Complete,
        GenerationState::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Discovering => "discovering",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// A settled run expects no further work; the pipeline driver stops
    /// polling once it sees one of these.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationContext {
    /// Failure description supplied by the pipeline driver on `Fail`.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Start,
    AnalysisComplete,
    DiscoveryComplete,
    GenerationComplete,
    Fail { message: String },
}

fn record_failure(ctx: &mut GenerationContext, event: &GenerationEvent, _from: GenerationState) {
    if let GenerationEvent::Fail { message } = event {
        ctx.error = Some(message.clone());
    }
}

/// Machine definition for the generation pipeline.
pub struct GenerationPipeline;

pub type GenerationMachine = Machine<GenerationPipeline>;

impl Definition for GenerationPipeline {
    type State = GenerationState;
    type Event = GenerationEvent;
    type Context = GenerationContext;

    const INITIAL: GenerationState = GenerationState::Idle;

    fn candidates(
        state: GenerationState,
        event: &GenerationEvent,
    ) -> Vec<Candidate<GenerationState, GenerationEvent, GenerationContext>> {
        use GenerationEvent as E;
        use GenerationState::*;

        match (state, event) {
            (Idle, E::Start) => vec![Candidate::to(Analyzing)],
            (Analyzing, E::AnalysisComplete) => vec![Candidate::to(Discovering)],
            (Discovering, E::DiscoveryComplete) => vec![Candidate::to(Generating)],
            (Generating, E::GenerationComplete) => vec![Candidate::to(Complete)],
            (Analyzing | Discovering | Generating, E::Fail { .. }) => {
                vec![Candidate::to(Error).run(record_failure)]
            }
            _ => Vec::new(),
        }
    }

    fn state_name(state: GenerationState) -> &'static str {
        state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline_run() {
        let mut run = GenerationMachine::new();
        assert_eq!(run.state(), GenerationState::Idle);

        run.dispatch(&GenerationEvent::Start);
        assert_eq!(run.state(), GenerationState::Analyzing);

        run.dispatch(&GenerationEvent::AnalysisComplete);
        assert_eq!(run.state(), GenerationState::Discovering);

        run.dispatch(&GenerationEvent::DiscoveryComplete);
        assert_eq!(run.state(), GenerationState::Generating);

        run.dispatch(&GenerationEvent::GenerationComplete);
        assert_eq!(run.state(), GenerationState::Complete);
        assert!(run.state().is_settled());
        assert_eq!(run.context().error, None);
    }

    #[test]
    fn test_any_working_stage_can_fail() {
        for start in [
            GenerationState::Analyzing,
            GenerationState::Discovering,
            GenerationState::Generating,
        ] {
            let mut run = GenerationMachine::with_state(start);
            run.dispatch(&GenerationEvent::Fail {
                message: "agent exited non-zero".to_string(),
            });
            assert_eq!(run.state(), GenerationState::Error);
            assert_eq!(
                run.context().error.as_deref(),
                Some("agent exited non-zero")
            );
        }
    }

    #[test]
    fn test_idle_cannot_fail() {
        let mut run = GenerationMachine::new();
        run.dispatch(&GenerationEvent::Fail {
            message: "spurious".to_string(),
        });
        assert_eq!(run.state(), GenerationState::Idle);
        assert_eq!(run.context().error, None);
    }

    #[test]
    fn test_stages_do_not_skip() {
        let mut run = GenerationMachine::new();
        run.dispatch(&GenerationEvent::Start);

        // Out-of-order completions are ignored.
        run.dispatch(&GenerationEvent::DiscoveryComplete);
        assert_eq!(run.state(), GenerationState::Analyzing);
        run.dispatch(&GenerationEvent::GenerationComplete);
        assert_eq!(run.state(), GenerationState::Analyzing);
    }

    #[test]
    fn test_settled_states_ignore_events() {
        for settled in [GenerationState::Complete, GenerationState::Error] {
            let mut run = GenerationMachine::with_state(settled);
            run.dispatch(&GenerationEvent::Start);
            run.dispatch(&GenerationEvent::GenerationComplete);
            assert_eq!(run.state(), settled);
        }
    }

    #[test]
    fn test_is_settled() {
        assert!(!GenerationState::Idle.is_settled());
        assert!(!GenerationState::Analyzing.is_settled());
        assert!(!GenerationState::Discovering.is_settled());
        assert!(!GenerationState::Generating.is_settled());
        assert!(GenerationState::Complete.is_settled());
        assert!(GenerationState::Error.is_settled());
    }
}
