//! Generic finite-state engine for workflow lifecycle machines.
//!
//! This module provides:
//! - `Definition` trait describing one machine (states, events, context)
//! - `Candidate` records for guarded, action-carrying transitions
//! - `transition` pure evaluation function with first-match-wins semantics
//! - `Machine` wrapper owning the (state, context) pair for one entity
//!
//! The engine has no error surface: an event with no matching candidate in
//! the current state leaves state and context unchanged.

use std::fmt;
use tracing::{debug, trace};

/// A candidate transition for a given (state, event) pair.
///
/// Candidates are evaluated in declaration order; the first whose guard
/// passes (or that has no guard) is taken. Guards are pure predicates over
/// (context, event). Actions run in order against a copy of the context and
/// receive the state being left as their third argument.
pub struct Candidate<S, E, C> {
    pub guard: Option<fn(&C, &E) -> bool>,
    pub target: S,
    pub actions: Vec<fn(&mut C, &E, S)>,
}

impl<S, E, C> Candidate<S, E, C> {
    /// Create an unguarded candidate with no actions.
    pub fn to(target: S) -> Self {
        Self {
            guard: None,
            target,
            actions: Vec::new(),
        }
    }

    /// Attach a guard predicate.
    pub fn with_guard(mut self, guard: fn(&C, &E) -> bool) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Append an action to run if this candidate is taken.
    pub fn run(mut self, action: fn(&mut C, &E, S)) -> Self {
        self.actions.push(action);
        self
    }
}

/// Static definition of one finite-state machine.
pub trait Definition {
    type State: Copy + Eq + fmt::Debug;
    type Event;
    type Context: Clone + Default + PartialEq + fmt::Debug;

    /// The state a fresh machine instance starts in.
    const INITIAL: Self::State;

    /// Ordered candidate transitions for a (state, event) pair.
    /// An empty list means the event is ignored in this state.
    fn candidates(
        state: Self::State,
        event: &Self::Event,
    ) -> Vec<Candidate<Self::State, Self::Event, Self::Context>>;

    /// Internal wire name of a state, used for logging and for the status
    /// translation layer's coverage checks.
    fn state_name(state: Self::State) -> &'static str;
}

/// Evaluate one event against a machine definition.
///
/// Pure and deterministic: the same (state, context, event) triple always
/// yields the same result, and the inputs are never mutated.
pub fn transition<D: Definition>(
    state: D::State,
    context: &D::Context,
    event: &D::Event,
) -> (D::State, D::Context) {
    for candidate in D::candidates(state, event) {
        if candidate.guard.is_none_or(|guard| guard(context, event)) {
            let mut next = context.clone();
            for action in &candidate.actions {
                action(&mut next, event, state);
            }
            debug!(
                from = D::state_name(state),
                to = D::state_name(candidate.target),
                "transition taken"
            );
            return (candidate.target, next);
        }
    }

    trace!(state = D::state_name(state), "event ignored");
    (state, context.clone())
}

/// A live machine instance owning the (state, context) pair for one
/// workflow entity.
pub struct Machine<D: Definition> {
    state: D::State,
    context: D::Context,
}

impl<D: Definition> Machine<D> {
    /// Create a machine in the initial state with a default context.
    pub fn new() -> Self {
        Self {
            state: D::INITIAL,
            context: D::Context::default(),
        }
    }

    /// Create a machine in a specific state with a default context.
    pub fn with_state(state: D::State) -> Self {
        Self {
            state,
            context: D::Context::default(),
        }
    }

    /// Current state identifier (read-only snapshot).
    pub fn state(&self) -> D::State {
        self.state
    }

    /// Current context (read-only snapshot).
    pub fn context(&self) -> &D::Context {
        &self.context
    }

    /// Internal wire name of the current state.
    pub fn state_name(&self) -> &'static str {
        D::state_name(self.state)
    }

    /// Apply one event and return the resulting state.
    pub fn dispatch(&mut self, event: &D::Event) -> D::State {
        let (state, context) = transition::<D>(self.state, &self.context, event);
        self.state = state;
        self.context = context;
        state
    }
}

impl<D: Definition> Default for Machine<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Definition> Clone for Machine<D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            context: self.context.clone(),
        }
    }
}

impl<D: Definition> fmt::Debug for Machine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("context", &self.context)
            .finish()
    }
}
