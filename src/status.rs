//! External status vocabulary and the translation layer over it.
//!
//! Persistence and legacy callers never see internal machine states; they
//! consume the small closed enums in this module. Two translation paths
//! exist per machine:
//!
//! - `From<InternalState>`: exhaustive (no wildcard arm), so a new internal
//!   state without a mapping is a compile error.
//! - `*_status_of(&str)`: total over arbitrary strings for persisted or
//!   otherwise untrusted input; unrecognized names degrade to the machine's
//!   default value, never an error.
//!
//! The string matches are declared independently of the state enums and the
//! test suite cross-checks the two in both directions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ParseStatusError;
use crate::feature::FeatureState;
use crate::generation::GenerationState;
use crate::review::ReviewState;

/// Externally-consumed status of a roadmap feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    #[default]
    UnderReview,
    Planned,
    InProgress,
    Done,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "under_review",
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl From<FeatureState> for FeatureStatus {
    fn from(state: FeatureState) -> Self {
        match state {
            FeatureState::UnderReview => Self::UnderReview,
            FeatureState::Planned => Self::Planned,
            FeatureState::InProgress => Self::InProgress,
            FeatureState::Done => Self::Done,
        }
    }
}

impl FromStr for FeatureStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under_review" => Ok(Self::UnderReview),
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError::new("feature", s)),
        }
    }
}

/// Translate a feature state name from persistence or legacy callers.
/// Total: anything unrecognized degrades to `under_review`.
pub fn feature_status_of(name: &str) -> FeatureStatus {
    match name {
        "under_review" => FeatureStatus::UnderReview,
        "planned" => FeatureStatus::Planned,
        "in_progress" => FeatureStatus::InProgress,
        "done" => FeatureStatus::Done,
        other => {
            if !other.is_empty() {
                warn!(status = other, "unrecognized feature status, defaulting");
            }
            FeatureStatus::default()
        }
    }
}

/// Externally-consumed phase of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Analyzing,
    Discovering,
    Generating,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Discovering => "discovering",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl From<GenerationState> for GenerationStatus {
    fn from(state: GenerationState) -> Self {
        match state {
            GenerationState::Idle => Self::Idle,
            GenerationState::Analyzing => Self::Analyzing,
            GenerationState::Discovering => Self::Discovering,
            GenerationState::Generating => Self::Generating,
            GenerationState::Complete => Self::Complete,
            GenerationState::Error => Self::Error,
        }
    }
}

impl FromStr for GenerationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "analyzing" => Ok(Self::Analyzing),
            "discovering" => Ok(Self::Discovering),
            "generating" => Ok(Self::Generating),
            "complete" => Ok(Self::Complete),
            "error" => Ok(Self::Error),
            _ => Err(ParseStatusError::new("generation", s)),
        }
    }
}

/// Translate a generation state name from persistence or legacy callers.
/// Total: anything unrecognized degrades to `idle`.
pub fn generation_status_of(name: &str) -> GenerationStatus {
    match name {
        "idle" => GenerationStatus::Idle,
        "analyzing" => GenerationStatus::Analyzing,
        "discovering" => GenerationStatus::Discovering,
        "generating" => GenerationStatus::Generating,
        "complete" => GenerationStatus::Complete,
        "error" => GenerationStatus::Error,
        other => {
            if !other.is_empty() {
                warn!(status = other, "unrecognized generation status, defaulting");
            }
            GenerationStatus::default()
        }
    }
}

/// Externally-consumed phase of a review workflow.
///
/// Collapsing vocabulary: local and external review both surface as
/// `reviewing`, since callers only care that the review is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Idle,
    Reviewing,
    Completed,
    Error,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reviewing => "reviewing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl From<ReviewState> for ReviewStatus {
    fn from(state: ReviewState) -> Self {
        match state {
            ReviewState::Idle => Self::Idle,
            ReviewState::Reviewing => Self::Reviewing,
            ReviewState::ExternalReview => Self::Reviewing,
            ReviewState::Completed => Self::Completed,
            ReviewState::Error => Self::Error,
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "reviewing" => Ok(Self::Reviewing),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(ParseStatusError::new("review", s)),
        }
    }
}

/// Translate a review state name from persistence or legacy callers.
/// Total: anything unrecognized degrades to `idle`.
pub fn review_status_of(name: &str) -> ReviewStatus {
    match name {
        "idle" => ReviewStatus::Idle,
        "reviewing" | "externalReview" => ReviewStatus::Reviewing,
        "completed" => ReviewStatus::Completed,
        "error" => ReviewStatus::Error,
        other => {
            if !other.is_empty() {
                warn!(status = other, "unrecognized review status, defaulting");
            }
            ReviewStatus::default()
        }
    }
}
