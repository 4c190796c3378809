//! Observable progress of a single pipeline run.

use serde::{Deserialize, Serialize};

use crate::stage::StageKind;

/// Run lifecycle.
///
/// ```text
/// Idle -> FetchingTrends -> RunningStage(TrendSummarizer) -> ... -> RunningStage(ThumbnailIdeator) -> Complete
/// Idle -> RunningStage(TrendSummarizer)            (trends supplied by the caller)
/// any non-terminal state -> Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    FetchingTrends,
    RunningStage(StageKind),
    Complete,
    Failed {
        stage: Option<StageKind>,
        reason: String,
    },
}

impl RunState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed { .. })
    }

    #[must_use]
    pub fn can_transition_to(&self, next: &RunState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if matches!(next, RunState::Failed { .. }) {
            return true;
        }

        match (self, next) {
            (RunState::Idle, RunState::FetchingTrends)
            | (
                RunState::Idle | RunState::FetchingTrends,
                RunState::RunningStage(StageKind::TrendSummarizer),
            ) => true,
            (RunState::RunningStage(current), RunState::RunningStage(following)) => {
                current.next() == Some(*following)
            }
            (RunState::RunningStage(current), RunState::Complete) => current.next().is_none(),
            _ => false,
        }
    }
}
