//! Pipeline orchestration.

use std::collections::HashMap;

use tokio::sync::watch;
use trendforge_core::{TrendBundle, TrendProvider};

use crate::error::PipelineError;
use crate::llm::LanguageModel;
use crate::prompts::PromptSet;
use crate::run_state::RunState;
use crate::stage::{Stage, StageArtifact, StageKind};
use crate::types::{PipelineResult, PipelineSettings, RunRequest};

/// Runs the four stages against one model.
#[derive(Debug)]
pub struct Pipeline<M> {
    model: M,
    prompts: PromptSet,
    settings: PipelineSettings,
}

/// Publishes state transitions when a sender is attached.
struct Progress<'a>(Option<&'a watch::Sender<RunState>>);

impl Progress<'_> {
    fn advance(&self, next: RunState) {
        let Some(tx) = self.0 else { return };
        let current = tx.borrow().clone();
        if current.can_transition_to(&next) {
            tx.send_replace(next);
        } else {
            tracing::warn!(from = ?current, to = ?next, "ignoring invalid run state transition");
        }
    }

    fn fail(&self, err: &PipelineError) {
        self.advance(RunState::Failed {
            stage: err.stage(),
            reason: err.to_string(),
        });
    }
}

impl<M: LanguageModel> Pipeline<M> {
    #[must_use]
    pub fn new(model: M, prompts: PromptSet, settings: PipelineSettings) -> Self {
        Self {
            model,
            prompts,
            settings,
        }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Run all stages on trends the caller already fetched.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StageFailed`] naming the first stage whose
    /// model call failed; later stages are not run.
    pub async fn run_with_trends(
        &self,
        trends: &TrendBundle,
        channel_description: &str,
    ) -> Result<PipelineResult, PipelineError> {
        self.execute(trends, channel_description, &Progress(None))
            .await
    }

    /// [`Pipeline::run_with_trends`], publishing each [`RunState`] to `state`.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_with_trends`].
    pub async fn run_with_trends_tracked(
        &self,
        trends: &TrendBundle,
        channel_description: &str,
        state: &watch::Sender<RunState>,
    ) -> Result<PipelineResult, PipelineError> {
        let progress = Progress(Some(state));
        let result = self.execute(trends, channel_description, &progress).await;
        if let Err(err) = &result {
            progress.fail(err);
        }
        result
    }

    /// Fetch trends from `provider`, then run all stages.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_with_trends`]. Trend fetching itself never fails.
    pub async fn run(
        &self,
        provider: &dyn TrendProvider,
        request: &RunRequest,
    ) -> Result<PipelineResult, PipelineError> {
        let trends = provider
            .fetch_trends(&request.niche, &request.subreddits)
            .await;
        self.run_with_trends(&trends, &request.channel_description)
            .await
    }

    /// [`Pipeline::run`], publishing each [`RunState`] to `state`.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_with_trends`].
    pub async fn run_tracked(
        &self,
        provider: &dyn TrendProvider,
        request: &RunRequest,
        state: &watch::Sender<RunState>,
    ) -> Result<PipelineResult, PipelineError> {
        let progress = Progress(Some(state));
        progress.advance(RunState::FetchingTrends);
        let trends = provider
            .fetch_trends(&request.niche, &request.subreddits)
            .await;

        let result = self
            .execute(&trends, &request.channel_description, &progress)
            .await;
        if let Err(err) = &result {
            progress.fail(err);
        }
        result
    }

    async fn execute(
        &self,
        trends: &TrendBundle,
        channel_description: &str,
        progress: &Progress<'_>,
    ) -> Result<PipelineResult, PipelineError> {
        let channel_description = channel_description.trim().to_string();
        let idea_count = self.settings.idea_count.to_string();

        let trend_summary = self
            .stage(
                StageKind::TrendSummarizer,
                progress,
                HashMap::from([
                    ("reddit_trends", trends.reddit_text.clone()),
                    ("google_trends", trends.google_text.clone()),
                    ("youtube_trends", trends.youtube_text.clone()),
                    ("channel_description", channel_description.clone()),
                ]),
            )
            .await?
            .into_text();

        let content_plan = self
            .stage(
                StageKind::ContentPlanner,
                progress,
                HashMap::from([
                    ("trend_summary", trend_summary.clone()),
                    ("channel_description", channel_description),
                    ("idea_count", idea_count.clone()),
                ]),
            )
            .await?;
        let plan_text = content_plan.as_prompt_text();

        let optimized_titles = self
            .stage(
                StageKind::TitleOptimizer,
                progress,
                HashMap::from([
                    ("content_plan", plan_text.clone()),
                    ("trend_summary", trend_summary.clone()),
                    ("idea_count", idea_count.clone()),
                    ("titles_per_idea", self.settings.titles_per_idea.to_string()),
                    ("title_count", self.settings.title_count().to_string()),
                ]),
            )
            .await?
            .into_list();

        let thumbnail_ideas = self
            .stage(
                StageKind::ThumbnailIdeator,
                progress,
                HashMap::from([
                    ("content_plan", plan_text),
                    ("trend_summary", trend_summary.clone()),
                    ("idea_count", idea_count),
                ]),
            )
            .await?
            .into_list();

        progress.advance(RunState::Complete);
        Ok(PipelineResult {
            trend_summary,
            content_plan: content_plan.into_list(),
            optimized_titles,
            thumbnail_ideas,
        })
    }

    async fn stage(
        &self,
        kind: StageKind,
        progress: &Progress<'_>,
        inputs: HashMap<&'static str, String>,
    ) -> Result<StageArtifact, PipelineError> {
        progress.advance(RunState::RunningStage(kind));
        tracing::info!(stage = %kind, model = self.model.name(), "stage started");

        let artifact = Stage::new(kind, self.prompts.get(kind))
            .run(&self.model, &inputs)
            .await
            .inspect_err(|e| tracing::error!(stage = %kind, error = %e, "stage failed"))?;

        match &artifact {
            StageArtifact::Text(text) => {
                tracing::info!(stage = %kind, chars = text.len(), "stage finished");
            }
            StageArtifact::List(items) => {
                if items.is_empty() {
                    tracing::warn!(stage = %kind, "stage produced no list items");
                }
                tracing::info!(stage = %kind, items = items.len(), "stage finished");
            }
        }
        Ok(artifact)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
