use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use trendforge_core::{TrendBundle, TrendProvider, TrendSource};

use super::*;
use crate::error::LlmError;

/// Answers calls in order from a script and records every prompt.
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Result<&str, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(ToString::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

struct FixedProvider(TrendBundle);

#[async_trait]
impl TrendProvider for FixedProvider {
    async fn fetch_trends(&self, _niche: &str, _subreddits: &[String]) -> TrendBundle {
        self.0.clone()
    }
}

fn trends() -> TrendBundle {
    TrendBundle {
        reddit_text: "- Crumb shot of the week".to_string(),
        google_text: "- sourdough starter".to_string(),
        youtube_text: "- 72 Hour Sourdough".to_string(),
    }
}

fn happy_script() -> Vec<Result<&'static str, LlmError>> {
    vec![
        Ok("  Starters and crumb shots dominate.  "),
        Ok("1. Starter from scratch\n2. Crumb shot clinic"),
        Ok("- I Made a Starter in 5 Days\n- Fixing Your Crumb"),
        Ok("- Jar of bubbling starter, big arrow\n- Split loaf close-up"),
    ]
}

fn pipeline(model: ScriptedModel) -> Pipeline<ScriptedModel> {
    Pipeline::new(model, PromptSet::default(), PipelineSettings::default())
}

#[tokio::test]
async fn runs_all_four_stages_in_order() {
    let pipeline = pipeline(ScriptedModel::new(happy_script()));

    let result = pipeline
        .run_with_trends(&trends(), "Weekend baking channel")
        .await
        .expect("pipeline should succeed");

    assert_eq!(result.trend_summary, "Starters and crumb shots dominate.");
    assert_eq!(
        result.content_plan,
        vec!["Starter from scratch", "Crumb shot clinic"]
    );
    assert_eq!(
        result.optimized_titles,
        vec!["I Made a Starter in 5 Days", "Fixing Your Crumb"]
    );
    assert_eq!(result.thumbnail_ideas.len(), 2);
    assert_eq!(pipeline.model().prompts().len(), 4);
}

#[tokio::test]
async fn each_stage_sees_the_previous_artifacts() {
    let pipeline = pipeline(ScriptedModel::new(happy_script()));
    pipeline
        .run_with_trends(&trends(), "Weekend baking channel")
        .await
        .unwrap();

    let prompts = pipeline.model().prompts();
    assert!(prompts[0].contains("- Crumb shot of the week"));
    assert!(prompts[0].contains("Weekend baking channel"));
    // Stage 2 is only called once stage 1 has returned its summary.
    assert!(prompts[1].contains("Starters and crumb shots dominate."));
    assert!(prompts[1].contains("suggest 5 engaging"));
    assert!(prompts[2].contains("- Starter from scratch\n- Crumb shot clinic"));
    assert!(prompts[2].contains("Starters and crumb shots dominate."));
    assert!(prompts[3].contains("- Crumb shot clinic"));
}

#[tokio::test]
async fn title_count_follows_settings() {
    let pipeline = Pipeline::new(
        ScriptedModel::new(happy_script()),
        PromptSet::default(),
        PipelineSettings {
            idea_count: 3,
            titles_per_idea: 2,
        },
    );
    pipeline.run_with_trends(&trends(), "").await.unwrap();

    let prompts = pipeline.model().prompts();
    assert!(prompts[1].contains("suggest 3 engaging"));
    assert!(prompts[2].contains("Reply with 6 titles in total"));
}

#[tokio::test]
async fn failed_source_still_yields_a_summary() {
    let degraded = TrendBundle {
        reddit_text: TrendSource::Reddit.error_text(),
        google_text: "- foo\n- bar".to_string(),
        youtube_text: "- baz".to_string(),
    };
    let pipeline = pipeline(ScriptedModel::new(happy_script()));
    let request = RunRequest {
        niche: "woodworking".to_string(),
        subreddits: vec!["woodworking".to_string()],
        channel_description: "A woodworking channel".to_string(),
    };

    let result = pipeline
        .run(&FixedProvider(degraded), &request)
        .await
        .expect("a degraded source is not a stage failure");

    assert!(!result.trend_summary.is_empty());
    let prompts = pipeline.model().prompts();
    let first = &prompts[0];
    assert!(first.contains("Error fetching Reddit trends."));
    assert!(first.contains("- foo\n- bar"));
    assert!(first.contains("- baz"));
    assert!(first.contains("A woodworking channel"));
    assert_eq!(prompts.len(), 4);
}

#[tokio::test]
async fn unavailable_sources_flow_through_as_text() {
    let degraded = TrendBundle {
        reddit_text: TrendSource::Reddit.unavailable_text(),
        google_text: TrendSource::GoogleTrends.error_text(),
        youtube_text: TrendSource::YouTube.unavailable_text(),
    };
    let pipeline = pipeline(ScriptedModel::new(happy_script()));

    let result = pipeline
        .run(&FixedProvider(degraded), &RunRequest::default())
        .await
        .expect("sentinels are not errors");

    let prompts = pipeline.model().prompts();
    let first = &prompts[0];
    assert!(first.contains("Reddit trends unavailable."));
    assert!(first.contains("Error fetching Google trends."));
    assert!(first.contains("YouTube trends unavailable."));
    assert!(!result.trend_summary.is_empty());
}

#[tokio::test]
async fn title_stage_failure_aborts_before_thumbnails() {
    let pipeline = pipeline(ScriptedModel::new(vec![
        Ok("summary"),
        Ok("1. idea"),
        Err(LlmError::Api("rate limit reached".to_string())),
        Ok("- never used"),
    ]));

    let err = pipeline
        .run_with_trends(&trends(), "")
        .await
        .unwrap_err();

    match &err {
        PipelineError::StageFailed { stage, source } => {
            assert_eq!(*stage, StageKind::TitleOptimizer);
            assert!(matches!(source, LlmError::Api(_)));
        }
        PipelineError::Template(e) => panic!("unexpected template error: {e}"),
    }
    assert!(err.to_string().contains("Title Optimizer"));
    assert_eq!(pipeline.model().prompts().len(), 3);
}

#[tokio::test]
async fn empty_title_output_still_runs_thumbnails() {
    let pipeline = pipeline(ScriptedModel::new(vec![
        Ok("summary"),
        Ok("1. idea"),
        Ok("   \n# Titles\n"),
        Ok("- thumbnail"),
    ]));

    let result = pipeline.run_with_trends(&trends(), "").await.unwrap();

    assert!(result.optimized_titles.is_empty());
    assert_eq!(result.thumbnail_ideas, vec!["thumbnail"]);
    assert_eq!(pipeline.model().prompts().len(), 4);
}

/// Records the published run state each time the model is called.
struct StateProbe {
    inner: ScriptedModel,
    state: watch::Receiver<RunState>,
    observed: Mutex<Vec<RunState>>,
}

#[async_trait]
impl LanguageModel for StateProbe {
    fn name(&self) -> &str {
        "probe"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let current = self.state.borrow().clone();
        self.observed.lock().unwrap().push(current);
        self.inner.complete(prompt).await
    }
}

#[tokio::test]
async fn tracked_run_publishes_each_stage_before_calling_it() {
    let (tx, rx) = watch::channel(RunState::Idle);
    let pipeline = Pipeline::new(
        StateProbe {
            inner: ScriptedModel::new(happy_script()),
            state: rx.clone(),
            observed: Mutex::new(Vec::new()),
        },
        PromptSet::default(),
        PipelineSettings::default(),
    );
    let request = RunRequest {
        niche: "sourdough".to_string(),
        ..RunRequest::default()
    };

    pipeline
        .run_tracked(&FixedProvider(trends()), &request, &tx)
        .await
        .unwrap();

    let observed = pipeline.model().observed.lock().unwrap().clone();
    let expected: Vec<RunState> = StageKind::ALL.into_iter().map(RunState::RunningStage).collect();
    assert_eq!(observed, expected);
    assert_eq!(*rx.borrow(), RunState::Complete);
}

#[tokio::test]
async fn tracked_failure_records_the_stage() {
    let pipeline = pipeline(ScriptedModel::new(vec![
        Ok("summary"),
        Err(LlmError::Status {
            status: 500,
            body: "upstream".to_string(),
        }),
    ]));
    let (tx, rx) = watch::channel(RunState::Idle);

    let err = pipeline
        .run_with_trends_tracked(&trends(), "", &tx)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(StageKind::ContentPlanner));
    match &*rx.borrow() {
        RunState::Failed { stage, reason } => {
            assert_eq!(*stage, Some(StageKind::ContentPlanner));
            assert!(reason.contains("Content Planner"));
        }
        other => panic!("expected Failed, got {other:?}"),
    };
}
