//! The four stage units: template, model call, parse.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::llm::LanguageModel;
use crate::parse::{parse_list, parse_text};
use crate::template::PromptTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    TrendSummarizer,
    ContentPlanner,
    TitleOptimizer,
    ThumbnailIdeator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Text,
    List,
}

impl StageKind {
    /// Stages in execution order.
    pub const ALL: [StageKind; 4] = [
        StageKind::TrendSummarizer,
        StageKind::ContentPlanner,
        StageKind::TitleOptimizer,
        StageKind::ThumbnailIdeator,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StageKind::TrendSummarizer => "Trend Summarizer",
            StageKind::ContentPlanner => "Content Planner",
            StageKind::TitleOptimizer => "Title Optimizer",
            StageKind::ThumbnailIdeator => "Thumbnail Ideator",
        }
    }

    /// Placeholders the orchestrator supplies to this stage's template.
    #[must_use]
    pub fn inputs(self) -> &'static [&'static str] {
        match self {
            StageKind::TrendSummarizer => &[
                "reddit_trends",
                "google_trends",
                "youtube_trends",
                "channel_description",
            ],
            StageKind::ContentPlanner => &["trend_summary", "channel_description", "idea_count"],
            StageKind::TitleOptimizer => &[
                "content_plan",
                "trend_summary",
                "idea_count",
                "titles_per_idea",
                "title_count",
            ],
            StageKind::ThumbnailIdeator => &["content_plan", "trend_summary", "idea_count"],
        }
    }

    #[must_use]
    pub fn output_shape(self) -> OutputShape {
        match self {
            StageKind::TrendSummarizer => OutputShape::Text,
            StageKind::ContentPlanner | StageKind::TitleOptimizer | StageKind::ThumbnailIdeator => {
                OutputShape::List
            }
        }
    }

    /// File name of the override template in a prompts directory.
    #[must_use]
    pub fn template_file(self) -> &'static str {
        match self {
            StageKind::TrendSummarizer => "trend_summary.txt",
            StageKind::ContentPlanner => "content_plan.txt",
            StageKind::TitleOptimizer => "optimized_titles.txt",
            StageKind::ThumbnailIdeator => "thumbnail_ideas.txt",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<StageKind> {
        match self {
            StageKind::TrendSummarizer => Some(StageKind::ContentPlanner),
            StageKind::ContentPlanner => Some(StageKind::TitleOptimizer),
            StageKind::TitleOptimizer => Some(StageKind::ThumbnailIdeator),
            StageKind::ThumbnailIdeator => None,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed output of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageArtifact {
    Text(String),
    List(Vec<String>),
}

impl StageArtifact {
    /// The artifact as it is interpolated into a later stage's prompt.
    /// Lists render as `- item` lines.
    #[must_use]
    pub fn as_prompt_text(&self) -> String {
        match self {
            StageArtifact::Text(text) => text.clone(),
            StageArtifact::List(items) => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StageArtifact::Text(text) => Some(text),
            StageArtifact::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            StageArtifact::List(items) => Some(items),
            StageArtifact::Text(_) => None,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            StageArtifact::Text(text) => text,
            list @ StageArtifact::List(_) => list.as_prompt_text(),
        }
    }

    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            StageArtifact::List(items) => items,
            StageArtifact::Text(text) => parse_list(&text),
        }
    }
}

/// One stage bound to its template.
#[derive(Debug, Clone, Copy)]
pub struct Stage<'a> {
    pub kind: StageKind,
    pub template: &'a PromptTemplate,
}

impl<'a> Stage<'a> {
    #[must_use]
    pub fn new(kind: StageKind, template: &'a PromptTemplate) -> Self {
        Self { kind, template }
    }

    /// Render the template, call the model once, and parse the response
    /// according to [`StageKind::output_shape`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Template`] if an input the template references is
    ///   missing.
    /// - [`PipelineError::StageFailed`] if the model call fails.
    pub async fn run<M>(
        &self,
        model: &M,
        inputs: &HashMap<&str, String>,
    ) -> Result<StageArtifact, PipelineError>
    where
        M: LanguageModel + ?Sized,
    {
        let prompt = self.template.render(inputs)?;
        tracing::debug!(stage = %self.kind, prompt_chars = prompt.len(), "calling model");

        let raw = model
            .complete(&prompt)
            .await
            .map_err(|source| PipelineError::StageFailed {
                stage: self.kind,
                source,
            })?;

        let artifact = match self.kind.output_shape() {
            OutputShape::Text => StageArtifact::Text(parse_text(&raw)),
            OutputShape::List => StageArtifact::List(parse_list(&raw)),
        };
        Ok(artifact)
    }
}
