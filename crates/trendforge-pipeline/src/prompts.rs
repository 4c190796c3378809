//! The four stage templates: built-in defaults plus on-disk overrides.

use std::path::Path;

use crate::error::TemplateError;
use crate::stage::StageKind;
use crate::template::PromptTemplate;

const TREND_SUMMARY: &str = "\
You are a YouTube trend analyst.

Based on the following Reddit trends, Google Trends, and YouTube trends, write a concise summary of:
- What topics are hot in this niche
- What emerging trends you notice
- What the target audience seems interested in right now

Some sources may be marked unavailable; work with whatever signal is present.

Reddit Trends:
{reddit_trends}

Google Trends:
{google_trends}

YouTube Trends:
{youtube_trends}

Channel Description:
{channel_description}

Your summary:
";

const CONTENT_PLAN: &str = "\
You are a YouTube content strategist.

Based on this trend summary and this channel description, suggest {idea_count} engaging YouTube video ideas that are likely to drive growth and engagement.

Trend Summary:
{trend_summary}

Channel Description:
{channel_description}

Reply with exactly {idea_count} ideas, one per line, as a numbered list. Do not add headings or commentary.
";

const OPTIMIZED_TITLES: &str = "\
You are an expert YouTube title copywriter.

Given these {idea_count} content ideas and the trend summary behind them, write {titles_per_idea} optimized title(s) for each idea, designed to maximize clicks and engagement without being misleading.

Content Ideas:
{content_plan}

Trend Summary:
{trend_summary}

Reply with {title_count} titles in total, one per line, as a dash list, in the same order as the ideas. Do not add headings or commentary.
";

const THUMBNAIL_IDEAS: &str = "\
You are an expert YouTube thumbnail designer.

Given these content ideas and the trend summary behind them, describe one compelling thumbnail concept for each of the {idea_count} ideas. Keep it visual, with minimal text, and highly eye-catching.

Content Ideas:
{content_plan}

Trend Summary:
{trend_summary}

Reply with {idea_count} concepts, one per line, as a dash list, in the same order as the ideas. Do not add headings or commentary.
";

/// Templates for every stage, validated against each stage's inputs.
#[derive(Debug, Clone)]
pub struct PromptSet {
    trend_summary: PromptTemplate,
    content_plan: PromptTemplate,
    optimized_titles: PromptTemplate,
    thumbnail_ideas: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            trend_summary: PromptTemplate::new("trend_summary", TREND_SUMMARY),
            content_plan: PromptTemplate::new("content_plan", CONTENT_PLAN),
            optimized_titles: PromptTemplate::new("optimized_titles", OPTIMIZED_TITLES),
            thumbnail_ideas: PromptTemplate::new("thumbnail_ideas", THUMBNAIL_IDEAS),
        }
    }
}

impl PromptSet {
    /// Built-in templates, overridden by any `<stage>.txt` files in `dir`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Io`] if an override file exists but cannot be read.
    /// - [`TemplateError::MissingPlaceholder`] if an override references a
    ///   placeholder its stage does not supply.
    pub fn load_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut set = Self::default();
        for kind in StageKind::ALL {
            let path = dir.join(kind.template_file());
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .map_err(|source| TemplateError::Io {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(stage = %kind, path = %path.display(), "using prompt override");
            set.set(kind, PromptTemplate::new(template_name(kind), &text));
        }
        set.validate()?;
        Ok(set)
    }

    /// [`PromptSet::load_dir`] when a directory is configured, defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`PromptSet::load_dir`].
    pub fn load(dir: Option<&Path>) -> Result<Self, TemplateError> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Ok(Self::default()),
        }
    }

    /// Replace one stage's template. Call [`PromptSet::validate`] afterwards.
    pub fn set(&mut self, kind: StageKind, template: PromptTemplate) {
        *self.slot_mut(kind) = template;
    }

    #[must_use]
    pub fn get(&self, kind: StageKind) -> &PromptTemplate {
        match kind {
            StageKind::TrendSummarizer => &self.trend_summary,
            StageKind::ContentPlanner => &self.content_plan,
            StageKind::TitleOptimizer => &self.optimized_titles,
            StageKind::ThumbnailIdeator => &self.thumbnail_ideas,
        }
    }

    /// Every placeholder must be one of its stage's [`StageKind::inputs`].
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingPlaceholder`] for the first
    /// placeholder the orchestrator would not supply.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for kind in StageKind::ALL {
            let template = self.get(kind);
            if let Some(unknown) = template
                .placeholders()
                .into_iter()
                .find(|p| !kind.inputs().contains(p))
            {
                return Err(TemplateError::MissingPlaceholder {
                    template: template.name().to_string(),
                    placeholder: unknown.to_string(),
                });
            }
        }
        Ok(())
    }

    fn slot_mut(&mut self, kind: StageKind) -> &mut PromptTemplate {
        match kind {
            StageKind::TrendSummarizer => &mut self.trend_summary,
            StageKind::ContentPlanner => &mut self.content_plan,
            StageKind::TitleOptimizer => &mut self.optimized_titles,
            StageKind::ThumbnailIdeator => &mut self.thumbnail_ideas,
        }
    }
}

fn template_name(kind: StageKind) -> &'static str {
    kind.template_file().trim_end_matches(".txt")
}
