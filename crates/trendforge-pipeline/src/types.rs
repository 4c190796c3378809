use serde::{Deserialize, Serialize};
use trendforge_core::AppConfig;

/// Requested list sizes, interpolated into the stage templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub idea_count: usize,
    pub titles_per_idea: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            idea_count: 5,
            titles_per_idea: 1,
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            idea_count: config.idea_count,
            titles_per_idea: config.titles_per_idea,
        }
    }

    /// Total titles requested from the Title Optimizer.
    #[must_use]
    pub fn title_count(&self) -> usize {
        self.idea_count.saturating_mul(self.titles_per_idea)
    }
}

/// Everything needed to fetch trends and run all four stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub niche: String,
    #[serde(default)]
    pub subreddits: Vec<String>,
    #[serde(default)]
    pub channel_description: String,
}

/// The four artifacts of a completed run.
///
/// List sizes follow what the model returned; they are not forced to match
/// [`PipelineSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub trend_summary: String,
    pub content_plan: Vec<String>,
    pub optimized_titles: Vec<String>,
    pub thumbnail_ideas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_count_multiplies_and_saturates() {
        let settings = PipelineSettings {
            idea_count: 4,
            titles_per_idea: 3,
        };
        assert_eq!(settings.title_count(), 12);

        let huge = PipelineSettings {
            idea_count: usize::MAX,
            titles_per_idea: 2,
        };
        assert_eq!(huge.title_count(), usize::MAX);
    }
}
