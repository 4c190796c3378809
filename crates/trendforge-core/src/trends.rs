//! Trend signal types shared by the source adapters and the prompt pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One of the three independent trend feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    Reddit,
    GoogleTrends,
    YouTube,
}

impl TrendSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TrendSource::Reddit => "Reddit",
            TrendSource::GoogleTrends => "Google",
            TrendSource::YouTube => "YouTube",
        }
    }

    /// Placeholder used when the source has no client or credentials configured.
    #[must_use]
    pub fn unavailable_text(self) -> String {
        format!("{} trends unavailable.", self.label())
    }

    /// Placeholder used when a call to the source failed.
    #[must_use]
    pub fn error_text(self) -> String {
        format!("Error fetching {} trends.", self.label())
    }
}

impl std::fmt::Display for TrendSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw trend text for one pipeline run.
///
/// Each field is either a populated block (usually `- item` lines) or one of
/// the [`TrendSource`] placeholder sentences. Consumers treat both alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBundle {
    pub reddit_text: String,
    pub google_text: String,
    pub youtube_text: String,
}

impl TrendBundle {
    #[must_use]
    pub fn text_for(&self, source: TrendSource) -> &str {
        match source {
            TrendSource::Reddit => &self.reddit_text,
            TrendSource::GoogleTrends => &self.google_text,
            TrendSource::YouTube => &self.youtube_text,
        }
    }
}

/// A recent upload on the analyzed channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentVideo {
    pub title: String,
    pub url: String,
    pub view_count: Option<u64>,
}

/// Description of the creator's channel fed into the summarizer and planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub channel_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub recent_videos: Vec<RecentVideo>,
}

impl ChannelProfile {
    /// Profile used when no channel URL was given or extraction failed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            channel_id: None,
            description: description.into(),
            recent_videos: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty() && self.recent_videos.is_empty()
    }

    /// Channel context as handed to the prompt stages: the description,
    /// followed by a `Recent uploads:` block when any videos are known.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        let mut text = self.description.trim().to_string();
        if self.recent_videos.is_empty() {
            return text;
        }

        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str("Recent uploads:");
        for video in &self.recent_videos {
            text.push_str("\n- ");
            text.push_str(&video.title);
            if let Some(views) = video.view_count {
                text.push_str(&format!(" ({views} views)"));
            }
        }
        text
    }
}

/// Produces the trend bundle for a niche and a set of subreddits.
///
/// Implementations never fail: a degraded source contributes its placeholder
/// text instead.
#[async_trait]
pub trait TrendProvider: Send + Sync {
    async fn fetch_trends(&self, niche: &str, subreddits: &[String]) -> TrendBundle;
}
