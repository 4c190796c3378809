//! Trend collection across all sources.
//!
//! Every public operation here is infallible: a source that is not configured
//! contributes [`TrendSource::unavailable_text`], a source whose call fails
//! contributes [`TrendSource::error_text`], and the failure is logged.

use std::time::Duration;

use async_trait::async_trait;
use trendforge_core::{
    AppConfig, ChannelProfile, RedditCredentials, TrendBundle, TrendProvider, TrendSource,
};

use crate::channel::{parse_channel_ref, simulated_description};
use crate::error::SourceError;
use crate::google_trends::GoogleTrendsClient;
use crate::reddit::{fallback_subreddits, merge_subreddit_names, RedditClient, RedditEndpoints};
use crate::youtube::YouTubeClient;

const YOUTUBE_SEARCH_RESULTS: usize = 10;
const RECENT_UPLOADS_LIMIT: usize = 10;

/// Build the shared HTTP client used by every adapter.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed.
pub fn build_http_client(
    timeout_secs: u64,
    user_agent: &str,
) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Tunables for [`TrendCollector`].
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub reddit_post_limit: usize,
    pub subreddit_discovery_limit: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            reddit_post_limit: 10,
            subreddit_discovery_limit: 15,
        }
    }
}

/// Owns one client per source and converts their results to trend text.
pub struct TrendCollector {
    http: reqwest::Client,
    reddit: Option<RedditCredentials>,
    reddit_endpoints: RedditEndpoints,
    google: GoogleTrendsClient,
    youtube: YouTubeClient,
    settings: CollectorSettings,
}

impl TrendCollector {
    /// Build a collector against the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let http = build_http_client(config.http_timeout_secs, &config.user_agent)?;
        Ok(Self {
            google: GoogleTrendsClient::new(http.clone()),
            youtube: YouTubeClient::new(http.clone(), config.youtube_api_key.clone()),
            reddit: config.reddit.clone(),
            reddit_endpoints: RedditEndpoints::default(),
            settings: CollectorSettings {
                reddit_post_limit: config.reddit_post_limit,
                subreddit_discovery_limit: config.subreddit_discovery_limit,
            },
            http,
        })
    }

    /// Assemble a collector from explicit parts (for tests and custom hosts).
    #[must_use]
    pub fn from_parts(
        http: reqwest::Client,
        reddit: Option<RedditCredentials>,
        reddit_endpoints: RedditEndpoints,
        google: GoogleTrendsClient,
        youtube: YouTubeClient,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            http,
            reddit,
            reddit_endpoints,
            google,
            youtube,
            settings,
        }
    }

    async fn reddit_client(&self) -> Option<Result<RedditClient, SourceError>> {
        let credentials = self.reddit.as_ref()?;
        Some(
            RedditClient::connect_with_endpoints(&self.http, credentials, &self.reddit_endpoints)
                .await,
        )
    }

    /// Hot post titles grouped under one `### r/<name>` heading per
    /// subreddit, subreddits in input order.
    pub async fn reddit_trend_search(&self, subreddits: &[String]) -> String {
        tracing::info!(subreddits = ?subreddits, "fetching Reddit trends");
        let client = match self.reddit_client().await {
            None => {
                tracing::warn!(source = "reddit", "Reddit credentials not configured");
                return TrendSource::Reddit.unavailable_text();
            }
            Some(Err(e)) => {
                tracing::error!(source = "reddit", error = %e, "Reddit client creation failed");
                return TrendSource::Reddit.error_text();
            }
            Some(Ok(client)) => client,
        };

        let mut sections = Vec::with_capacity(subreddits.len());
        let mut count = 0;
        for subreddit in subreddits {
            match client
                .hot_titles(subreddit, self.settings.reddit_post_limit)
                .await
            {
                Ok(titles) => {
                    count += titles.len();
                    sections.push(subreddit_section(subreddit, &titles));
                }
                Err(e) => {
                    tracing::error!(
                        source = "reddit",
                        subreddit = %subreddit,
                        error = %e,
                        "Reddit hot listing failed"
                    );
                    return TrendSource::Reddit.error_text();
                }
            }
        }

        tracing::info!(count, "retrieved Reddit trends");
        sections.join("\n\n")
    }

    /// Top related Google searches for the niche as `- query` lines.
    pub async fn google_trends_search(&self, niche: &str) -> String {
        tracing::info!(niche, "fetching Google trends");
        match self.google.related_queries(niche).await {
            Ok(queries) if queries.is_empty() => {
                tracing::info!(niche, "no Google trends found");
                "No Google trends found.".to_string()
            }
            Ok(queries) => {
                tracing::info!(count = queries.len(), "retrieved Google trends");
                bullet_block(&queries)
            }
            Err(e) => {
                tracing::error!(source = "google_trends", error = %e, "Google Trends fetch failed");
                TrendSource::GoogleTrends.error_text()
            }
        }
    }

    /// Most viewed recent `YouTube` uploads for the niche as `- title` lines.
    pub async fn youtube_trend_search(&self, niche: &str) -> String {
        tracing::info!(niche, "fetching YouTube trends");
        if !self.youtube.has_api_key() {
            tracing::warn!(source = "youtube", "YouTube API key not configured");
            return TrendSource::YouTube.unavailable_text();
        }

        match self
            .youtube
            .search_titles(niche, YOUTUBE_SEARCH_RESULTS)
            .await
        {
            Ok(titles) => {
                tracing::info!(count = titles.len(), "retrieved YouTube trends");
                bullet_block(&titles)
            }
            Err(e) => {
                tracing::error!(source = "youtube", error = %e, "YouTube search failed");
                TrendSource::YouTube.error_text()
            }
        }
    }

    /// Run the three trend searches concurrently and bundle the results.
    pub async fn collect_trends(&self, niche: &str, subreddits: &[String]) -> TrendBundle {
        let (reddit_text, google_text, youtube_text) = tokio::join!(
            self.reddit_trend_search(subreddits),
            self.google_trends_search(niche),
            self.youtube_trend_search(niche),
        );

        TrendBundle {
            reddit_text,
            google_text,
            youtube_text,
        }
    }

    /// Communities relevant to the niche, in search order.
    ///
    /// Returns an empty list when Reddit is unconfigured or the search fails.
    pub async fn discover_subreddits(&self, niche: &str, limit: Option<usize>) -> Vec<String> {
        let limit = limit.unwrap_or(self.settings.subreddit_discovery_limit);
        tracing::info!(niche, limit, "discovering subreddits");

        let found = match self.reddit_client().await {
            None => {
                tracing::warn!("Reddit API not available; returning empty subreddit list");
                return Vec::new();
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "Reddit client creation failed");
                return Vec::new();
            }
            Some(Ok(client)) => match client.search_subreddits(niche, limit).await {
                Ok(results) => merge_subreddit_names(results, limit),
                Err(e) => {
                    tracing::error!(error = %e, "subreddit search failed");
                    return Vec::new();
                }
            },
        };

        if found.is_empty() {
            if let Some(fallback) = fallback_subreddits(niche) {
                tracing::info!(niche, "using fallback subreddits");
                return fallback;
            }
        }

        tracing::info!(count = found.len(), "discovered subreddits");
        found
    }

    /// Describe the channel behind a `YouTube` URL.
    ///
    /// With an API key the description comes from the channel snippet;
    /// without one a templated description is used. Recent uploads are read
    /// from the public feed whenever the canonical channel id is known.
    /// Never fails: an unusable URL yields [`ChannelProfile::empty`].
    pub async fn extract_channel_info(&self, url: &str) -> ChannelProfile {
        tracing::info!(url, "extracting channel info");
        let channel = match parse_channel_ref(url) {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(error = %e, "channel URL not recognised");
                return ChannelProfile::empty();
            }
        };

        let (channel_id, description) = if self.youtube.has_api_key() {
            match self.youtube.channel_snippet(&channel).await {
                Ok(snippet) => {
                    let description = describe_snippet(&snippet.title, &snippet.description);
                    (Some(snippet.channel_id), description)
                }
                Err(e) => {
                    tracing::error!(
                        channel = channel.as_str(),
                        error = %e,
                        "channel lookup failed"
                    );
                    return ChannelProfile::empty();
                }
            }
        } else {
            (
                channel.channel_id().map(ToString::to_string),
                simulated_description(&channel),
            )
        };

        let recent_videos = match channel_id.as_deref() {
            Some(id) => self
                .youtube
                .recent_uploads(id, RECENT_UPLOADS_LIMIT)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(channel_id = id, error = %e, "channel feed fetch failed");
                    Vec::new()
                }),
            None => Vec::new(),
        };

        tracing::info!(
            channel = channel.as_str(),
            videos = recent_videos.len(),
            "channel info ready"
        );

        ChannelProfile {
            channel_id,
            description,
            recent_videos,
        }
    }
}

#[async_trait]
impl TrendProvider for TrendCollector {
    async fn fetch_trends(&self, niche: &str, subreddits: &[String]) -> TrendBundle {
        self.collect_trends(niche, subreddits).await
    }
}

fn describe_snippet(title: &str, description: &str) -> String {
    match (title.trim(), description.trim()) {
        (title, "") => format!("{title} (no channel description provided)"),
        ("", description) => description.to_string(),
        (title, description) => format!("{title}: {description}"),
    }
}

/// `- item` lines, one per entry.
/// `### r/<name>` followed by the subreddit's titles as `- title` lines.
fn subreddit_section(subreddit: &str, titles: &[String]) -> String {
    if titles.is_empty() {
        return format!("### r/{subreddit}");
    }
    format!("### r/{subreddit}\n{}", bullet_block(titles))
}

pub(crate) fn bullet_block(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
