//! `YouTube` Data API v3 and public feed client.

use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::channel::{parse_channel_feed, ChannelRef};
use crate::error::SourceError;
use trendforge_core::RecentVideo;

const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const DEFAULT_FEED_BASE: &str = "https://www.youtube.com";
const SEARCH_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ItemsResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
}

/// Channel metadata returned by the `channels` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnippet {
    pub channel_id: String,
    pub title: String,
    pub description: String,
}

/// `YouTube` client. API calls need a key; feed calls do not.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    feed_base: String,
}

impl YouTubeClient {
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_urls(client, api_key, DEFAULT_API_BASE, DEFAULT_FEED_BASE)
    }

    /// Client pointed at custom hosts (for wiremock).
    #[must_use]
    pub fn with_base_urls(
        client: reqwest::Client,
        api_key: Option<String>,
        api_base: &str,
        feed_base: &str,
    ) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            feed_base: feed_base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Titles of the most viewed videos matching `query` from the last 30 days.
    ///
    /// # Errors
    ///
    /// - [`SourceError::YouTube`] if no API key is configured or the API
    ///   returns a non-2xx status.
    /// - [`SourceError::Deserialize`] on an unexpected payload.
    /// - [`SourceError::Http`] on network failure.
    pub async fn search_titles(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, SourceError> {
        let published_after = (Utc::now() - Duration::days(SEARCH_WINDOW_DAYS))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        let body: ItemsResponse<SearchItem> = self
            .api_get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("q", query.to_string()),
                    ("type", "video".to_string()),
                    ("order", "viewCount".to_string()),
                    ("maxResults", max_results.to_string()),
                    ("publishedAfter", published_after),
                ],
            )
            .await?;

        Ok(body
            .items
            .into_iter()
            .map(|item| unescape_html(&item.snippet.title))
            .filter(|title| !title.is_empty())
            .collect())
    }

    /// Look up a channel's title and description.
    ///
    /// # Errors
    ///
    /// - [`SourceError::YouTube`] if no API key is configured, the API returns
    ///   a non-2xx status, or no channel matches.
    /// - [`SourceError::Deserialize`] on an unexpected payload.
    /// - [`SourceError::Http`] on network failure.
    pub async fn channel_snippet(
        &self,
        channel: &ChannelRef,
    ) -> Result<ChannelSnippet, SourceError> {
        let selector = match channel {
            ChannelRef::Id(id) => ("id", id.clone()),
            ChannelRef::Handle(handle) => ("forHandle", format!("@{handle}")),
            ChannelRef::Legacy(name) => ("forUsername", name.clone()),
        };

        let body: ItemsResponse<ChannelItem> = self
            .api_get("channels", &[("part", "snippet".to_string()), selector])
            .await?;

        let item = body.items.into_iter().next().ok_or_else(|| {
            SourceError::YouTube(format!("no channel found for {}", channel.as_str()))
        })?;

        Ok(ChannelSnippet {
            channel_id: item.id,
            title: unescape_html(&item.snippet.title),
            description: item.snippet.description.trim().to_string(),
        })
    }

    /// Recent uploads from the channel's public Atom feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::YouTube`] on a non-2xx status,
    /// [`SourceError::Xml`] on malformed feed content, and
    /// [`SourceError::Http`] on network failure.
    pub async fn recent_uploads(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<RecentVideo>, SourceError> {
        let url = format!("{}/feeds/videos.xml", self.feed_base);
        let response = self
            .client
            .get(url)
            .query(&[("channel_id", channel_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::YouTube(format!(
                "channel feed returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_channel_feed(&body, limit)
    }

    async fn api_get<T>(&self, op: &str, params: &[(&str, String)]) -> Result<T, SourceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::YouTube("YOUTUBE_API_KEY is not configured".into()))?;

        let url = format!("{}/youtube/v3/{op}", self.api_base);
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::YouTube(format!("{op} returned status {status}")));
        }

        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: format!("youtube {op}"),
            source: e,
        })
    }
}

/// Data API titles arrive HTML-escaped (`&#39;`, `&amp;`).
fn unescape_html(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
        .trim()
        .to_string()
}
