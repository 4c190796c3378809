//! Google Trends related-queries client.
//!
//! Google Trends has no public API. The web UI first calls `explore` to
//! obtain per-widget tokens, then fetches each widget's data with the token.
//! Both responses carry an anti-XSSI prefix (`)]}'`) before the JSON body.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://trends.google.com";
const RELATED_QUERIES_WIDGET: &str = "RELATED_QUERIES";
const TIMEFRAME: &str = "now 7-d";
const HOST_LANGUAGE: &str = "en-US";
const TIMEZONE_OFFSET: &str = "360";

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    token: Option<String>,
    #[serde(default)]
    request: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RelatedSearchesResponse {
    default: RelatedSearchesData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedSearchesData {
    #[serde(default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedList {
    #[serde(default)]
    ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RankedKeyword {
    query: String,
}

/// Client for the two-step explore → related-searches flow.
pub struct GoogleTrendsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTrendsClient {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Client pointed at a custom host (for wiremock).
    #[must_use]
    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Top related queries for `keyword` over the last seven days, in rank
    /// order with duplicates removed.
    ///
    /// # Errors
    ///
    /// - [`SourceError::GoogleTrends`] on a non-2xx status or when the explore
    ///   response has no related-queries widget.
    /// - [`SourceError::Deserialize`] if either payload has an unexpected shape.
    /// - [`SourceError::Http`] on network failure.
    pub async fn related_queries(&self, keyword: &str) -> Result<Vec<String>, SourceError> {
        let explore_req = serde_json::json!({
            "comparisonItem": [{ "keyword": keyword, "time": TIMEFRAME, "geo": "" }],
            "category": 0,
            "property": "",
        });

        let body = self
            .get_text(
                "explore",
                &format!("{}/trends/api/explore", self.base_url),
                &[
                    ("hl", HOST_LANGUAGE.to_string()),
                    ("tz", TIMEZONE_OFFSET.to_string()),
                    ("req", explore_req.to_string()),
                ],
            )
            .await?;

        let explore: ExploreResponse =
            serde_json::from_str(strip_xssi_prefix(&body)).map_err(|e| {
                SourceError::Deserialize {
                    context: format!("explore(keyword={keyword})"),
                    source: e,
                }
            })?;

        let widget = explore
            .widgets
            .into_iter()
            .find(|w| w.id == RELATED_QUERIES_WIDGET)
            .ok_or_else(|| {
                SourceError::GoogleTrends("explore response has no related-queries widget".into())
            })?;
        let token = widget.token.ok_or_else(|| {
            SourceError::GoogleTrends("related-queries widget has no token".into())
        })?;

        let body = self
            .get_text(
                "relatedsearches",
                &format!("{}/trends/api/widgetdata/relatedsearches", self.base_url),
                &[
                    ("hl", HOST_LANGUAGE.to_string()),
                    ("tz", TIMEZONE_OFFSET.to_string()),
                    ("req", widget.request.to_string()),
                    ("token", token),
                ],
            )
            .await?;

        parse_related_searches(&body, keyword)
    }

    async fn get_text(
        &self,
        op: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String, SourceError> {
        let response = self.client.get(url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::GoogleTrends(format!(
                "{op} returned status {}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

/// Drop everything before the first `{` (the `)]}'` guard and its newline).
fn strip_xssi_prefix(body: &str) -> &str {
    body.find('{').map_or(body, |idx| &body[idx..])
}

/// The first ranked list is "top", the second "rising". Only "top" is used.
fn parse_related_searches(body: &str, keyword: &str) -> Result<Vec<String>, SourceError> {
    let parsed: RelatedSearchesResponse =
        serde_json::from_str(strip_xssi_prefix(body)).map_err(|e| SourceError::Deserialize {
            context: format!("relatedsearches(keyword={keyword})"),
            source: e,
        })?;

    let mut seen = HashSet::new();
    Ok(parsed
        .default
        .ranked_list
        .into_iter()
        .next()
        .map(|top| top.ranked_keyword)
        .unwrap_or_default()
        .into_iter()
        .map(|kw| kw.query.trim().to_string())
        .filter(|q| !q.is_empty() && seen.insert(q.clone()))
        .collect())
}
