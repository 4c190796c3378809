//! Reddit API client (client-credentials OAuth).

mod discovery;

pub(crate) use discovery::{fallback_subreddits, merge_subreddit_names};

use serde::Deserialize;
use trendforge_core::RedditCredentials;

use crate::error::SourceError;

const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit listing wrapper, generic over the child payload.
#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubredditData {
    pub(crate) display_name: Option<String>,
    #[serde(default)]
    pub(crate) over18: bool,
}

/// Where the client sends token exchanges and API calls.
#[derive(Debug, Clone)]
pub struct RedditEndpoints {
    pub auth_url: String,
    pub api_base: String,
}

impl Default for RedditEndpoints {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Reddit API client holding a valid access token.
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Exchange client credentials for a token against the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Reddit`] if the token exchange is rejected and
    /// [`SourceError::Http`] on network failure.
    pub async fn connect(
        client: &reqwest::Client,
        credentials: &RedditCredentials,
    ) -> Result<Self, SourceError> {
        Self::connect_with_endpoints(client, credentials, &RedditEndpoints::default()).await
    }

    /// Same as [`RedditClient::connect`] with custom endpoints (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Reddit`] if the token exchange is rejected and
    /// [`SourceError::Http`] on network failure.
    pub async fn connect_with_endpoints(
        client: &reqwest::Client,
        credentials: &RedditCredentials,
        endpoints: &RedditEndpoints,
    ) -> Result<Self, SourceError> {
        let response = client
            .post(&endpoints.auth_url)
            .header("User-Agent", &credentials.user_agent)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Reddit(format!("token parse error: {e}")))?;

        Ok(Self {
            client: client.clone(),
            token: token.access_token,
            user_agent: credentials.user_agent.clone(),
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Titles of the current hot posts in one subreddit, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Reddit`] on a non-2xx status or an unparseable
    /// listing, and [`SourceError::Http`] on network failure.
    pub async fn hot_titles(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let endpoint = format!("{}/r/{subreddit}/hot", self.api_base);
        let listing: Listing<PostData> = self
            .get_listing(&endpoint, &[("limit", limit.to_string())])
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|post| post.data.title)
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .take(limit)
            .collect())
    }

    /// Search communities whose name or description matches `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Reddit`] on a non-2xx status or an unparseable
    /// listing, and [`SourceError::Http`] on network failure.
    pub(crate) async fn search_subreddits(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SubredditData>, SourceError> {
        let endpoint = format!("{}/subreddits/search", self.api_base);
        let listing: Listing<SubredditData> = self
            .get_listing(
                &endpoint,
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .collect())
    }

    async fn get_listing<T>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Listing<T>, SourceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", &self.user_agent)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Reddit(format!(
                "GET {endpoint} failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Reddit(format!("listing parse error: {e}")))
    }
}
