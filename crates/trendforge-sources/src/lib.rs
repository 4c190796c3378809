//! Trend-source adapters for `TrendForge`.
//!
//! Pulls trend signals from Reddit hot posts, Google Trends related queries,
//! and `YouTube` search, and profiles a creator's channel from its URL.
//! [`TrendCollector`] turns every adapter failure into sentinel text so the
//! pipeline never sees a source error.

pub mod channel;
pub mod collector;
pub mod error;
pub mod google_trends;
pub mod reddit;
pub mod youtube;

pub use channel::{parse_channel_ref, ChannelRef};
pub use collector::{build_http_client, CollectorSettings, TrendCollector};
pub use error::SourceError;
pub use google_trends::GoogleTrendsClient;
pub use reddit::{RedditClient, RedditEndpoints};
pub use youtube::{ChannelSnippet, YouTubeClient};
