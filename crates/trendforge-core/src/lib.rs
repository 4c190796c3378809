//! Shared domain types and configuration for TrendForge.

pub mod app_config;
pub mod config;
pub mod trends;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, RedditCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use trends::{ChannelProfile, RecentVideo, TrendBundle, TrendProvider, TrendSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
