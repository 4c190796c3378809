use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Reddit API error: {0}")]
    Reddit(String),

    #[error("Google Trends error: {0}")]
    GoogleTrends(String),

    #[error("YouTube API error: {0}")]
    YouTube(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not extract a channel from URL \"{0}\"")]
    InvalidChannelUrl(String),
}
