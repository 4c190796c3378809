use std::path::PathBuf;

use thiserror::Error;

use crate::stage::StageKind;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model returned no completion")]
    EmptyResponse,

    #[error("model API error: {0}")]
    Api(String),

    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template \"{template}\" references {{{placeholder}}} but no value is supplied")]
    MissingPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("failed to read prompt template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: StageKind,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl PipelineError {
    /// The stage that failed, when the failure came from a model call.
    #[must_use]
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            PipelineError::StageFailed { stage, .. } => Some(*stage),
            PipelineError::Template(_) => None,
        }
    }
}
