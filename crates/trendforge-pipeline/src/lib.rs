//! The `TrendForge` prompt pipeline.
//!
//! Four language-model stages run strictly in order, each fed by the
//! artifacts of the ones before it:
//!
//! 1. Trend Summarizer: raw trend blocks and channel description to a summary.
//! 2. Content Planner: summary and channel description to a list of ideas.
//! 3. Title Optimizer: plan and summary to a list of titles.
//! 4. Thumbnail Ideator: plan and summary to a list of thumbnail concepts.
//!
//! A failing model call aborts the run and names the stage. Degraded trend
//! sources and thin model output flow through as ordinary text.

pub mod error;
pub mod llm;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod run_state;
pub mod stage;
pub mod template;
pub mod types;

pub use error::{LlmError, PipelineError, TemplateError};
pub use llm::{LanguageModel, OpenAiChatModel};
pub use parse::{parse_list, parse_text};
pub use pipeline::Pipeline;
pub use prompts::PromptSet;
pub use run_state::RunState;
pub use stage::{OutputShape, Stage, StageArtifact, StageKind};
pub use template::PromptTemplate;
pub use types::{PipelineResult, PipelineSettings, RunRequest};
