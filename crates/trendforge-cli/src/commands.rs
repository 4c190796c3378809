//! Command handlers.
//!
//! Trend sources degrade to placeholder text, so only configuration problems
//! and model failures surface as errors here.

use trendforge_core::{AppConfig, ChannelProfile, TrendProvider};
use trendforge_pipeline::{
    OpenAiChatModel, Pipeline, PipelineSettings, PromptSet, RunRequest,
};
use trendforge_sources::TrendCollector;

use crate::render;

/// Where the channel description for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChannelInput {
    Url(String),
    Description(String),
    None,
}

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub(crate) niche: String,
    pub(crate) subreddits: Vec<String>,
    pub(crate) discover: bool,
    pub(crate) channel: ChannelInput,
    pub(crate) json: bool,
}

fn collector(config: &AppConfig) -> anyhow::Result<TrendCollector> {
    TrendCollector::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build trend collector: {e}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_discover(
    config: &AppConfig,
    niche: &str,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let subreddits = collector(config)?.discover_subreddits(niche, limit).await;
    if subreddits.is_empty() {
        println!("no subreddits found for \"{niche}\"");
        return Ok(());
    }
    for name in subreddits {
        println!("r/{name}");
    }
    Ok(())
}

pub(crate) async fn run_channel(config: &AppConfig, url: &str, json: bool) -> anyhow::Result<()> {
    let profile = collector(config)?.extract_channel_info(url).await;
    if json {
        return print_json(&profile);
    }
    print!("{}", render::channel_markdown(&profile));
    Ok(())
}

pub(crate) async fn run_trends(
    config: &AppConfig,
    niche: &str,
    subreddits: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let trends = collector(config)?.fetch_trends(niche, subreddits).await;
    if json {
        return print_json(&trends);
    }
    print!("{}", render::trends_markdown(niche, &trends));
    Ok(())
}

/// Resolve subreddits and channel context, fetch trends, and run all stages.
///
/// # Errors
///
/// Returns an error if the prompt templates or model client cannot be built,
/// or if any stage's model call fails. The error names the failed stage.
pub(crate) async fn run_pipeline(config: &AppConfig, options: RunOptions) -> anyhow::Result<()> {
    let prompts = PromptSet::load(config.prompts_dir.as_deref())?;
    let model = OpenAiChatModel::from_config(config)?;
    let pipeline = Pipeline::new(model, prompts, PipelineSettings::from_config(config));
    let collector = collector(config)?;

    let mut subreddits = options.subreddits;
    if options.discover {
        let found = collector
            .discover_subreddits(&options.niche, None)
            .await;
        merge_subreddits(&mut subreddits, found);
    }
    tracing::info!(niche = %options.niche, subreddits = ?subreddits, "starting pipeline run");

    let channel = match options.channel {
        ChannelInput::Url(url) => collector.extract_channel_info(&url).await,
        ChannelInput::Description(text) => ChannelProfile::from_description(text),
        ChannelInput::None => ChannelProfile::empty(),
    };

    let request = RunRequest {
        niche: options.niche,
        subreddits,
        channel_description: channel.prompt_text(),
    };
    let result = pipeline.run(&collector, &request).await?;

    if options.json {
        return print_json(&result);
    }
    print!(
        "{}",
        render::result_markdown(&request.niche, &result, chrono::Utc::now())
    );
    Ok(())
}

/// Append discovered names not already present (case-insensitive).
pub(crate) fn merge_subreddits(existing: &mut Vec<String>, discovered: Vec<String>) {
    for name in discovered {
        if !existing.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
            existing.push(name);
        }
    }
}
