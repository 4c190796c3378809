mod commands;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trendforge")]
#[command(about = "Trend-driven YouTube content ideas from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find subreddits relevant to a niche
    Discover {
        /// Content niche to search for (e.g., "sourdough baking")
        #[arg(long)]
        niche: String,
        /// Maximum number of subreddits to return
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Describe a YouTube channel and list its recent uploads
    Channel {
        /// Channel URL (`/channel/`, `/c/`, `/user/`, or `@handle`)
        #[arg(long)]
        url: String,
        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Fetch the raw Reddit, Google Trends, and YouTube trend blocks
    Trends {
        /// Content niche
        #[arg(long)]
        niche: String,
        /// Subreddit to sample hot posts from (repeatable)
        #[arg(long = "subreddit")]
        subreddits: Vec<String>,
        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Run the full four-stage pipeline
    Run {
        /// Content niche
        #[arg(long)]
        niche: String,
        /// Subreddit to sample hot posts from (repeatable)
        #[arg(long = "subreddit")]
        subreddits: Vec<String>,
        /// Discover subreddits for the niche and add them to the list
        #[arg(long)]
        discover: bool,
        /// Channel URL to analyze for the channel description
        #[arg(long, conflicts_with = "channel_description")]
        channel_url: Option<String>,
        /// Channel description to use verbatim
        #[arg(long)]
        channel_description: Option<String>,
        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = trendforge_core::load_app_config()?;

    // stdout carries command output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?,
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discover { niche, limit } => {
            commands::run_discover(&config, &niche, limit).await
        }
        Commands::Channel { url, json } => commands::run_channel(&config, &url, json).await,
        Commands::Trends {
            niche,
            subreddits,
            json,
        } => commands::run_trends(&config, &niche, &subreddits, json).await,
        Commands::Run {
            niche,
            subreddits,
            discover,
            channel_url,
            channel_description,
            json,
        } => {
            let options = commands::RunOptions {
                niche,
                subreddits,
                discover,
                channel: match (channel_url, channel_description) {
                    (Some(url), _) => commands::ChannelInput::Url(url),
                    (None, Some(text)) => commands::ChannelInput::Description(text),
                    (None, None) => commands::ChannelInput::None,
                },
                json,
            };
            commands::run_pipeline(&config, options).await
        }
    }
}

#[cfg(test)]
mod tests;
