mod api;
mod middleware;
mod runs;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use trendforge_pipeline::{
    LanguageModel, LlmError, OpenAiChatModel, Pipeline, PipelineSettings, PromptSet,
};
use trendforge_sources::TrendCollector;

use crate::{
    api::{build_app, default_rate_limit_state, AppState, SharedPipeline},
    runs::RunRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = trendforge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let collector = Arc::new(TrendCollector::from_config(&config)?);
    let prompts = PromptSet::load(config.prompts_dir.as_deref())?;

    let pipeline: Option<SharedPipeline> = match OpenAiChatModel::from_config(&config) {
        Ok(model) => {
            tracing::info!(model = model.name(), "language model configured");
            let model: Arc<dyn LanguageModel> = Arc::new(model);
            Some(Arc::new(Pipeline::new(
                model,
                prompts,
                PipelineSettings::from_config(&config),
            )))
        }
        Err(LlmError::MissingApiKey) => {
            tracing::warn!("OPENAI_API_KEY not set; pipeline endpoints will return 503");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState {
        collector,
        pipeline,
        runs: RunRegistry::default(),
    };
    let app = build_app(state, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = ?config.env, "trendforge server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
