use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use trendforge_core::TrendBundle;
use trendforge_pipeline::{PipelineError, PipelineResult, RunRequest, RunState};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{require_niche, ApiError, ApiResponse, AppState, ResponseMeta, SharedPipeline};

#[derive(Debug, Deserialize)]
pub(super) struct PipelineBody {
    niche: String,
    #[serde(default)]
    subreddits: Vec<String>,
    channel_url: Option<String>,
    channel_description: Option<String>,
    /// Pre-fetched trends; when present no trend source is queried.
    trends: Option<TrendBundle>,
}

#[derive(Debug, Serialize)]
pub(super) struct RunCreated {
    run_id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct RunStatus {
    run_id: Uuid,
    state: RunState,
    result: Option<PipelineResult>,
}

/// Validated pipeline input with the channel source still unresolved.
struct PreparedRun {
    niche: String,
    subreddits: Vec<String>,
    channel_url: Option<String>,
    channel_description: String,
    trends: Option<TrendBundle>,
}

impl PreparedRun {
    fn from_body(request_id: &str, body: PipelineBody) -> Result<Self, ApiError> {
        let niche = require_niche(request_id, &body.niche)?;
        let channel_url = body
            .channel_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if channel_url.is_some() && body.channel_description.is_some() {
            return Err(ApiError::new(
                request_id,
                "validation_error",
                "provide channel_url or channel_description, not both",
            ));
        }

        Ok(Self {
            niche,
            subreddits: body.subreddits,
            channel_url,
            channel_description: body.channel_description.unwrap_or_default(),
            trends: body.trends,
        })
    }

    async fn resolve_channel(&mut self, state: &AppState) {
        if let Some(url) = self.channel_url.take() {
            self.channel_description = state
                .collector
                .extract_channel_info(&url)
                .await
                .prompt_text();
        }
    }

    fn request(&self) -> RunRequest {
        RunRequest {
            niche: self.niche.clone(),
            subreddits: self.subreddits.clone(),
            channel_description: self.channel_description.clone(),
        }
    }
}

fn require_pipeline(state: &AppState, request_id: &str) -> Result<SharedPipeline, ApiError> {
    state.pipeline.clone().ok_or_else(|| {
        ApiError::new(
            request_id,
            "model_unavailable",
            "no language model is configured; set OPENAI_API_KEY",
        )
    })
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::StageFailed { stage, .. } => {
            tracing::error!(stage = %stage, error = %error, "pipeline stage failed");
            ApiError::new(request_id, "stage_failed", error.to_string())
        }
        PipelineError::Template(_) => {
            tracing::error!(error = %error, "prompt template error");
            ApiError::new(request_id, "internal_error", "prompt template error")
        }
    }
}

pub(super) async fn run_pipeline(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PipelineBody>,
) -> Result<Json<ApiResponse<PipelineResult>>, ApiError> {
    let pipeline = require_pipeline(&state, &req_id.0)?;
    let mut run = PreparedRun::from_body(&req_id.0, body)?;
    run.resolve_channel(&state).await;

    let result = match &run.trends {
        Some(trends) => {
            pipeline
                .run_with_trends(trends, &run.channel_description)
                .await
        }
        None => pipeline.run(&*state.collector, &run.request()).await,
    }
    .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn start_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PipelineBody>,
) -> Result<(StatusCode, Json<ApiResponse<RunCreated>>), ApiError> {
    let pipeline = require_pipeline(&state, &req_id.0)?;
    let mut run = PreparedRun::from_body(&req_id.0, body)?;
    let (run_id, tx) = state.runs.register().await;
    tracing::info!(run_id = %run_id, niche = %run.niche, "starting background run");

    let task_state = state.clone();
    tokio::spawn(async move {
        run.resolve_channel(&task_state).await;
        let outcome = match &run.trends {
            Some(trends) => {
                pipeline
                    .run_with_trends_tracked(trends, &run.channel_description, &tx)
                    .await
            }
            None => {
                pipeline
                    .run_tracked(&*task_state.collector, &run.request(), &tx)
                    .await
            }
        };

        match outcome {
            Ok(result) => {
                task_state.runs.complete(run_id, result).await;
                tracing::info!(run_id = %run_id, "background run complete");
            }
            Err(e) => tracing::error!(run_id = %run_id, error = %e, "background run failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: RunCreated { run_id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(run_id): Path<String>,
) -> Result<Json<ApiResponse<RunStatus>>, ApiError> {
    let run_id = Uuid::parse_str(&run_id).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "run_id must be a UUID",
        )
    })?;

    let snapshot = state
        .runs
        .snapshot(run_id)
        .await
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "run not found"))?;

    Ok(Json(ApiResponse {
        data: RunStatus {
            run_id,
            state: snapshot.state,
            result: snapshot.result,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
