use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use trendforge_core::{ChannelProfile, TrendBundle};

use crate::middleware::RequestId;

use super::{require_niche, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_DISCOVERY_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub(super) struct DiscoverBody {
    niche: String,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct DiscoverData {
    subreddits: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChannelBody {
    url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TrendsBody {
    niche: String,
    #[serde(default)]
    subreddits: Vec<String>,
}

pub(super) async fn discover_subreddits(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DiscoverBody>,
) -> Result<Json<ApiResponse<DiscoverData>>, ApiError> {
    let niche = require_niche(&req_id.0, &body.niche)?;
    let limit = body.limit.map(|l| l.clamp(1, MAX_DISCOVERY_LIMIT));

    let subreddits = state.collector.discover_subreddits(&niche, limit).await;

    Ok(Json(ApiResponse {
        data: DiscoverData { subreddits },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn analyze_channel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ChannelBody>,
) -> Result<Json<ApiResponse<ChannelProfile>>, ApiError> {
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "url must not be empty",
        ));
    }

    let profile = state.collector.extract_channel_info(url).await;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn fetch_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TrendsBody>,
) -> Result<Json<ApiResponse<TrendBundle>>, ApiError> {
    let niche = require_niche(&req_id.0, &body.niche)?;
    let trends = state.collector.collect_trends(&niche, &body.subreddits).await;

    Ok(Json(ApiResponse {
        data: trends,
        meta: ResponseMeta::new(req_id.0),
    }))
}
