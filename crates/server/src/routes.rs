//! Router and handlers of the two recommendation endpoints.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::models::{MultiActivityRequest, RecommendationResponse, SingleActivityRequest};
use crate::service::RecommendationService;

pub const MULTI_ACTIVITY_PATH: &str = "/recommendations/multi-activity";
pub const SINGLE_ACTIVITY_PATH: &str = "/recommendations/single-activity";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

pub fn create_router(service: RecommendationService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route(MULTI_ACTIVITY_PATH, post(multi_activity))
        .route(SINGLE_ACTIVITY_PATH, post(single_activity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn multi_activity(
    State(state): State<AppState>,
    Json(request): Json<MultiActivityRequest>,
) -> ApiResult<Json<RecommendationResponse>> {
    Ok(Json(state.service.multi_activity(&request).await?))
}

async fn single_activity(
    State(state): State<AppState>,
    Json(request): Json<SingleActivityRequest>,
) -> ApiResult<Json<RecommendationResponse>> {
    Ok(Json(state.service.single_activity(&request).await?))
}
