use crate::error::{AppError, Result};
use crate::models::{RecommendationSet, SimilarRequest, UserProfile};
use crate::services::recommender::MISSING_SEED_MESSAGE;
use crate::services::Recommender;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use validator::Validate;

pub struct AppState {
    pub recommender: Arc<Recommender>,
}

pub fn recommend_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recommend", post(recommend))
        .route("/api/similar", post(find_similar))
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<RecommendationSet>> {
    let recommendations = state.recommender.generate_from_profile(&profile).await?;
    Ok(Json(recommendations))
}

async fn find_similar(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimilarRequest>,
) -> Result<Json<RecommendationSet>> {
    req.validate()
        .map_err(|_| AppError::Validation(MISSING_SEED_MESSAGE.to_string()))?;

    let recommendations = state
        .recommender
        .generate_from_seed_track(&req.artist, &req.track)
        .await?;
    Ok(Json(recommendations))
}
