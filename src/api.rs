//! HTTP surface: router, shared state, and the request handlers.
//! State is built once in `main` and injected through `Router::with_state`;
//! nothing here reaches into globals.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::model::ModelState;
use crate::options::{self, FeeOptions};
use crate::predictor;
use crate::scrape::{self, NewsFeed, NewsSource};

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    pub http: reqwest::Client,
    pub sources: Arc<Vec<NewsSource>>,
}

impl AppState {
    pub fn new(model: ModelState, http: reqwest::Client) -> Self {
        Self {
            model: Arc::new(model),
            http,
            sources: Arc::new(scrape::default_sources()),
        }
    }

    /// Swap the scrape source list (used by tests and alternate deployments).
    pub fn with_sources(mut self, sources: Vec<NewsSource>) -> Self {
        self.sources = Arc::new(sources);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict_fee", post(predict_fee))
        .route("/get_options", get(get_options))
        .route("/scrape", get(scrape_news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(serde::Deserialize)]
struct PredictFeeRequest {
    // Absent fields behave like empty ones: both are "missing input".
    #[serde(default)]
    country: String,
    #[serde(default)]
    course_type: String,
    #[serde(default)]
    specialization: String,
}

#[derive(serde::Serialize)]
struct PredictFeeResponse {
    predicted_fee: f64,
}

async fn predict_fee(
    State(state): State<AppState>,
    Json(body): Json<PredictFeeRequest>,
) -> Result<Json<PredictFeeResponse>, ApiError> {
    let predicted_fee = predictor::predict_fee(
        &state.model,
        &body.country,
        &body.course_type,
        &body.specialization,
    )?;
    Ok(Json(PredictFeeResponse { predicted_fee }))
}

async fn get_options(State(state): State<AppState>) -> Result<Json<FeeOptions>, ApiError> {
    Ok(Json(options::get_options(&state.model)?))
}

async fn scrape_news(State(state): State<AppState>) -> Json<NewsFeed> {
    Json(scrape::scrape_news(&state.http, &state.sources).await)
}
