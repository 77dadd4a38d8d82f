use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    TripwiseError,
    app::{AppView, TravelPlanner},
    backend::LanguageOption,
    maps::InfoPopup,
    models::PlaceCategory,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error rendered as `{"error": ...}` with a matching status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<TripwiseError> for ApiError {
    fn from(err: TripwiseError) -> Self {
        let status = match &err {
            TripwiseError::Validation { .. } => StatusCode::BAD_REQUEST,
            TripwiseError::Api { .. }
            | TripwiseError::Geocoding { .. }
            | TripwiseError::Translation { .. } => StatusCode::BAD_GATEWAY,
            TripwiseError::Config { .. } | TripwiseError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", err);
        }
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router(planner: Arc<TravelPlanner>) -> Router {
    Router::new()
        .route("/view", get(get_view))
        .route("/search", get(search))
        .route("/categories/{category}/toggle", post(toggle_category))
        .route("/markers/{id}/open", post(open_marker))
        .route("/itinerary", post(generate_itinerary))
        .route("/language", put(set_language))
        .route("/languages", get(get_languages))
        .with_state(planner)
}

async fn get_view(State(planner): State<Arc<TravelPlanner>>) -> Json<AppView> {
    Json(planner.view())
}

async fn search(
    State(planner): State<Arc<TravelPlanner>>,
    Query(params): Query<SearchParams>,
) -> Json<AppView> {
    Json(planner.search(&params.destination).await)
}

async fn toggle_category(
    State(planner): State<Arc<TravelPlanner>>,
    Path(category): Path<String>,
) -> Result<Json<AppView>, ApiError> {
    let category: PlaceCategory = category
        .parse()
        .map_err(|_| ApiError::not_found(format!("Unknown category '{category}'")))?;
    Ok(Json(planner.toggle_category(category).await))
}

async fn open_marker(
    State(planner): State<Arc<TravelPlanner>>,
    Path(id): Path<u64>,
) -> Result<Json<InfoPopup>, ApiError> {
    planner
        .open_marker(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No marker {id} on the map")))
}

async fn generate_itinerary(
    State(planner): State<Arc<TravelPlanner>>,
) -> Result<Json<AppView>, ApiError> {
    Ok(Json(planner.generate_itinerary().await?))
}

async fn set_language(
    State(planner): State<Arc<TravelPlanner>>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<AppView>, ApiError> {
    Ok(Json(planner.set_language(&request.language).await?))
}

async fn get_languages(
    State(planner): State<Arc<TravelPlanner>>,
) -> Result<Json<Vec<LanguageOption>>, ApiError> {
    Ok(Json(planner.languages().await?))
}
