//! Restaurant handlers: detail by id, lookup by id or name, comparison and
//! detailed analysis.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use platewise_core::{PlaceId, RestaurantDetail, Review};
use platewise_reviews::{CompareError, Comparison, LookupError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct LookupRequest {
    pub restaurant: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompareRequest {
    pub place_id_1: String,
    pub place_id_2: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeResponse {
    detailed_summary: String,
}

fn map_lookup_error(request_id: &str, error: &LookupError) -> ApiError {
    match error {
        LookupError::Validation(e) => ApiError::new(request_id, "validation_error", e.to_string()),
        LookupError::PrimaryLookup { query, source } => {
            tracing::info!(query, error = %source, "primary lookup failed");
            ApiError::new(request_id, "not_found", "Restaurant not found")
        }
    }
}

/// GET /api/v1/restaurants/{place_id}
pub(super) async fn get_restaurant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<RestaurantDetail>>, ApiError> {
    let place_id = PlaceId::parse(&place_id)
        .map_err(|e| ApiError::new(req_id.0.as_str(), "validation_error", e.to_string()))?;

    let data = state
        .service
        .detail(&place_id)
        .await
        .map_err(|e| map_lookup_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/restaurants/lookup: accepts a place id or a restaurant name.
pub(super) async fn lookup_restaurant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LookupRequest>,
) -> Result<Json<ApiResponse<RestaurantDetail>>, ApiError> {
    let data = state
        .service
        .lookup(&body.restaurant)
        .await
        .map_err(|e| map_lookup_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/restaurants/compare
pub(super) async fn compare_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CompareRequest>,
) -> Result<Json<ApiResponse<Comparison>>, ApiError> {
    let data = state
        .service
        .compare(&body.place_id_1, &body.place_id_2)
        .await
        .map_err(|e| match e {
            CompareError::Lookup(e) => map_lookup_error(&req_id.0, &e),
            CompareError::Summary(e) => {
                tracing::error!(error = %e, "comparison generation failed");
                ApiError::new(
                    req_id.0.as_str(),
                    "upstream_error",
                    "Unable to compare restaurants at this time.",
                )
            }
        })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/restaurants/analyze
pub(super) async fn analyze_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalyzeResponse>>, ApiError> {
    if body.reviews.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "reviews must be a non-empty array",
        ));
    }

    let detailed_summary = state.service.analyze(&body.reviews).await;

    Ok(Json(ApiResponse {
        data: AnalyzeResponse { detailed_summary },
        meta: ResponseMeta::new(req_id.0),
    }))
}
