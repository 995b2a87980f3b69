use axum::{extract::State, Extension, Json};
use platewise_reviews::Suggestion;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteRequest {
    pub input: String,
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub(super) struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// POST /api/v1/autocomplete: place predictions near the caller.
pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AutocompleteRequest>,
) -> Result<Json<ApiResponse<Vec<Suggestion>>>, ApiError> {
    let input = body.input.trim();
    if input.is_empty() || !body.location.is_valid() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "Invalid input or location data",
        ));
    }

    let data = state
        .service
        .autocomplete(input, body.location.lat, body.location.lng)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "autocomplete failed");
            ApiError::new(
                req_id.0.as_str(),
                "upstream_error",
                "Failed to fetch autocomplete suggestions",
            )
        })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_bounds_are_checked() {
        assert!(Location { lat: 40.7, lng: -74.0 }.is_valid());
        assert!(!Location { lat: 91.0, lng: 0.0 }.is_valid());
        assert!(!Location { lat: 0.0, lng: f64::NAN }.is_valid());
    }
}
