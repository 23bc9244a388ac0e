use axum::{extract::State, response::Json};
use store::tags;
use tracing::{instrument, trace};

use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// List all tags currently attached to at least one article
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "tags",
    responses(
        (status = 200, description = "Tags retrieved successfully", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    trace!("Entering list_tags function");

    let tags = tags::list_used(&state.db).await?;
    Ok(Json(ApiResponse {
        data: tags,
        message: "Tags retrieved successfully".to_string(),
        success: true,
    }))
}
