//! Trash handlers for Web API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::file::TrashService;
use crate::web::dto::{ApiResponse, EmptyTrashResponse};
use crate::web::error::{ApiError, ErrorCode};
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// DELETE /api/trash - Permanently delete everything in the trash.
#[utoipa::path(
    delete,
    path = "/api/trash",
    tag = "trash",
    responses(
        (status = 200, description = "Trash emptied", body = EmptyTrashResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Some items could not be deleted")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn empty_trash(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<EmptyTrashResponse>>, ApiError> {
    let owner_id = user.owner_id().to_string();

    // Detached so a disconnecting client cannot interrupt a deletion.
    let summary = tokio::spawn(async move {
        TrashService::new(state.db.pool(), state.object_store.as_ref())
            .with_config(&state.deletion)
            .empty_trash(&owner_id)
            .await
    })
    .await
    .map_err(|e| {
        tracing::error!("Empty trash task failed: {}", e);
        ApiError::internal("Error emptying the trash can")
    })?
    .map_err(|e| {
        tracing::error!("Failed to empty trash: {}", e);
        ApiError::internal("Error emptying the trash can")
    })?;

    if !summary.is_ok() {
        return Err(ApiError::with_details(
            ErrorCode::PartialFailure,
            summary.message(),
            serde_json::json!({ "failedNames": summary.failed_names }),
        ));
    }

    Ok(Json(ApiResponse::new(EmptyTrashResponse::from(&summary))))
}
