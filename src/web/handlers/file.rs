//! File handlers for Web API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::file::{DeleteEngine, DeleteResult, DeleteStatus, FileService, NodeRepository};
use crate::web::dto::{
    ApiResponse, CreateFolderRequest, ListQuery, NodeResponse, UploadRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Run a subtree deletion to completion on its own task.
///
/// A client that disconnects mid-request must not abort the walk between a
/// node's remote delete and its row delete.
async fn run_delete(
    state: Arc<AppState>,
    id: String,
    owner_id: String,
) -> Result<DeleteResult, ApiError> {
    tokio::spawn(async move {
        let repo = NodeRepository::new(state.db.pool());
        DeleteEngine::new(&repo, state.object_store.as_ref())
            .with_config(&state.deletion)
            .delete_subtree(&id, &owner_id)
            .await
    })
    .await
    .map_err(|e| {
        tracing::error!("Delete task failed: {}", e);
        ApiError::internal("Failed to delete file")
    })
}

/// DELETE /api/files/:id - Delete a file or folder with everything inside it.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Deleted node", body = NodeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Some nodes could not be deleted")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let result = run_delete(state, id, user.owner_id().to_string()).await?;

    match result.status {
        DeleteStatus::Ok => {
            let node = result
                .deleted
                .ok_or_else(|| ApiError::internal("Deleted file could not be returned"))?;
            Ok(Json(ApiResponse::new(node.into())))
        }
        DeleteStatus::NotFound => Err(ApiError::not_found("File not found")),
        DeleteStatus::InternalError => Err(ApiError::internal("Failed to delete file")),
        DeleteStatus::PartialFailure => {
            Err(ApiError::partial_failure(result.summary(), &result.failures))
        }
    }
}

/// POST /api/upload - Register a file uploaded to ImageKit.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Registered file", body = NodeResponse),
        (status = 400, description = "Invalid file upload data"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Parent folder not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UploadRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    if req.user_id.as_deref() != Some(user.owner_id()) {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    let uploaded = req
        .imagekit
        .and_then(|imagekit| imagekit.into_uploaded())
        .ok_or_else(|| ApiError::bad_request("Invalid file upload data"))?;

    let node = FileService::new(&state.db)
        .register_upload(user.owner_id(), uploaded, req.parent_id.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(node.into())))
}

/// POST /api/folders - Create a folder.
#[utoipa::path(
    post,
    path = "/api/folders",
    tag = "files",
    request_body = CreateFolderRequest,
    responses(
        (status = 200, description = "Created folder", body = NodeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Parent folder not found"),
        (status = 422, description = "Validation error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let node = FileService::new(&state.db)
        .create_folder(user.owner_id(), &req.name, req.parent_id.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(node.into())))
}

/// GET /api/files - List a folder, or the top level.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(ListQuery),
    responses(
        (status = 200, description = "Nodes, folders first", body = Vec<NodeResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<NodeResponse>>>, ApiError> {
    let nodes = FileService::new(&state.db)
        .list(user.owner_id(), query.parent_id.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(
        nodes.into_iter().map(NodeResponse::from).collect(),
    )))
}

/// PATCH /api/files/:id/star - Flip the starred flag.
#[utoipa::path(
    patch,
    path = "/api/files/{id}/star",
    tag = "files",
    params(
        ("id" = String, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Updated node", body = NodeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_star(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let node = FileService::new(&state.db)
        .toggle_star(&id, user.owner_id())
        .await?;

    Ok(Json(ApiResponse::new(node.into())))
}

/// PATCH /api/files/:id/trash - Move to or restore from the trash.
#[utoipa::path(
    patch,
    path = "/api/files/{id}/trash",
    tag = "files",
    params(
        ("id" = String, Path, description = "Node ID")
    ),
    responses(
        (status = 200, description = "Updated node", body = NodeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_trash(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let node = FileService::new(&state.db)
        .toggle_trash(&id, user.owner_id())
        .await?;

    Ok(Json(ApiResponse::new(node.into())))
}
