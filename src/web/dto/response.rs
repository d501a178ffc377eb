//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{Node, TrashSummary};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A file or folder as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    /// Node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Logical path.
    pub path: String,
    /// Size in bytes.
    pub size: i64,
    /// File type ("folder" for folders).
    #[serde(rename = "type")]
    pub file_type: String,
    /// Public URL.
    pub file_url: String,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Provider object id.
    pub imagekit_id: Option<String>,
    /// Owner id.
    pub user_id: String,
    /// Parent folder id.
    pub parent_id: Option<String>,
    /// Folder flag.
    pub is_folder: bool,
    /// Starred flag.
    pub is_starred: bool,
    /// Trash flag.
    pub is_trash: bool,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Last update time (RFC 3339).
    pub updated_at: String,
}

impl From<Node> for NodeResponse {
    fn from(node: Node) -> Self {
        let created_at = node.created_at_datetime().to_rfc3339();
        let updated_at = node.updated_at_datetime().to_rfc3339();
        Self {
            id: node.id,
            name: node.name,
            path: node.path,
            size: node.size,
            file_type: node.file_type,
            file_url: node.file_url,
            thumbnail_url: node.thumbnail_url,
            imagekit_id: node.remote_object_id,
            user_id: node.owner_id,
            parent_id: node.parent_id,
            is_folder: node.is_folder,
            is_starred: node.is_starred,
            is_trash: node.is_trash,
            created_at,
            updated_at,
        }
    }
}

/// Result of emptying the trash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmptyTrashResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Trashed items removed.
    pub deleted_count: usize,
}

impl From<&TrashSummary> for EmptyTrashResponse {
    fn from(summary: &TrashSummary) -> Self {
        Self {
            message: summary.message(),
            deleted_count: summary.deleted_count,
        }
    }
}
