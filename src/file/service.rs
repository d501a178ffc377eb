//! File service for Droply.
//!
//! This module provides the non-destructive file operations:
//! - Registering an object uploaded straight to the provider
//! - Creating folders
//! - Listing a folder and flipping the star/trash flags

use crate::db::Database;
use crate::{DroplyError, Result};

use super::node::{NewNode, Node};
use super::repository::NodeRepository;
use super::{DEFAULT_FILE_NAME, DEFAULT_FILE_TYPE, MAX_NAME_LENGTH};

/// Provider-side details of an uploaded object.
///
/// Everything but the URL is optional; missing fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct UploadedObject {
    /// Provider object id.
    pub remote_id: Option<String>,
    /// File name.
    pub name: Option<String>,
    /// Path reported by the provider.
    pub path: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// File type reported by the provider.
    pub file_type: Option<String>,
    /// Public URL.
    pub url: String,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
}

/// File service for registering and organizing nodes.
pub struct FileService<'a> {
    db: &'a Database,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn repo(&self) -> NodeRepository<'_> {
        NodeRepository::new(self.db.pool())
    }

    /// Record an object the client uploaded directly to the provider.
    pub async fn register_upload(
        &self,
        owner_id: &str,
        object: UploadedObject,
        parent_id: Option<&str>,
    ) -> Result<Node> {
        if object.url.trim().is_empty() {
            return Err(DroplyError::Validation(
                "invalid file upload data: url is required".to_string(),
            ));
        }

        let name = non_empty(object.name).unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DroplyError::Validation(format!(
                "file name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let size = object.size.unwrap_or(0);
        if size < 0 {
            return Err(DroplyError::Validation(
                "file size must not be negative".to_string(),
            ));
        }

        let path =
            non_empty(object.path).unwrap_or_else(|| format!("/droply/{owner_id}/{name}"));
        let file_type =
            non_empty(object.file_type).unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string());

        let mut new = NewNode::file(owner_id, name, path, object.url)
            .with_size(size)
            .with_file_type(file_type);
        if let Some(remote_id) = non_empty(object.remote_id) {
            new = new.with_remote_object(remote_id);
        }
        if let Some(thumbnail) = non_empty(object.thumbnail_url) {
            new = new.with_thumbnail(thumbnail);
        }
        if let Some(parent_id) = parent_id {
            let parent = self.owned_folder(parent_id, owner_id).await?;
            new = new.with_parent(parent.id);
        }

        self.repo().create(&new).await
    }

    /// Create a folder, at the top level or inside an owned folder.
    pub async fn create_folder(
        &self,
        owner_id: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Node> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DroplyError::Validation(
                "folder name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DroplyError::Validation(format!(
                "folder name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let new = match parent_id {
            Some(parent_id) => {
                let parent = self.owned_folder(parent_id, owner_id).await?;
                let path = format!("{}/{}", parent.path.trim_end_matches('/'), name);
                NewNode::folder(owner_id, name, path).with_parent(parent.id)
            }
            None => NewNode::folder(owner_id, name, format!("/droply/{owner_id}/{name}")),
        };

        self.repo().create(&new).await
    }

    /// List the owner's nodes under a folder, or at the top level.
    pub async fn list(&self, owner_id: &str, parent_id: Option<&str>) -> Result<Vec<Node>> {
        match parent_id {
            Some(parent_id) => self.repo().list_children(parent_id, owner_id).await,
            None => self.repo().list_top_level(owner_id).await,
        }
    }

    /// Flip the starred flag.
    pub async fn toggle_star(&self, id: &str, owner_id: &str) -> Result<Node> {
        self.repo()
            .toggle_starred(id, owner_id)
            .await?
            .ok_or_else(|| DroplyError::NotFound("file".to_string()))
    }

    /// Flip the trash flag.
    pub async fn toggle_trash(&self, id: &str, owner_id: &str) -> Result<Node> {
        self.repo()
            .toggle_trash(id, owner_id)
            .await?
            .ok_or_else(|| DroplyError::NotFound("file".to_string()))
    }

    async fn owned_folder(&self, id: &str, owner_id: &str) -> Result<Node> {
        self.repo()
            .get_folder(id, owner_id)
            .await?
            .ok_or_else(|| DroplyError::NotFound("folder".to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
