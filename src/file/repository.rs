//! Node repository and the metadata store seam used by the delete engine.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{DroplyError, Result};

use super::node::{NewNode, Node};

const NODE_COLUMNS: &str = "id, name, path, size, file_type, file_url, thumbnail_url, \
     remote_object_id, owner_id, parent_id, is_folder, is_starred, is_trash, created_at, updated_at";

/// Owner-scoped metadata operations needed to delete a subtree.
///
/// Every method filters by `owner_id`; a node of another owner behaves
/// exactly like a missing one.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a node by id.
    async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>>;

    /// List the direct children of a folder. Empty for leaves and unknown ids.
    async fn list_children(&self, parent_id: &str, owner_id: &str) -> Result<Vec<Node>>;

    /// Delete a node's row, returning it. `None` when no row matched.
    async fn delete_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>>;
}

/// Repository for node operations.
pub struct NodeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NodeRepository<'a> {
    /// Create a new NodeRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new node with a fresh UUID.
    pub async fn create(&self, node: &NewNode) -> Result<Node> {
        let id = uuid::Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO files (id, name, path, size, file_type, file_url, thumbnail_url,
                                remote_object_id, owner_id, parent_id, is_folder)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {NODE_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Node>(&sql)
            .bind(&id)
            .bind(&node.name)
            .bind(&node.path)
            .bind(node.size)
            .bind(&node.file_type)
            .bind(&node.file_url)
            .bind(&node.thumbnail_url)
            .bind(&node.remote_object_id)
            .bind(&node.owner_id)
            .bind(&node.parent_id)
            .bind(node.is_folder)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Get a node by ID, scoped to its owner.
    pub async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM files WHERE id = ? AND owner_id = ?");
        let node = sqlx::query_as::<_, Node>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(node)
    }

    /// Get a folder by ID. Non-folder nodes resolve as `None`.
    pub async fn get_folder(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        Ok(self
            .get_by_id(id, owner_id)
            .await?
            .filter(|node| node.is_folder))
    }

    /// List direct children of a folder, folders first then by name.
    pub async fn list_children(&self, parent_id: &str, owner_id: &str) -> Result<Vec<Node>> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM files
             WHERE parent_id = ? AND owner_id = ?
             ORDER BY is_folder DESC, name, id"
        );
        let nodes = sqlx::query_as::<_, Node>(&sql)
            .bind(parent_id)
            .bind(owner_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(nodes)
    }

    /// List the owner's top-level nodes (parent_id is NULL).
    pub async fn list_top_level(&self, owner_id: &str) -> Result<Vec<Node>> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM files
             WHERE parent_id IS NULL AND owner_id = ?
             ORDER BY is_folder DESC, name, id"
        );
        let nodes = sqlx::query_as::<_, Node>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(nodes)
    }

    /// List every trashed node of the owner, at any level.
    pub async fn list_trashed(&self, owner_id: &str) -> Result<Vec<Node>> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM files
             WHERE is_trash = 1 AND owner_id = ?
             ORDER BY created_at, id"
        );
        let nodes = sqlx::query_as::<_, Node>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(nodes)
    }

    /// Delete a node's row and return it.
    pub async fn delete_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        let sql = format!("DELETE FROM files WHERE id = ? AND owner_id = ? RETURNING {NODE_COLUMNS}");
        let node = sqlx::query_as::<_, Node>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(node)
    }

    /// Flip the starred flag.
    pub async fn toggle_starred(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        self.toggle_flag("is_starred", id, owner_id).await
    }

    /// Flip the trash flag.
    pub async fn toggle_trash(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        self.toggle_flag("is_trash", id, owner_id).await
    }

    async fn toggle_flag(&self, column: &str, id: &str, owner_id: &str) -> Result<Option<Node>> {
        let sql = format!(
            "UPDATE files SET {column} = NOT {column}, updated_at = datetime('now')
             WHERE id = ? AND owner_id = ?
             RETURNING {NODE_COLUMNS}"
        );
        let node = sqlx::query_as::<_, Node>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(node)
    }

    /// Count the owner's nodes.
    pub async fn count(&self, owner_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DroplyError::Database(e.to_string()))?;

        Ok(count.0)
    }
}

#[async_trait]
impl MetadataStore for NodeRepository<'_> {
    async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        NodeRepository::get_by_id(self, id, owner_id).await
    }

    async fn list_children(&self, parent_id: &str, owner_id: &str) -> Result<Vec<Node>> {
        NodeRepository::list_children(self, parent_id, owner_id).await
    }

    async fn delete_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        NodeRepository::delete_by_id(self, id, owner_id).await
    }
}
