//! Node types for Droply's file tree.

use chrono::{DateTime, Utc};

/// A file or folder metadata record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Node {
    /// Unique node ID (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Logical path shown to the user.
    pub path: String,
    /// Size in bytes (0 for folders).
    pub size: i64,
    /// MIME-ish type reported by the uploader, or "folder".
    pub file_type: String,
    /// Public URL of the stored bytes (empty for folders).
    pub file_url: String,
    /// Thumbnail URL, when the provider generated one.
    pub thumbnail_url: Option<String>,
    /// Provider-side object ID. `None` for folders and unfinished uploads.
    pub remote_object_id: Option<String>,
    /// Owner of this node.
    pub owner_id: String,
    /// Parent folder ID (None for top-level nodes).
    pub parent_id: Option<String>,
    /// Whether this node is a folder.
    pub is_folder: bool,
    /// Starred flag.
    pub is_starred: bool,
    /// Trash flag.
    pub is_trash: bool,
    /// When the node was created.
    pub created_at: String,
    /// When the node was last modified.
    pub updated_at: String,
}

impl Node {
    /// Get the created_at as DateTime<Utc>.
    pub fn created_at_datetime(&self) -> DateTime<Utc> {
        parse_sqlite_datetime(&self.created_at)
    }

    /// Get the updated_at as DateTime<Utc>.
    pub fn updated_at_datetime(&self) -> DateTime<Utc> {
        parse_sqlite_datetime(&self.updated_at)
    }

    /// The remote object this node owns, if any.
    ///
    /// Folders never own one even if the column was populated.
    pub fn remote_object(&self) -> Option<&str> {
        if self.is_folder {
            None
        } else {
            self.remote_object_id.as_deref()
        }
    }
}

/// Parse SQLite's `datetime('now')` format ("YYYY-MM-DD HH:MM:SS", UTC).
fn parse_sqlite_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Data for creating a new node.
#[derive(Debug, Clone)]
pub struct NewNode {
    /// Display name.
    pub name: String,
    /// Logical path.
    pub path: String,
    /// Size in bytes.
    pub size: i64,
    /// File type.
    pub file_type: String,
    /// Public URL.
    pub file_url: String,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Provider-side object ID.
    pub remote_object_id: Option<String>,
    /// Owner.
    pub owner_id: String,
    /// Parent folder.
    pub parent_id: Option<String>,
    /// Folder flag.
    pub is_folder: bool,
}

impl NewNode {
    /// Create a new file entry.
    pub fn file(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            file_type: super::DEFAULT_FILE_TYPE.to_string(),
            file_url: file_url.into(),
            thumbnail_url: None,
            remote_object_id: None,
            owner_id: owner_id.into(),
            parent_id: None,
            is_folder: false,
        }
    }

    /// Create a new folder entry.
    pub fn folder(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            file_type: super::FOLDER_FILE_TYPE.to_string(),
            file_url: String::new(),
            thumbnail_url: None,
            remote_object_id: None,
            owner_id: owner_id.into(),
            parent_id: None,
            is_folder: true,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the provider-side object ID.
    pub fn with_remote_object(mut self, remote_object_id: impl Into<String>) -> Self {
        self.remote_object_id = Some(remote_object_id.into());
        self
    }

    /// Set the size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Set the file type.
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Set the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }
}
