//! File management module for Droply.
//!
//! This module provides:
//! - File and folder metadata records (`Node`) and their repository
//! - The remote object store seam (ImageKit client, in-memory store)
//! - The recursive delete engine and the trash-emptying driver
//! - Upload registration, folder creation, listing and flag toggles

mod delete;
mod node;
mod object_store;
mod repository;
mod resolver;
mod service;
mod trash;

pub use delete::{DeleteEngine, DeleteResult, DeleteStatus, FailedNode, FailureReason};
pub use node::{NewNode, Node};
pub use object_store::{ImageKitClient, MemoryObjectStore, ObjectStore};
pub use repository::{MetadataStore, NodeRepository};
pub use resolver::SubtreeResolver;
pub use service::{FileService, UploadedObject};
pub use trash::{TrashService, TrashSummary};

/// Maximum length for file/folder names (in characters).
pub const MAX_NAME_LENGTH: usize = 255;

/// Default maximum subtree depth visited by the delete engine.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// File type recorded when the uploader does not report one.
pub const DEFAULT_FILE_TYPE: &str = "image";

/// File type recorded for folders.
pub const FOLDER_FILE_TYPE: &str = "folder";

/// Name recorded when the uploader does not report one.
pub const DEFAULT_FILE_NAME: &str = "untitled";
