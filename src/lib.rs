//! Droply - personal file storage
//!
//! Files live with a hosted media provider; Droply keeps the folder tree
//! and deletes whole subtrees from both places.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{DroplyError, Result};
pub use file::{
    DeleteEngine, DeleteResult, DeleteStatus, FailedNode, FailureReason, FileService,
    ImageKitClient, MemoryObjectStore, MetadataStore, NewNode, Node, NodeRepository, ObjectStore,
    SubtreeResolver, TrashService, TrashSummary,
};
