//! Emptying a user's trash.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DeletionConfig;
use crate::db::DbPool;
use crate::Result;

use super::delete::{DeleteEngine, DeleteStatus};
use super::object_store::ObjectStore;
use super::repository::NodeRepository;

/// Outcome of emptying the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashSummary {
    /// Trashed items removed completely.
    pub deleted_count: usize,
    /// Names of trashed items that were not removed completely.
    pub failed_names: Vec<String>,
    /// Top-level trashed items processed.
    pub total: usize,
}

impl TrashSummary {
    /// Whether every item was removed.
    pub fn is_ok(&self) -> bool {
        self.failed_names.is_empty()
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        if self.total == 0 {
            "No files in trash".to_string()
        } else if self.is_ok() {
            format!(
                "Trash emptied successfully, deleted {} file(s)",
                self.deleted_count
            )
        } else {
            format!(
                "Removed {} file(s), but failed to delete: {}",
                self.deleted_count,
                self.failed_names.join(", ")
            )
        }
    }
}

/// Deletes every trashed item of a user through the delete engine.
pub struct TrashService<'a> {
    pool: &'a DbPool,
    objects: &'a dyn ObjectStore,
    config: DeletionConfig,
}

impl<'a> TrashService<'a> {
    /// Create a new TrashService.
    pub fn new(pool: &'a DbPool, objects: &'a dyn ObjectStore) -> Self {
        Self {
            pool,
            objects,
            config: DeletionConfig::default(),
        }
    }

    /// Use the given deletion settings.
    pub fn with_config(mut self, config: &DeletionConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Delete every trashed subtree of `owner_id`.
    ///
    /// Items nested inside another trashed folder are removed with that
    /// folder rather than on their own. A single failing item never stops
    /// the others.
    pub async fn empty_trash(&self, owner_id: &str) -> Result<TrashSummary> {
        let repo = NodeRepository::new(self.pool);
        let trashed = repo.list_trashed(owner_id).await?;

        let trashed_ids: HashSet<&str> = trashed.iter().map(|n| n.id.as_str()).collect();
        let roots: Vec<_> = trashed
            .iter()
            .filter(|node| {
                node.parent_id
                    .as_deref()
                    .map_or(true, |parent| !trashed_ids.contains(parent))
            })
            .collect();

        let engine = DeleteEngine::new(&repo, self.objects).with_config(&self.config);
        let mut summary = TrashSummary {
            deleted_count: 0,
            failed_names: Vec::new(),
            total: roots.len(),
        };

        for node in roots {
            let result = engine.delete_subtree(&node.id, owner_id).await;
            match result.status {
                DeleteStatus::Ok => summary.deleted_count += 1,
                // Removed by an overlapping delete since the listing; gone is
                // the goal, so it is neither counted nor reported.
                DeleteStatus::NotFound => {
                    debug!("Trashed item {} already removed", node.id);
                }
                _ => {
                    warn!("Failed to empty {} from trash: {}", node.name, result.summary());
                    summary.failed_names.push(node.name.clone());
                }
            }
        }

        info!(
            "Emptied trash for {}: {} of {} item(s) removed",
            owner_id, summary.deleted_count, summary.total
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::db::Database;
    use crate::file::{MemoryObjectStore, NewNode};

    /// Object store whose first delete also removes another node's row,
    /// as a concurrent request would.
    struct RacingStore {
        pool: DbPool,
        owner: String,
        removes: HashMap<String, String>,
        raced: AtomicBool,
    }

    #[async_trait]
    impl ObjectStore for RacingStore {
        async fn delete_object(&self, remote_id: &str) -> Result<()> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                if let Some(other) = self.removes.get(remote_id) {
                    NodeRepository::new(&self.pool)
                        .delete_by_id(other, &self.owner)
                        .await?;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_messages() {
        let empty = TrashSummary {
            deleted_count: 0,
            failed_names: Vec::new(),
            total: 0,
        };
        assert_eq!(empty.message(), "No files in trash");
        assert!(empty.is_ok());

        let ok = TrashSummary {
            deleted_count: 2,
            failed_names: Vec::new(),
            total: 2,
        };
        assert_eq!(ok.message(), "Trash emptied successfully, deleted 2 file(s)");

        let partial = TrashSummary {
            deleted_count: 1,
            failed_names: vec!["b.png".to_string()],
            total: 2,
        };
        assert_eq!(partial.message(), "Removed 1 file(s), but failed to delete: b.png");
        assert!(!partial.is_ok());
    }

    #[tokio::test]
    async fn test_empty_trash_nothing_trashed() {
        let db = Database::open_in_memory().await.unwrap();
        let objects = MemoryObjectStore::new();
        let repo = NodeRepository::new(db.pool());
        repo.create(&NewNode::file("alice", "kept.png", "/kept.png", "u"))
            .await
            .unwrap();

        let summary = TrashService::new(db.pool(), &objects)
            .empty_trash("alice")
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(summary.message(), "No files in trash");
        assert_eq!(repo.count("alice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_nested_trashed_items_deleted_once() {
        let db = Database::open_in_memory().await.unwrap();
        let objects = MemoryObjectStore::new();
        let repo = NodeRepository::new(db.pool());

        let folder = repo
            .create(&NewNode::folder("alice", "Old", "/Old"))
            .await
            .unwrap();
        let inner = repo
            .create(
                &NewNode::file("alice", "inner.png", "/Old/inner.png", "u")
                    .with_parent(&folder.id)
                    .with_remote_object("ik_inner"),
            )
            .await
            .unwrap();
        repo.toggle_trash(&inner.id, "alice").await.unwrap();
        repo.toggle_trash(&folder.id, "alice").await.unwrap();

        let summary = TrashService::new(db.pool(), &objects)
            .empty_trash("alice")
            .await
            .unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.deleted_count, 1);
        assert!(summary.is_ok());
        assert_eq!(objects.delete_count("ik_inner"), 1);
        assert_eq!(repo.count("alice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_other_owner_trash_untouched() {
        let db = Database::open_in_memory().await.unwrap();
        let objects = MemoryObjectStore::new();
        let repo = NodeRepository::new(db.pool());

        let theirs = repo
            .create(&NewNode::file("bob", "b.png", "/b.png", "u"))
            .await
            .unwrap();
        repo.toggle_trash(&theirs.id, "bob").await.unwrap();

        let summary = TrashService::new(db.pool(), &objects)
            .empty_trash("alice")
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        assert!(repo.get_by_id(&theirs.id, "bob").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_root_removed_concurrently_is_skipped() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NodeRepository::new(db.pool());

        let a = repo
            .create(&NewNode::file("alice", "a.png", "/a.png", "u").with_remote_object("ik_a"))
            .await
            .unwrap();
        let b = repo
            .create(&NewNode::file("alice", "b.png", "/b.png", "u").with_remote_object("ik_b"))
            .await
            .unwrap();
        repo.toggle_trash(&a.id, "alice").await.unwrap();
        repo.toggle_trash(&b.id, "alice").await.unwrap();

        // Whichever root goes first takes the other one with it
        let objects = RacingStore {
            pool: db.pool().clone(),
            owner: "alice".to_string(),
            removes: HashMap::from([
                ("ik_a".to_string(), b.id.clone()),
                ("ik_b".to_string(), a.id.clone()),
            ]),
            raced: AtomicBool::new(false),
        };

        let summary = TrashService::new(db.pool(), &objects)
            .empty_trash("alice")
            .await
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.deleted_count, 1);
        assert!(summary.failed_names.is_empty());
        assert!(summary.is_ok());
        assert_eq!(repo.count("alice").await.unwrap(), 0);
    }
}
