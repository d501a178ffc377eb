//! Recursive subtree deletion.
//!
//! The engine walks a subtree depth-first with an explicit worklist and
//! deletes in post-order: every child is handled before its folder's own
//! row. A node's remote object is deleted before its metadata row, and a
//! failed remote delete keeps the row so the object stays reachable.
//!
//! Per-node failures are collected as values; the walk always continues
//! with the remaining siblings and only the aggregate [`DeleteResult`] is
//! returned.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::DeletionConfig;

use super::node::Node;
use super::object_store::ObjectStore;
use super::repository::MetadataStore;
use super::resolver::SubtreeResolver;
use super::DEFAULT_MAX_DEPTH;

/// Overall outcome of a subtree deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStatus {
    /// The root and everything below it were deleted.
    Ok,
    /// Some nodes survived.
    PartialFailure,
    /// The root does not exist for this owner.
    NotFound,
    /// The store failed while resolving the root; nothing was mutated.
    InternalError,
}

/// Why a node was not deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The node could not be found.
    NotFound,
    /// The object store refused to delete the node's remote object.
    RemoteDeleteFailed,
    /// The metadata store failed to list or delete the node.
    MetadataDeleteFailed,
    /// The node lies deeper than the configured maximum depth.
    DepthExceeded,
    /// The walk was cancelled or timed out before reaching the node.
    Cancelled,
}

impl FailureReason {
    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NotFound => "not_found",
            FailureReason::RemoteDeleteFailed => "remote_delete_failed",
            FailureReason::MetadataDeleteFailed => "metadata_delete_failed",
            FailureReason::DepthExceeded => "depth_exceeded",
            FailureReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node that survived the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedNode {
    /// Node id.
    pub id: String,
    /// Node name, or the id when the name was never loaded.
    pub name: String,
    /// Failure reason.
    pub reason: FailureReason,
    /// Underlying error message, if any.
    pub detail: Option<String>,
}

/// Aggregate result of [`DeleteEngine::delete_subtree`].
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Overall status.
    pub status: DeleteStatus,
    /// The root's row, when it was deleted.
    pub deleted: Option<Node>,
    /// Every node that was targeted but not removed.
    pub failures: Vec<FailedNode>,
    /// Number of metadata rows deleted.
    pub deleted_count: usize,
    /// Store error that prevented resolving the root.
    pub error: Option<String>,
}

impl DeleteResult {
    /// Whether the whole subtree is gone.
    pub fn is_ok(&self) -> bool {
        self.status == DeleteStatus::Ok
    }

    /// Names of the nodes that survived.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.name.as_str()).collect()
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        match self.status {
            DeleteStatus::Ok => format!("Deleted {} item(s)", self.deleted_count),
            DeleteStatus::NotFound => "File not found".to_string(),
            DeleteStatus::InternalError => format!(
                "Failed to delete file: {}",
                self.error.as_deref().unwrap_or("unknown error")
            ),
            DeleteStatus::PartialFailure => format!(
                "Deleted {} item(s), but failed to delete: {}",
                self.deleted_count,
                self.failed_names().join(", ")
            ),
        }
    }
}

/// Outcome for a single node.
#[derive(Debug)]
enum NodeOutcome {
    Deleted(Node),
    NotFound,
    RemoteDeleteFailed(String),
    MetadataDeleteFailed(String),
    DepthExceeded,
    Cancelled,
}

/// A node known by id, and by name once a parent listing has named it.
#[derive(Debug, Clone)]
struct NodeRef {
    id: String,
    name: Option<String>,
}

impl NodeRef {
    fn root(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
        }
    }
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: Some(node.name.clone()),
        }
    }
}

/// Worklist entry.
#[derive(Debug)]
enum Step {
    /// Resolve a node; folders schedule their children then a `Finish`.
    Visit { target: NodeRef, depth: usize },
    /// All children of a folder were handled; delete the folder itself.
    Finish { node: Node, depth: usize },
}

impl Step {
    fn target(&self) -> NodeRef {
        match self {
            Step::Visit { target, .. } => target.clone(),
            Step::Finish { node, .. } => NodeRef::from(node),
        }
    }

    fn is_root(&self) -> bool {
        match self {
            Step::Visit { depth, .. } | Step::Finish { depth, .. } => *depth == 0,
        }
    }
}

/// Running aggregate of one walk.
#[derive(Debug, Default)]
struct Tally {
    deleted: Option<Node>,
    failures: Vec<FailedNode>,
    deleted_count: usize,
    root_missing: bool,
    root_error: Option<String>,
}

impl Tally {
    fn record(&mut self, target: NodeRef, is_root: bool, outcome: NodeOutcome) {
        let (reason, detail) = match outcome {
            NodeOutcome::Deleted(node) => {
                self.deleted_count += 1;
                if is_root {
                    self.deleted = Some(node);
                }
                return;
            }
            NodeOutcome::NotFound if is_root => {
                self.root_missing = true;
                return;
            }
            NodeOutcome::NotFound => {
                debug!("Node {} already gone, skipping", target.id);
                return;
            }
            NodeOutcome::RemoteDeleteFailed(e) => (FailureReason::RemoteDeleteFailed, Some(e)),
            NodeOutcome::MetadataDeleteFailed(e) => {
                (FailureReason::MetadataDeleteFailed, Some(e))
            }
            NodeOutcome::DepthExceeded => (FailureReason::DepthExceeded, None),
            NodeOutcome::Cancelled => (FailureReason::Cancelled, None),
        };

        let name = target.name.unwrap_or_else(|| target.id.clone());
        self.failures.push(FailedNode {
            id: target.id,
            name,
            reason,
            detail,
        });
    }

    fn finish(self) -> DeleteResult {
        let status = if self.root_error.is_some() {
            DeleteStatus::InternalError
        } else if self.root_missing {
            DeleteStatus::NotFound
        } else if self.deleted.is_some() && self.failures.is_empty() {
            DeleteStatus::Ok
        } else {
            DeleteStatus::PartialFailure
        };

        DeleteResult {
            status,
            deleted: self.deleted,
            failures: self.failures,
            deleted_count: self.deleted_count,
            error: self.root_error,
        }
    }
}

/// Deletes a node and everything below it.
pub struct DeleteEngine<'a> {
    resolver: SubtreeResolver<'a>,
    metadata: &'a dyn MetadataStore,
    objects: &'a dyn ObjectStore,
    max_depth: usize,
    timeout: Option<Duration>,
}

impl<'a> DeleteEngine<'a> {
    /// Create an engine with the default depth limit and no timeout.
    pub fn new(metadata: &'a dyn MetadataStore, objects: &'a dyn ObjectStore) -> Self {
        Self {
            resolver: SubtreeResolver::new(metadata),
            metadata,
            objects,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: None,
        }
    }

    /// Apply the deletion settings from the configuration.
    pub fn with_config(self, config: &DeletionConfig) -> Self {
        let engine = self.with_max_depth(config.max_depth);
        if config.timeout_secs > 0 {
            engine.with_timeout(Duration::from_secs(config.timeout_secs))
        } else {
            engine
        }
    }

    /// Set the deepest level visited (the root is level 0).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set a time budget for a whole walk.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Delete the subtree rooted at `id`.
    pub async fn delete_subtree(&self, id: &str, owner_id: &str) -> DeleteResult {
        self.delete_subtree_with_cancel(id, owner_id, &CancellationToken::new())
            .await
    }

    /// Delete the subtree rooted at `id`, stopping early once `cancel` fires.
    ///
    /// After cancellation no further store call is issued and every pending
    /// node is reported as [`FailureReason::Cancelled`].
    pub async fn delete_subtree_with_cancel(
        &self,
        id: &str,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> DeleteResult {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let interrupted = || cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d);

        let mut tally = Tally::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![Step::Visit {
            target: NodeRef::root(id),
            depth: 0,
        }];

        while let Some(step) = stack.pop() {
            if interrupted() {
                warn!(
                    "Deletion of {} interrupted with {} pending step(s)",
                    id,
                    stack.len() + 1
                );
                tally.record(step.target(), step.is_root(), NodeOutcome::Cancelled);
                for pending in stack.drain(..).rev() {
                    tally.record(pending.target(), pending.is_root(), NodeOutcome::Cancelled);
                }
                break;
            }

            match step {
                Step::Visit { target, depth } => {
                    let is_root = depth == 0;

                    if depth > self.max_depth {
                        warn!(
                            "Node {} is deeper than the maximum depth {}, not deleting it",
                            target.id, self.max_depth
                        );
                        tally.record(target, is_root, NodeOutcome::DepthExceeded);
                        continue;
                    }

                    if !visited.insert(target.id.clone()) {
                        warn!("Node {} reached twice, parent links form a cycle", target.id);
                        continue;
                    }

                    let node = match self.resolver.resolve_node(&target.id, owner_id).await {
                        Ok(Some(node)) => node,
                        Ok(None) => {
                            tally.record(target, is_root, NodeOutcome::NotFound);
                            continue;
                        }
                        Err(e) if is_root => {
                            error!("Failed to resolve {}: {}", target.id, e);
                            tally.root_error = Some(e.to_string());
                            break;
                        }
                        Err(e) => {
                            error!("Failed to resolve {}: {}", target.id, e);
                            tally.record(
                                target,
                                is_root,
                                NodeOutcome::MetadataDeleteFailed(e.to_string()),
                            );
                            continue;
                        }
                    };

                    if !node.is_folder {
                        let outcome = self.delete_node(&node, owner_id).await;
                        tally.record(NodeRef::from(&node), is_root, outcome);
                        continue;
                    }

                    if interrupted() {
                        stack.push(Step::Visit {
                            target: NodeRef::from(&node),
                            depth,
                        });
                        continue;
                    }

                    match self.resolver.resolve_children(&node.id, owner_id).await {
                        Ok(children) => {
                            debug!("Folder {} has {} child(ren)", node.id, children.len());
                            stack.push(Step::Finish { node, depth });
                            for child in children.iter().rev() {
                                stack.push(Step::Visit {
                                    target: NodeRef::from(child),
                                    depth: depth + 1,
                                });
                            }
                        }
                        Err(e) => {
                            error!("Failed to list children of {}: {}", node.id, e);
                            tally.record(
                                NodeRef::from(&node),
                                is_root,
                                NodeOutcome::MetadataDeleteFailed(e.to_string()),
                            );
                        }
                    }
                }
                Step::Finish { node, depth } => {
                    let outcome = self.delete_node(&node, owner_id).await;
                    tally.record(NodeRef::from(&node), depth == 0, outcome);
                }
            }
        }

        let result = tally.finish();
        match result.status {
            DeleteStatus::Ok => info!(
                "Deleted subtree {} ({} row(s))",
                id, result.deleted_count
            ),
            DeleteStatus::NotFound => debug!("Subtree {} not found", id),
            _ => warn!(
                "Subtree {} deleted with {} failure(s): {}",
                id,
                result.failures.len(),
                result.summary()
            ),
        }
        result
    }

    /// Delete one node: remote object first, then its row.
    async fn delete_node(&self, node: &Node, owner_id: &str) -> NodeOutcome {
        if let Some(remote_id) = node.remote_object() {
            if let Err(e) = self.objects.delete_object(remote_id).await {
                warn!(
                    "Failed to delete remote object {} of {} ({}): {}",
                    remote_id, node.id, node.name, e
                );
                return NodeOutcome::RemoteDeleteFailed(e.to_string());
            }
            info!("Deleted remote object {} of {}", remote_id, node.id);
        }

        match self.metadata.delete_by_id(&node.id, owner_id).await {
            Ok(Some(row)) => {
                info!("Deleted node {} ({})", row.id, row.name);
                NodeOutcome::Deleted(row)
            }
            Ok(None) => NodeOutcome::NotFound,
            Err(e) => {
                error!("Failed to delete node {} ({}): {}", node.id, node.name, e);
                NodeOutcome::MetadataDeleteFailed(e.to_string())
            }
        }
    }
}
