//! Owner-scoped subtree lookups.

use crate::Result;

use super::node::Node;
use super::repository::MetadataStore;

/// Read-only view of a user's file tree.
///
/// A node owned by someone else resolves as absent; the resolver never
/// reveals that it exists.
pub struct SubtreeResolver<'a> {
    store: &'a dyn MetadataStore,
}

impl<'a> SubtreeResolver<'a> {
    /// Create a resolver over a metadata store.
    pub fn new(store: &'a dyn MetadataStore) -> Self {
        Self { store }
    }

    /// Load one node.
    pub async fn resolve_node(&self, id: &str, owner_id: &str) -> Result<Option<Node>> {
        self.store.get_by_id(id, owner_id).await
    }

    /// Load the direct children of a folder.
    ///
    /// Safe on non-folder ids, which simply have no children.
    pub async fn resolve_children(&self, folder_id: &str, owner_id: &str) -> Result<Vec<Node>> {
        self.store.list_children(folder_id, owner_id).await
    }
}
