/* 📖 # Why a DocumentationStore trait behind the cache handle?

The server only needs to look groups up; whoever produces documentation needs to publish it.
The trait describes both sides so the request path does not care whether records come from
files loaded at startup or from code publishing them at runtime. `DocumentationCache` is the
owned, cheaply cloned handle that request threads share, following the `PalHandle` pattern.

Every method takes `&self`: implementations are expected to swap whole snapshots internally,
so readers never wait on a writer for longer than an `Arc` clone.
*/

use std::sync::Arc;

use crate::documentation::Documentation;

/// Storage of published documentation, keyed by group name.
pub trait DocumentationStore: Send + Sync + 'static {
    /// Documentation for a group, if published.
    fn lookup(&self, group: &str) -> Option<Arc<Documentation>>;

    /// Insert or replace the documentation of its group.
    fn publish(&self, documentation: Documentation);

    /// Replace the whole set of published groups at once.
    fn publish_all(&self, documentation: Vec<Documentation>);

    /// Remove a group, returning what was published for it.
    fn remove(&self, group: &str) -> Option<Arc<Documentation>>;

    fn clear(&self);

    /// Published group names in ascending order.
    fn group_names(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A shared handle to a documentation store.
///
/// ```
/// use apidocs_engine::{Documentation, DocumentationCache, DEFAULT_GROUP_NAME};
///
/// let cache = DocumentationCache::in_memory();
/// cache.publish(Documentation::new(DEFAULT_GROUP_NAME, Default::default(), Default::default(), ""));
/// assert!(cache.lookup(DEFAULT_GROUP_NAME).is_some());
/// assert!(cache.lookup("missing").is_none());
/// ```
#[derive(Clone)]
pub struct DocumentationCache(Arc<dyn DocumentationStore>);

impl DocumentationCache {
    pub fn new<S: DocumentationStore>(store: S) -> Self {
        Self(Arc::new(store))
    }

    /// A cache backed by an empty [`InMemoryStore`](crate::store::InMemoryStore).
    pub fn in_memory() -> Self {
        Self::new(crate::store::InMemoryStore::new())
    }

    pub fn lookup(&self, group: &str) -> Option<Arc<Documentation>> {
        self.0.lookup(group)
    }

    pub fn publish(&self, documentation: Documentation) {
        self.0.publish(documentation)
    }

    pub fn publish_all(&self, documentation: Vec<Documentation>) {
        self.0.publish_all(documentation)
    }

    pub fn remove(&self, group: &str) -> Option<Arc<Documentation>> {
        self.0.remove(group)
    }

    pub fn clear(&self) {
        self.0.clear()
    }

    pub fn group_names(&self) -> Vec<String> {
        self.0.group_names()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for DocumentationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentationCache")
            .field("groups", &self.group_names())
            .finish()
    }
}
