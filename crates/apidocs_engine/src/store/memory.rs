/* 📖 # How does the in-memory store stay consistent under concurrent reads?

The published groups live in an immutable map behind an `Arc`. Readers take the read lock
just long enough to clone that `Arc` (or one record's `Arc`). Writers build a new map from
the current one and swap it in under the write lock. A reader therefore sees either the old
or the new set of groups, never a partly updated one, and a record it holds stays valid after
being replaced or removed.
*/

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::documentation::Documentation;
use crate::store::traits::DocumentationStore;

type Snapshot = Arc<HashMap<String, Arc<Documentation>>>;

/// A documentation store that keeps every group in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: RwLock<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut HashMap<String, Arc<Documentation>>),
    {
        let mut guard = self.snapshot.write();
        let mut next = HashMap::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
    }
}

impl DocumentationStore for InMemoryStore {
    fn lookup(&self, group: &str) -> Option<Arc<Documentation>> {
        self.snapshot.read().get(group).cloned()
    }

    fn publish(&self, documentation: Documentation) {
        debug!(group = documentation.group_name(), "Publishing documentation");
        self.update(|groups| {
            groups.insert(
                documentation.group_name().to_string(),
                Arc::new(documentation),
            );
        });
    }

    fn publish_all(&self, documentation: Vec<Documentation>) {
        let next: HashMap<_, _> = documentation
            .into_iter()
            .map(|documentation| {
                (
                    documentation.group_name().to_string(),
                    Arc::new(documentation),
                )
            })
            .collect();
        debug!(groups = next.len(), "Publishing documentation set");
        *self.snapshot.write() = Arc::new(next);
    }

    fn remove(&self, group: &str) -> Option<Arc<Documentation>> {
        let mut removed = None;
        self.update(|groups| removed = groups.remove(group));
        removed
    }

    fn clear(&self) {
        *self.snapshot.write() = Arc::default();
    }

    fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.current().keys().cloned().collect();
        names.sort();
        names
    }

    fn len(&self) -> usize {
        self.snapshot.read().len()
    }
}
