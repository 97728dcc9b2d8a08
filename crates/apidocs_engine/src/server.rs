/* 📖 # Why do document requests return outcomes instead of errors?

A group that was never published, a declaration key the group does not have, or a document
that cannot be serialized are all things a client can trigger by asking for the wrong thing.
They are answered with "not found", not treated as failures, so they are plain enum variants.
The cause is still logged so a missing document can be explained from the logs.
*/

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::documentation::DEFAULT_GROUP_NAME;
use crate::json::{Json, JsonSerializer};
use crate::mapper::{RequestContext, to_api_listing_dto, to_resource_listing_dto};
use crate::merger::merged_api_listing;
use crate::store::DocumentationCache;

/// Result of a document request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Found(Json),
    /// The group is not published, or its document could not be serialized.
    NotFound,
    /// The group exists but has no listing for the declaration key.
    ListingNotFound,
}

impl DocumentOutcome {
    pub fn json(&self) -> Option<&Json> {
        match self {
            Self::Found(json) => Some(json),
            Self::NotFound | Self::ListingNotFound => None,
        }
    }
}

/// Looks up, merges and serializes the documents of published groups.
#[derive(Debug, Clone)]
pub struct DocumentServer {
    cache: DocumentationCache,
    serializer: JsonSerializer,
}

impl DocumentServer {
    pub fn new(cache: DocumentationCache, serializer: JsonSerializer) -> Self {
        Self { cache, serializer }
    }

    pub fn cache(&self) -> &DocumentationCache {
        &self.cache
    }

    /// The resource listing of `group`, or of the default group when none is given.
    #[instrument(skip(self))]
    pub fn resource_listing(&self, group: Option<&str>) -> DocumentOutcome {
        let group = group.unwrap_or(DEFAULT_GROUP_NAME);
        let Some(documentation) = self.cache.lookup(group) else {
            debug!(group, cause = "group not published", "Resource listing not found");
            return DocumentOutcome::NotFound;
        };
        let dto = to_resource_listing_dto(documentation.resource_listing());
        self.found(self.serializer.to_json(&dto))
    }

    /// The merged API listing stored under `declaration_key` in `group`.
    #[instrument(skip(self, context))]
    pub fn api_listing(
        &self,
        group: &str,
        declaration_key: &str,
        context: &RequestContext,
    ) -> DocumentOutcome {
        let Some(documentation) = self.cache.lookup(group) else {
            debug!(group, cause = "group not published", "API listing not found");
            return DocumentOutcome::NotFound;
        };
        let listings: BTreeMap<_, Vec<_>> = documentation
            .api_listings()
            .iter()
            .map(|(key, fragments)| {
                let dtos = fragments
                    .iter()
                    .map(|fragment| to_api_listing_dto(fragment, documentation.host(), context))
                    .collect();
                (key.as_str(), dtos)
            })
            .collect();
        let merged = listings
            .get(declaration_key)
            .and_then(|fragments| merged_api_listing(Some(fragments.as_slice())));
        let Some(merged) = merged else {
            debug!(
                group,
                declaration_key,
                cause = "declaration not found",
                "API listing not found"
            );
            return DocumentOutcome::ListingNotFound;
        };
        self.found(self.serializer.to_json(&merged))
    }

    fn found(&self, json: Option<Json>) -> DocumentOutcome {
        match json {
            Some(json) => DocumentOutcome::Found(json),
            None => {
                debug!(cause = "serialization failed", "Document not found");
                DocumentOutcome::NotFound
            }
        }
    }
}
