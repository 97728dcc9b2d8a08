/* 📖 # What does apidocs_engine contain?

Everything between a published `Documentation` record and the JSON a client receives: the
vendor extension normalizer, the Swagger 1.2 DTO mapper, the listing merger, the shared
documentation cache, the document server and its HTTP service. Configuration and the file
loader live here too, so the CLI only wires them together.
*/

pub mod api;
pub mod config;
pub mod documentation;
pub mod extension;
pub mod json;
pub mod loader;
pub mod mapper;
pub mod merger;
pub mod normalizer;
pub mod server;
pub mod store;

pub use api::{DEFAULT_BASE_PATH, DocumentService};
pub use config::{Config, GroupConfig, ServerConfig, load_config};
pub use documentation::{ApiListing, DEFAULT_GROUP_NAME, Documentation, Operation, ResourceListing};
pub use extension::{ExtensionNode, ExtensionValue, NormalizedExtensions};
pub use json::{Json, JsonSerializer};
pub use loader::load_documentation;
pub use mapper::{ApiListingDto, RequestContext, ResourceListingDto};
pub use merger::merged_api_listing;
pub use normalizer::{normalize, normalize_nodes};
pub use server::{DocumentOutcome, DocumentServer};
pub use store::{DocumentationCache, DocumentationStore, InMemoryStore};
