/* 📖 # Why a single DocumentService for every documentation endpoint?

Both documents hang off one base path, share the same cache and serializer, and answer misses
the same way. One `HttpService` routes internally:
- `GET {base}?group={name}` -> resource listing (default group when `group` is absent or empty)
- `GET {base}/{group}/{declarationKey}` -> merged API listing
- any other path -> 404, any other method -> 405

Misses are regular 404 responses with an empty body. `Err` is reserved for failures of the
service itself, which the transport turns into HTTP 599.
*/

use apidocs_base::ApiDocsResult;
use apidocs_base::pal::http::{HttpMethod, HttpRequest, HttpResponse, HttpService, percent_decode};
use tracing::{debug, instrument};

use crate::mapper::RequestContext;
use crate::server::{DocumentOutcome, DocumentServer};

pub const DEFAULT_BASE_PATH: &str = "/api-docs";

/// Serves resource and API listings over HTTP.
#[derive(Debug, Clone)]
pub struct DocumentService {
    server: DocumentServer,
    base_path: String,
}

enum Route {
    ResourceListing { group: Option<String> },
    ApiListing { group: String, declaration_key: String },
    Unknown,
}

impl DocumentService {
    pub fn new(server: DocumentServer) -> Self {
        Self::with_base_path(server, DEFAULT_BASE_PATH)
    }

    /// Serve under `base_path` instead of `/api-docs`; a trailing slash is ignored.
    pub fn with_base_path(server: DocumentServer, base_path: impl Into<String>) -> Self {
        let base_path: String = base_path.into();
        Self {
            server,
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn route(&self, request: &HttpRequest) -> Route {
        let Some(rest) = request.path_without_query().strip_prefix(&self.base_path) else {
            return Route::Unknown;
        };
        if rest.is_empty() || rest == "/" {
            let group = request.query_param("group").filter(|group| !group.is_empty());
            return Route::ResourceListing { group };
        }
        let Some(rest) = rest.strip_prefix('/') else {
            return Route::Unknown;
        };
        match rest.split('/').collect::<Vec<_>>().as_slice() {
            [group, declaration_key] if !group.is_empty() && !declaration_key.is_empty() => {
                Route::ApiListing {
                    group: percent_decode(group),
                    declaration_key: percent_decode(declaration_key),
                }
            }
            _ => Route::Unknown,
        }
    }

    fn respond(outcome: DocumentOutcome) -> HttpResponse {
        match outcome {
            DocumentOutcome::Found(json) => HttpResponse::json(json.into_string()),
            DocumentOutcome::NotFound | DocumentOutcome::ListingNotFound => {
                HttpResponse::not_found()
            }
        }
    }
}

impl HttpService for DocumentService {
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    fn handle_request(&self, request: HttpRequest) -> ApiDocsResult<HttpResponse> {
        if request.method() != &HttpMethod::Get {
            debug!("Rejecting non-GET request");
            return Ok(HttpResponse::method_not_allowed().with_header("Allow", "GET"));
        }
        let outcome = match self.route(&request) {
            Route::ResourceListing { group } => self.server.resource_listing(group.as_deref()),
            Route::ApiListing {
                group,
                declaration_key,
            } => self.server.api_listing(
                &group,
                &declaration_key,
                &RequestContext::from_request(&request),
            ),
            Route::Unknown => {
                debug!("No documentation endpoint for path");
                DocumentOutcome::NotFound
            }
        };
        Ok(Self::respond(outcome))
    }
}
