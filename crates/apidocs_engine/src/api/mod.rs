/* 📖 # Why an api module in apidocs_engine?

The api module exposes the document server over HTTP. Its service implements the
`HttpService` trait from apidocs_base, so it runs unchanged on RealPal (tiny_http) and on
MockPal in tests.
*/

mod service;

pub use service::{DEFAULT_BASE_PATH, DocumentService};
