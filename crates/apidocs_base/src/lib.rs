/* 📖 # Why have apidocs_base as a core library?
apidocs_base provides the error handling, tracing setup and platform abstraction (files and
HTTP transport) used by the engine and the CLI, without knowing anything about documentation.
*/

pub mod error;
pub mod pal;
mod pal_tests;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ApiDocsError, ErrorKind, ResultExt};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};

/// Standard result type, re-exported under a crate-specific name.
pub type ApiDocsResult<T> = error::Result<T>;
