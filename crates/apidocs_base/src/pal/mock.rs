use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::ApiDocsError;
use crate::ApiDocsResult;
use crate::error::ErrorKind;

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::traits::{Pal, ReadSeek};

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use apidocs_base::{MockPal, Pal, FilePath};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("apidocs.toml"), b"title = 'Pets'".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("apidocs.toml")).unwrap();
/// assert_eq!(content, "title = 'Pets'");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    http_servers: Arc<Mutex<HashMap<u16, HttpServerInfo>>>,
    next_port: Arc<AtomicU16>,
}

/// Information about a registered HTTP server.
#[derive(Debug)]
struct HttpServerInfo {
    service: Arc<dyn HttpService>,
    _config: HttpServerConfig,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.files.lock().unwrap().insert(path, content);
    }

    /// Simulate an HTTP request to a running server.
    ///
    /// Looks up the service registered for `port` and invokes it on the calling thread.
    pub fn simulate_request(&self, port: u16, request: HttpRequest) -> ApiDocsResult<HttpResponse> {
        let service = {
            let servers = self.http_servers.lock().unwrap();
            servers
                .get(&port)
                .map(|info| info.service.clone())
                .ok_or_else(|| crate::err!("No HTTP server registered on port {}", port))?
        };
        service.handle_request(request)
    }

    /// Get the number of registered HTTP servers.
    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().unwrap().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> ApiDocsResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> ApiDocsResult<Box<dyn ReadSeek + 'static>> {
        let files = self.files.lock().unwrap();
        let content = files
            .get(path)
            .ok_or_else(|| {
                Box::new(ApiDocsError::new(ErrorKind::FileError {
                    path: path.as_path().to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("File not found: {}", path),
                    ),
                }))
            })?
            .clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> ApiDocsResult<HttpServerHandle> {
        let port = match config.port {
            Some(p) => p,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };
        let server_info = HttpServerInfo {
            service: Arc::from(service),
            _config: config,
        };
        self.http_servers.lock().unwrap().insert(port, server_info);
        Ok(HttpServerHandle::new(port))
    }
}
