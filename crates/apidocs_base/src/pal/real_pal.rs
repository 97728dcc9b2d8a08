use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::{ApiDocsError, ApiDocsResult, error::ErrorKind};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
    HttpStatusCode,
};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why std::fs and tiny_http instead of async crates?

Serving documentation is a lookup plus an in-memory transformation; nothing in a request
blocks on I/O beyond the socket itself. A synchronous server with one thread per request
covers that without an async runtime.
*/

/// How often the accept loop checks the shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Concrete PAL implementation using the real filesystem and a tiny_http server.
///
/// All file paths are resolved relative to a configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> ApiDocsResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.exists();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> ApiDocsResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(ApiDocsError::new(ErrorKind::FileError {
                path: resolved,
                source: e,
            }))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self, service), fields(address = %config.address()))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> ApiDocsResult<HttpServerHandle> {
        let server = tiny_http::Server::http(config.address()).map_err(|e| {
            Box::new(ApiDocsError::new(ErrorKind::HttpError {
                message: format!("failed to bind {}: {}", config.address(), e),
            }))
        })?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| crate::err!("HTTP server is not listening on an IP address"))?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let service: Arc<dyn HttpService> = Arc::from(service);
        let server_name = config.server_name.clone();
        let loop_shutdown = shutdown.clone();

        std::thread::Builder::new()
            .name(format!("http-accept-{}", port))
            .spawn(move || accept_loop(server, service, server_name, loop_shutdown))
            .map_err(|e| {
                Box::new(ApiDocsError::new(ErrorKind::HttpError {
                    message: format!("failed to spawn accept thread: {}", e),
                }))
            })?;

        info!(port, "HTTP server started");
        Ok(HttpServerHandle::with_shutdown_flag(port, shutdown))
    }
}

fn accept_loop(
    server: tiny_http::Server,
    service: Arc<dyn HttpService>,
    server_name: String,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let request = match server.recv_timeout(ACCEPT_POLL_INTERVAL) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, "failed to accept HTTP request");
                continue;
            }
        };
        let service = service.clone();
        let server_name = server_name.clone();
        // One worker thread per request; the service itself is shared read-only.
        if let Err(e) = std::thread::Builder::new()
            .name("http-worker".to_string())
            .spawn(move || handle_connection(request, service.as_ref(), &server_name))
        {
            error!(error = %e, "failed to spawn request worker");
        }
    }
    debug!("HTTP accept loop stopped");
}

fn handle_connection(request: tiny_http::Request, service: &dyn HttpService, server_name: &str) {
    let Some(method) = HttpMethod::parse(request.method().as_str()) else {
        warn!(method = %request.method(), "unsupported HTTP method");
        respond(
            request,
            HttpResponse::method_not_allowed(),
            server_name,
        );
        return;
    };

    let mut http_request = HttpRequest::new(method, request.url());
    for header in request.headers() {
        http_request = http_request.with_header(header.field.as_str().as_str(), header.value.as_str());
    }

    let response = match service.handle_request(http_request) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, url = request.url(), "service failed to handle request");
            HttpResponse::new(HttpStatusCode::NetworkConnectTimeoutError)
                .with_content_type("text/plain")
                .with_body(e.to_string())
        }
    };
    respond(request, response, server_name);
}

fn respond(request: tiny_http::Request, response: HttpResponse, server_name: &str) {
    let status = response.status().as_u16();
    let mut headers: Vec<tiny_http::Header> = response
        .headers()
        .iter()
        .filter_map(|(key, value)| tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()).ok())
        .collect();
    if let Ok(server) = tiny_http::Header::from_bytes(&b"Server"[..], server_name.as_bytes()) {
        headers.push(server);
    }
    let body = response.into_body().into_bytes();
    let length = body.len();
    let url = request.url().to_string();
    let tiny_response = tiny_http::Response::new(
        tiny_http::StatusCode(status),
        headers,
        Cursor::new(body),
        Some(length),
        None,
    );
    match request.respond(tiny_response) {
        Ok(()) => debug!(status, url = %url, "response sent"),
        Err(e) => warn!(error = %e, url = %url, "failed to write response"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, RealPal) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pal = RealPal::new(temp_dir.path().to_path_buf());
        (temp_dir, pal)
    }

    #[test]
    fn test_file_exists() {
        let (temp_dir, pal) = setup_test_dir();
        fs::write(temp_dir.path().join("apidocs.toml"), "title = 'x'").unwrap();

        assert!(pal.file_exists(&FilePath::from("apidocs.toml")).unwrap());
        assert!(!pal.file_exists(&FilePath::from("missing.toml")).unwrap());
    }

    #[test]
    fn test_read_file_to_string() {
        let (temp_dir, pal) = setup_test_dir();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        fs::write(temp_dir.path().join("docs/default.json"), "{}").unwrap();

        let content = pal
            .read_file_to_string(&FilePath::from("docs/default.json"))
            .unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_read_file_not_found() {
        let (_temp_dir, pal) = setup_test_dir();
        let err = pal
            .read_file(&FilePath::from("nonexistent.json"))
            .err()
            .expect("expected an error");
        assert!(matches!(err.kind(), ErrorKind::FileError { .. }));
    }

    #[derive(Debug)]
    struct EchoService;

    impl HttpService for EchoService {
        fn handle_request(&self, request: HttpRequest) -> ApiDocsResult<HttpResponse> {
            if request.path_without_query() == "/fail" {
                crate::bail!("deliberate failure");
            }
            Ok(HttpResponse::json(format!(
                "{{\"path\":\"{}\"}}",
                request.path_without_query()
            )))
        }
    }

    fn get(port: u16, path: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        write!(
            stream,
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_http_server_round_trip() {
        let (_temp_dir, pal) = setup_test_dir();
        let handle = pal
            .start_http_server(Box::new(EchoService), HttpServerConfig::default())
            .unwrap();
        assert_ne!(handle.port(), 0);

        let ok = get(handle.port(), "/api-docs?group=default");
        assert!(ok.starts_with("HTTP/1.1 200"));
        assert!(ok.contains("{\"path\":\"/api-docs\"}"));

        let failed = get(handle.port(), "/fail");
        assert!(failed.starts_with("HTTP/1.1 599"));
        assert!(failed.contains("deliberate failure"));

        handle.shutdown();
    }
}
