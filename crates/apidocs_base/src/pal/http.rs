/* 📖 # Why a dedicated HTTP module in the PAL?

The documentation endpoints are plain request/response handlers. Keeping the HTTP value
types here lets the engine implement `HttpService` without depending on a server crate,
and lets MockPal drive services directly in tests.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use percent_encoding::percent_decode_str;

/// HTTP methods supported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl HttpMethod {
    /// Parse an HTTP method from a string.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Convert the method to its string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP headers collection. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    inner: HashMap<String, String>,
}

impl HttpHeaders {
    /// Create empty headers.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert a header.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Get a header value.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.inner.get(key).or_else(|| {
            self.inner
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        })
    }

    /// Check if a header exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.inner.iter()
    }
}

/// HTTP message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpBody(Vec<u8>);

impl HttpBody {
    /// Create an empty body.
    pub fn empty() -> Self {
        Self(vec![])
    }

    /// Get content as a string if valid UTF-8.
    pub fn as_string(&self) -> Option<String> {
        String::from_utf8(self.0.clone()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take ownership of the content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<String> for HttpBody {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for HttpBody {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// Decode a percent-encoded path segment or query value.
///
/// Invalid UTF-8 after decoding falls back to the raw input.
pub fn percent_decode(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// HTTP request structure.
///
/// `path` is the request target as received, including any query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    path: String,
    headers: HttpHeaders,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HttpHeaders::new(),
        }
    }

    /// Get the HTTP method.
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Get the request target, including the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request target without its query string.
    pub fn path_without_query(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// The raw query string, if present.
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, query)| query)
    }

    /// First value of a query parameter, percent-decoded (`+` is read as a space).
    ///
    /// A parameter present without a value (`?group`) yields an empty string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if percent_decode(key) == name {
                Some(percent_decode(&value.replace('+', " ")))
            } else {
                None
            }
        })
    }

    /// Get the request headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }
}

/// HTTP status codes used by the documentation server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusCode {
    Ok = 200,
    NotFound = 404,
    MethodNotAllowed = 405,
    /// Returned by the transport when a service fails with an error.
    NetworkConnectTimeoutError = 599,
}

impl HttpStatusCode {
    /// Get the numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// HTTP response structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: HttpStatusCode,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpResponse {
    /// Create a new response with the given status.
    pub fn new(status: HttpStatusCode) -> Self {
        Self {
            status,
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Create a 200 OK response.
    pub fn ok() -> Self {
        Self::new(HttpStatusCode::Ok)
    }

    /// Create a 404 Not Found response with an empty body.
    pub fn not_found() -> Self {
        Self::new(HttpStatusCode::NotFound)
    }

    /// Create a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::new(HttpStatusCode::MethodNotAllowed)
    }

    /// Get the status code.
    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Get the body.
    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Take ownership of the body.
    pub fn into_body(self) -> HttpBody {
        self.body
    }

    /// Set the response body.
    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the Content-Type header.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Create a 200 JSON response.
    pub fn json(body: impl Into<String>) -> Self {
        Self::ok()
            .with_content_type("application/json")
            .with_body(body.into())
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. If None, the OS will assign an available port.
    pub port: Option<u16>,
    /// Server name sent in the `Server` header.
    pub server_name: String,
}

impl HttpServerConfig {
    /// Create a new configuration with the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Get the address string (host:port, port 0 for OS-assigned).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(0))
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
            server_name: "apidocs".to_string(),
        }
    }
}

/// Trait for handling HTTP requests.
///
/// Errors are returned as `ApiDocsResult::Err` and converted to HTTP 599 responses by the
/// PAL implementation, which keeps them distinguishable from regular 4xx outcomes.
pub trait HttpService: std::fmt::Debug + Send + Sync + 'static {
    /// Handle an HTTP request and return a response.
    fn handle_request(&self, request: HttpRequest) -> crate::ApiDocsResult<HttpResponse>;
}

/// Handle to a running HTTP server.
///
/// Dropping the handle signals the server to shut down.
#[derive(Debug)]
pub struct HttpServerHandle {
    port: u16,
    shutdown: Arc<AtomicBool>,
}

impl HttpServerHandle {
    /// Create a new handle for the given port.
    pub fn new(port: u16) -> Self {
        Self::with_shutdown_flag(port, Arc::new(AtomicBool::new(false)))
    }

    /// Create a handle sharing an existing shutdown flag with the server loop.
    pub fn with_shutdown_flag(port: u16, shutdown: Arc<AtomicBool>) -> Self {
        Self { port, shutdown }
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the full address (host:port) the server is listening on.
    pub fn address(&self, host: &str) -> String {
        format!("{}:{}", host, self.port)
    }

    /// Signal the server to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if the server has been signaled to shut down.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Block the calling thread until the server is shut down.
    pub fn wait(&self) {
        while !self.is_shutdown() {
            std::thread::sleep(Duration::from_millis(200));
        }
    }
}

impl Drop for HttpServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("head"), Some(HttpMethod::Head));
        assert_eq!(HttpMethod::parse("BREW"), None);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn test_headers_lookup_ignores_case() {
        let request = HttpRequest::new(HttpMethod::Get, "/api-docs")
            .with_header("host", "docs.example.com:8080");
        assert_eq!(
            request.headers().get("Host"),
            Some(&"docs.example.com:8080".to_string())
        );
        assert!(request.headers().contains("HOST"));
        assert!(!request.headers().contains("X-Forwarded-Proto"));
    }

    #[test]
    fn test_query_param_parsing() {
        let request = HttpRequest::new(HttpMethod::Get, "/api-docs?format=json&group=pet%20store");
        assert_eq!(request.path_without_query(), "/api-docs");
        assert_eq!(request.query(), Some("format=json&group=pet%20store"));
        assert_eq!(request.query_param("group"), Some("pet store".to_string()));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_query_param_edge_cases() {
        let request = HttpRequest::new(HttpMethod::Get, "/api-docs?group&x=a+b&group=second");
        assert_eq!(request.query_param("group"), Some(String::new()));
        assert_eq!(request.query_param("x"), Some("a b".to_string()));

        let bare = HttpRequest::new(HttpMethod::Get, "/api-docs");
        assert_eq!(bare.query(), None);
        assert_eq!(bare.query_param("group"), None);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("pet%2Fstore"), "pet/store");
        assert_eq!(percent_decode("plain"), "plain");
        assert_eq!(percent_decode("%FF"), "%FF");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HttpResponse::ok().status().as_u16(), 200);
        assert_eq!(HttpResponse::not_found().status().as_u16(), 404);
        assert_eq!(HttpResponse::method_not_allowed().status().as_u16(), 405);
        assert_eq!(HttpStatusCode::NetworkConnectTimeoutError.as_u16(), 599);
    }

    #[test]
    fn test_request_carries_method_path_and_headers() {
        let request = HttpRequest::new(HttpMethod::Get, "/api-docs?group=default")
            .with_header("Host", "localhost");
        assert_eq!(
            request,
            HttpRequest::new(HttpMethod::Get, "/api-docs?group=default")
                .with_header("Host", "localhost")
        );
        assert_eq!(request.method(), &HttpMethod::Get);
        assert_eq!(request.path(), "/api-docs?group=default");
    }

    #[test]
    fn test_http_response_helpers() {
        let not_found = HttpResponse::not_found();
        assert_eq!(not_found.status(), HttpStatusCode::NotFound);
        assert!(not_found.body().is_empty());

        let json = HttpResponse::json("{\"apis\":[]}");
        assert_eq!(json.status().as_u16(), 200);
        assert_eq!(
            json.headers().get("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(json.body().as_string(), Some("{\"apis\":[]}".to_string()));
    }

    #[test]
    fn test_http_server_config() {
        let config = HttpServerConfig::new("0.0.0.0")
            .with_port(8080)
            .with_server_name("docs");
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.server_name, "docs");
        assert_eq!(HttpServerConfig::default().address(), "127.0.0.1:0");
    }

    #[test]
    fn test_http_server_handle_shutdown() {
        let flag = Arc::new(AtomicBool::new(false));
        let handle = HttpServerHandle::with_shutdown_flag(8080, flag.clone());
        assert_eq!(handle.address("127.0.0.1"), "127.0.0.1:8080");
        assert!(!handle.is_shutdown());
        handle.shutdown();
        handle.wait();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropping_handle_signals_shutdown() {
        let flag = Arc::new(AtomicBool::new(false));
        drop(HttpServerHandle::with_shutdown_flag(9000, flag.clone()));
        assert!(flag.load(Ordering::SeqCst));
    }
}
