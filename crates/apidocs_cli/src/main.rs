/* 📖 # Why is the CLI a single optional argument?

`apidocs [path/to/apidocs.toml]` is all there is. Everything else (groups, base path, bind
address) lives in the configuration file, and documentation files are resolved relative to
the directory holding it. Without an argument, `./apidocs.toml` is used.

Exit codes:
- 0: the server was shut down
- 1: startup failed (configuration, documentation files, binding the socket)
*/

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use apidocs_base::pal::http::HttpServerConfig;
use apidocs_base::tracing::init_tracing;
use apidocs_base::{ApiDocsResult, FilePath, PalHandle, RealPal, ResultExt};
use apidocs_engine::{
    DocumentServer, DocumentService, DocumentationCache, JsonSerializer, load_config,
    load_documentation,
};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "apidocs.toml";

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let config_arg = env::args().nth(1).map(PathBuf::from);
    if let Err(e) = run(config_arg) {
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}

fn run(config_arg: Option<PathBuf>) -> ApiDocsResult<()> {
    let config_path = config_arg.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let (root, file_name) = split_config_path(&config_path)?;

    let pal = PalHandle::new(RealPal::new(root));
    let config = load_config(&pal, &FilePath::from(file_name.as_str()))?;
    info!(title = %config.title, groups = config.groups.len(), "Configuration loaded");

    let cache = DocumentationCache::in_memory();
    cache.publish_all(load_documentation(&pal, &config)?);
    info!(groups = ?cache.group_names(), "Documentation published");

    let server = DocumentServer::new(cache, JsonSerializer::new(config.pretty_json));
    let service = DocumentService::with_base_path(server, &config.base_path);

    let mut server_config = HttpServerConfig::new(&config.server.host);
    if let Some(port) = config.server.port {
        server_config = server_config.with_port(port);
    }
    let handle = pal
        .start_http_server(Box::new(service), server_config)
        .context("Failed to start documentation server")?;

    info!(
        address = %handle.address(&config.server.host),
        base_path = %config.base_path,
        "Serving documentation"
    );
    handle.wait();
    Ok(())
}

/// Split the configuration path into the directory files are read from and the file name.
fn split_config_path(path: &Path) -> ApiDocsResult<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| apidocs_base::err!("Invalid configuration path: {}", path.display()))?
        .to_string();
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => env::current_dir()
            .map_err(|e| apidocs_base::err!("Failed to get current directory: {}", e))?,
    };
    Ok((root, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_config_path() {
        let (root, file_name) = split_config_path(Path::new("site/docs/apidocs.toml")).unwrap();
        assert_eq!(root, PathBuf::from("site/docs"));
        assert_eq!(file_name, "apidocs.toml");

        let (root, file_name) = split_config_path(Path::new("apidocs.toml")).unwrap();
        assert_eq!(root, env::current_dir().unwrap());
        assert_eq!(file_name, "apidocs.toml");

        assert!(split_config_path(Path::new("/")).is_err());
    }
}
