/* 📖 # What does apidocs.toml configure?

The configuration names the documentation groups to serve and the files they are read from,
plus where and how they are served:

```toml
title = "Pet Store"
base_path = "/api-docs"
pretty_json = false

[server]
host = "127.0.0.1"
port = 8080

[[group]]
name = "default"
file = "docs/default.json"
```

Group files are resolved through the PAL, relative to its root.
*/

use std::collections::HashSet;

use apidocs_base::{ApiDocsError, ApiDocsResult, ErrorKind, FilePath, PalHandle, ResultExt};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::DEFAULT_BASE_PATH;

/// Configuration of a documentation server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Title shown in logs.
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub pretty_json: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// OS-assigned when absent.
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

/// One documentation group and the file holding it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    pub file: String,
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Config {
    /// Parse a configuration document; `path` is only used in error messages.
    pub fn parse(content: &str, path: &FilePath) -> ApiDocsResult<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            Box::new(ApiDocsError::new(ErrorKind::ParseError {
                path: path.as_path().to_path_buf(),
                message: e.message().to_string(),
            }))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ApiDocsResult<()> {
        if !self.base_path.starts_with('/') {
            apidocs_base::bail!("base_path must start with '/': {:?}", self.base_path);
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                apidocs_base::bail!("Group name must not be empty (file {})", group.file);
            }
            if !seen.insert(group.name.as_str()) {
                apidocs_base::bail!("Duplicate group name: {}", group.name);
            }
        }
        Ok(())
    }
}

/// Read and validate the configuration file at `path`.
#[instrument(skip(pal))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> ApiDocsResult<Config> {
    let content = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path))?;
    let config = Config::parse(&content, path)
        .with_context(|| format!("Invalid configuration {}", path))?;
    debug!(groups = config.groups.len(), "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidocs_base::MockPal;

    fn parse(content: &str) -> ApiDocsResult<Config> {
        Config::parse(content, &FilePath::from("apidocs.toml"))
    }

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.title, "");
        assert_eq!(config.base_path, "/api-docs");
        assert!(!config.pretty_json);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
title = "Pet Store"
base_path = "/docs"
pretty_json = true

[server]
host = "0.0.0.0"
port = 8080

[[group]]
name = "default"
file = "docs/default.json"

[[group]]
name = "admin"
file = "docs/admin.json"
"#,
        )
        .unwrap();

        assert_eq!(config.title, "Pet Store");
        assert_eq!(config.base_path, "/docs");
        assert!(config.pretty_json);
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(
            config.groups,
            vec![
                GroupConfig {
                    name: "default".to_string(),
                    file: "docs/default.json".to_string(),
                },
                GroupConfig {
                    name: "admin".to_string(),
                    file: "docs/admin.json".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = parse("title = ").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse apidocs.toml"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(parse("titel = \"typo\"").is_err());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            parse("base_path = \"docs\"").unwrap_err().to_string(),
            "base_path must start with '/': \"docs\""
        );
        assert_eq!(
            parse("[[group]]\nname = \"\"\nfile = \"a.json\"")
                .unwrap_err()
                .to_string(),
            "Group name must not be empty (file a.json)"
        );
        assert_eq!(
            parse("[[group]]\nname = \"a\"\nfile = \"a.json\"\n[[group]]\nname = \"a\"\nfile = \"b.json\"")
                .unwrap_err()
                .to_string(),
            "Duplicate group name: a"
        );
    }

    #[test]
    fn test_load_config_through_pal() {
        let mock = MockPal::new();
        mock.add_file(
            FilePath::from("apidocs.toml"),
            b"title = \"Pets\"\n[[group]]\nname = \"default\"\nfile = \"docs/default.json\"\n"
                .to_vec(),
        );
        let pal = PalHandle::new(mock);

        let config = load_config(&pal, &FilePath::from("apidocs.toml")).unwrap();
        assert_eq!(config.title, "Pets");
        assert_eq!(config.groups.len(), 1);

        let err = load_config(&pal, &FilePath::from("missing.toml")).unwrap_err();
        assert_eq!(err.get_context(), &["Failed to read configuration missing.toml".to_string()]);
    }
}
