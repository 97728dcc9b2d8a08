/* 📖 # How are documentation files loaded?

Each configured group points at one JSON file holding a complete `Documentation` record.
The group name from the configuration replaces whatever name the file carries, so one file can
be served under several names. Every group is attempted; if any fail, all failures are
reported together so a broken setup is fixed in one pass.
*/

use apidocs_base::{ApiDocsError, ApiDocsResult, ErrorKind, FilePath, PalHandle, ResultExt};
use tracing::{debug, instrument, warn};

use crate::config::{Config, GroupConfig};
use crate::documentation::Documentation;

/// Load the documentation of every configured group.
#[instrument(skip_all, fields(groups = config.groups.len()))]
pub fn load_documentation(pal: &PalHandle, config: &Config) -> ApiDocsResult<Vec<Documentation>> {
    let mut loaded = Vec::with_capacity(config.groups.len());
    let mut errors = Vec::new();

    for group in &config.groups {
        match load_group(pal, group) {
            Ok(documentation) => loaded.push(documentation),
            Err(error) => {
                warn!(group = %group.name, error = %error, "Failed to load documentation");
                errors.push(*error);
            }
        }
    }

    if errors.is_empty() {
        return Ok(loaded);
    }
    let count = errors.len();
    Err(Box::new(ApiDocsError::new(ErrorKind::Multiple {
        errors,
        count,
    })))
}

fn load_group(pal: &PalHandle, group: &GroupConfig) -> ApiDocsResult<Documentation> {
    let path = FilePath::from(group.file.as_str());
    let content = pal
        .read_file_to_string(&path)
        .with_context(|| format!("Failed to read documentation for group '{}'", group.name))?;
    let documentation = parse_documentation(&content, &path)?.with_group_name(&group.name);
    debug!(
        group = %group.name,
        listings = documentation.api_listings().len(),
        "Loaded documentation"
    );
    Ok(documentation)
}

/// Parse a documentation file; `path` is only used in error messages.
pub fn parse_documentation(content: &str, path: &FilePath) -> ApiDocsResult<Documentation> {
    serde_json::from_str(content).map_err(|e| {
        Box::new(ApiDocsError::new(ErrorKind::ParseError {
            path: path.as_path().to_path_buf(),
            message: e.to_string(),
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidocs_base::MockPal;

    const PETS: &str = r#"{
        "groupName": "ignored",
        "resourceListing": {"apiVersion": "1.0"},
        "apiListings": {"pets": [{"resourcePath": "/pets"}]}
    }"#;

    fn config(groups: &[(&str, &str)]) -> Config {
        let mut toml = String::new();
        for (name, file) in groups {
            toml.push_str(&format!("[[group]]\nname = \"{}\"\nfile = \"{}\"\n", name, file));
        }
        Config::parse(&toml, &FilePath::from("apidocs.toml")).unwrap()
    }

    #[test]
    fn test_configured_name_overrides_file_name() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("docs/pets.json"), PETS.as_bytes().to_vec());
        let pal = PalHandle::new(mock);

        let loaded = load_documentation(
            &pal,
            &config(&[("default", "docs/pets.json"), ("mirror", "docs/pets.json")]),
        )
        .unwrap();

        let names: Vec<_> = loaded.iter().map(|d| d.group_name()).collect();
        assert_eq!(names, vec!["default", "mirror"]);
        assert_eq!(loaded[0].api_listings()["pets"][0].resource_path, "/pets");
    }

    #[test]
    fn test_failures_are_collected() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("docs/pets.json"), PETS.as_bytes().to_vec());
        mock.add_file(FilePath::from("docs/broken.json"), b"{\"apiListings\": 3}".to_vec());
        let pal = PalHandle::new(mock);

        let err = load_documentation(
            &pal,
            &config(&[
                ("default", "docs/pets.json"),
                ("broken", "docs/broken.json"),
                ("missing", "docs/missing.json"),
            ]),
        )
        .unwrap_err();

        match err.kind() {
            ErrorKind::Multiple { errors, count } => {
                assert_eq!(*count, 2);
                assert!(matches!(errors[0].kind(), ErrorKind::ParseError { .. }));
                assert_eq!(
                    errors[1].get_context(),
                    &["Failed to read documentation for group 'missing'".to_string()]
                );
            }
            other => panic!("expected multiple errors, got {}", other),
        }
        assert!(err.to_string().starts_with("Multiple errors occurred (2 total)"));
    }

    #[test]
    fn test_no_groups() {
        let pal = PalHandle::new(MockPal::new());
        assert!(load_documentation(&pal, &config(&[])).unwrap().is_empty());
    }
}
