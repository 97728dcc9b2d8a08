use std::fmt;

use serde::Serialize;
use tracing::warn;

/// A serialized JSON document, ready to be written to a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json(String);

impl Json {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes DTOs for the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serialize `value`; a failure is logged and reported as `None`.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Option<Json> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        match result {
            Ok(json) => Some(Json(json)),
            Err(error) => {
                warn!(%error, "Failed to serialize document");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use std::collections::BTreeMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_compact_and_pretty() {
        let value = BTreeMap::from([("apiVersion", "1.0")]);
        assert_eq!(
            JsonSerializer::default().to_json(&value).unwrap().as_str(),
            r#"{"apiVersion":"1.0"}"#
        );
        assert_eq!(
            JsonSerializer::new(true).to_json(&value).unwrap().into_string(),
            "{\n  \"apiVersion\": \"1.0\"\n}"
        );
    }

    #[test]
    fn test_failure_is_none() {
        assert_eq!(JsonSerializer::default().to_json(&Unserializable), None);
    }
}
