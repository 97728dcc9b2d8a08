/* 📖 # What is a Documentation record?

A Documentation record is everything the server knows about one group: the resource listing
shown at the root of the documentation, and the per-resource API listings keyed by their
declaration key. One declaration key can hold several listing fragments when the same
resource was discovered more than once; they are merged when served.

Records are produced outside the server (documentation files, or any code calling
`DocumentationCache::publish`) and never modified after publication.
*/

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::extension::ExtensionNode;

/// Name of the group used when a request does not name one.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// The assembled documentation of one group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    #[serde(default = "default_group_name")]
    group_name: String,
    #[serde(default)]
    resource_listing: ResourceListing,
    #[serde(default)]
    api_listings: BTreeMap<String, Vec<ApiListing>>,
    #[serde(default)]
    host: String,
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

impl Documentation {
    pub fn new(
        group_name: impl Into<String>,
        resource_listing: ResourceListing,
        api_listings: BTreeMap<String, Vec<ApiListing>>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            group_name: group_name.into(),
            resource_listing,
            api_listings,
            host: host.into(),
        }
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Replace the group name, e.g. with the name a record was configured under.
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    pub fn resource_listing(&self) -> &ResourceListing {
        &self.resource_listing
    }

    /// Listing fragments keyed by declaration key.
    pub fn api_listings(&self) -> &BTreeMap<String, Vec<ApiListing>> {
        &self.api_listings
    }

    /// Host of the service this documentation describes; may be empty.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Summary shown at the root of a group's documentation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceListing {
    pub api_version: String,
    pub apis: Vec<ApiListingReference>,
    pub info: ApiInfo,
    pub authorizations: Vec<AuthorizationType>,
}

/// Pointer from the resource listing to one API declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiListingReference {
    pub path: String,
    pub description: String,
    pub position: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub terms_of_service_url: String,
    pub contact: String,
    pub license: String,
    pub license_url: String,
    pub vendor_extensions: Vec<ExtensionNode>,
}

/// An authorization scheme declared in the resource listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationType {
    pub name: String,
    /// `apiKey`, `basicAuth` or `oauth2`.
    #[serde(rename = "type")]
    pub kind: String,
    pub pass_as: Option<String>,
    pub keyname: Option<String>,
    pub scopes: Vec<AuthorizationScope>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationScope {
    pub scope: String,
    pub description: String,
}

/// One fragment of an API declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiListing {
    pub api_version: String,
    pub base_path: String,
    pub resource_path: String,
    pub description: String,
    pub position: i32,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    /// Authorization scheme names, with the scopes required by this listing.
    pub authorizations: BTreeMap<String, Vec<AuthorizationScope>>,
    pub apis: Vec<ApiDescription>,
    pub models: BTreeMap<String, Model>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiDescription {
    pub path: String,
    pub description: String,
    pub hidden: bool,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    pub method: String,
    pub summary: String,
    pub notes: String,
    pub nickname: String,
    pub position: i32,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    pub deprecated: bool,
    pub response_class: Option<String>,
    pub parameters: Vec<Parameter>,
    pub response_messages: Vec<ResponseMessage>,
    pub vendor_extensions: Vec<ExtensionNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub allow_multiple: bool,
    /// `path`, `query`, `body`, `header` or `form`.
    pub param_type: String,
    pub data_type: String,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseMessage {
    pub code: u16,
    pub message: String,
    pub response_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Model {
    pub id: String,
    pub description: String,
    pub required: Vec<String>,
    pub properties: BTreeMap<String, ModelProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelProperty {
    #[serde(rename = "type")]
    pub data_type: String,
    pub description: String,
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_documentation() {
        let documentation: Documentation = serde_json::from_value(json!({})).unwrap();
        assert_eq!(documentation.group_name(), DEFAULT_GROUP_NAME);
        assert!(documentation.api_listings().is_empty());
        assert_eq!(documentation.host(), "");
    }

    #[test]
    fn test_deserialize_documentation_file() {
        let documentation: Documentation = serde_json::from_value(json!({
            "groupName": "store",
            "host": "petstore.example.com",
            "resourceListing": {
                "apiVersion": "1.0",
                "info": {"title": "Pet Store", "vendorExtensions": [
                    {"kind": "scalar", "name": "x-audience", "value": "public"}
                ]},
                "apis": [{"path": "/pets", "description": "Pets", "position": 0}]
            },
            "apiListings": {
                "pets": [{
                    "basePath": "/v1",
                    "resourcePath": "/pets",
                    "apis": [{
                        "path": "/pets/{id}",
                        "operations": [{"method": "GET", "nickname": "getPet",
                            "parameters": [{"name": "id", "paramType": "path", "dataType": "string", "required": true}],
                            "responseMessages": [{"code": 404, "message": "Pet not found"}]}]
                    }],
                    "models": {"Pet": {"id": "Pet", "properties": {"name": {"type": "string"}}}}
                }]
            }
        }))
        .unwrap();

        assert_eq!(documentation.group_name(), "store");
        assert_eq!(documentation.resource_listing().info.title, "Pet Store");
        assert_eq!(
            documentation.resource_listing().info.vendor_extensions,
            vec![ExtensionNode::scalar("x-audience", "public")]
        );
        let pets = &documentation.api_listings()["pets"];
        assert_eq!(pets.len(), 1);
        let operation = &pets[0].apis[0].operations[0];
        assert_eq!(operation.nickname, "getPet");
        assert!(operation.parameters[0].required);
        assert_eq!(operation.response_messages[0].code, 404);
        assert_eq!(pets[0].models["Pet"].properties["name"].data_type, "string");
    }

    #[test]
    fn test_with_group_name_overrides() {
        let documentation = Documentation::new(
            "store",
            ResourceListing::default(),
            BTreeMap::new(),
            "",
        )
        .with_group_name("default");
        assert_eq!(documentation.group_name(), "default");
    }
}
