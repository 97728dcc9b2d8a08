/* 📖 # Why map to separate DTO types?

The published documents follow the Swagger 1.2 wire shapes (camelCase keys, a fixed
`swaggerVersion`, vendor extensions inlined next to regular fields). The documentation model
stays close to how records are produced; the DTOs are what clients read. Mapping is the only
place where the request influences the output: relative base paths are resolved against the
documentation host, or the host the client used to reach the server.
*/

use std::collections::BTreeMap;

use apidocs_base::pal::http::HttpRequest;
use serde::Serialize;
use tracing::debug;

use crate::documentation::{
    ApiDescription, ApiInfo, ApiListing, ApiListingReference, AuthorizationScope,
    AuthorizationType, Model, ModelProperty, Operation, Parameter, ResourceListing,
    ResponseMessage,
};
use crate::extension::NormalizedExtensions;
use crate::normalizer::normalize_nodes;

pub const SWAGGER_VERSION: &str = "1.2";

const DEFAULT_SCHEME: &str = "http";

/// Serialized field names of [`InfoDto`]; extensions may not shadow them.
const INFO_FIELDS: &[&str] = &[
    "title",
    "description",
    "termsOfServiceUrl",
    "contact",
    "license",
    "licenseUrl",
];

/// Serialized field names of [`OperationDto`]; extensions may not shadow them.
const OPERATION_FIELDS: &[&str] = &[
    "method",
    "summary",
    "notes",
    "nickname",
    "position",
    "produces",
    "consumes",
    "protocols",
    "deprecated",
    "type",
    "parameters",
    "responseMessages",
];

/// The parts of an incoming request that affect mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    host: Option<String>,
    forwarded_proto: Option<String>,
}

impl RequestContext {
    pub fn new(host: Option<String>, forwarded_proto: Option<String>) -> Self {
        Self {
            host: host.filter(|host| !host.is_empty()),
            forwarded_proto: forwarded_proto.filter(|proto| !proto.is_empty()),
        }
    }

    /// Take the `Host` and `X-Forwarded-Proto` headers of a request.
    pub fn from_request(request: &HttpRequest) -> Self {
        let headers = request.headers();
        Self::new(
            headers.get("Host").cloned(),
            headers.get("X-Forwarded-Proto").cloned(),
        )
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn scheme(&self) -> &str {
        self.forwarded_proto.as_deref().unwrap_or(DEFAULT_SCHEME)
    }
}

/// Resolve a listing's base path to an absolute URL where possible.
///
/// Absolute base paths are returned unchanged, as are relative ones when neither the
/// documentation nor the request names a host.
///
/// ```
/// use apidocs_engine::mapper::{adjust_base_path, RequestContext};
///
/// let context = RequestContext::new(Some("docs.example.com".into()), Some("https".into()));
/// assert_eq!(adjust_base_path("/v1", "", &context), "https://docs.example.com/v1");
/// assert_eq!(adjust_base_path("/v1", "api.example.com", &context), "https://api.example.com/v1");
/// assert_eq!(adjust_base_path("http://other/v1", "", &context), "http://other/v1");
/// ```
pub fn adjust_base_path(base_path: &str, documentation_host: &str, context: &RequestContext) -> String {
    if base_path.contains("://") {
        return base_path.to_string();
    }
    let host = if documentation_host.is_empty() {
        context.host()
    } else {
        Some(documentation_host)
    };
    let Some(host) = host else {
        return base_path.to_string();
    };
    let separator = if base_path.is_empty() || base_path.starts_with('/') {
        ""
    } else {
        "/"
    };
    format!("{}://{}{}{}", context.scheme(), host, separator, base_path)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListingDto {
    pub swagger_version: String,
    pub api_version: String,
    pub apis: Vec<ApiListingReferenceDto>,
    pub authorizations: BTreeMap<String, AuthorizationTypeDto>,
    pub info: InfoDto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiListingReferenceDto {
    pub path: String,
    pub description: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub title: String,
    pub description: String,
    pub terms_of_service_url: String,
    pub contact: String,
    pub license: String,
    pub license_url: String,
    #[serde(flatten)]
    pub extensions: NormalizedExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationTypeDto {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyname: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<AuthorizationScopeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizationScopeDto {
    pub scope: String,
    pub description: String,
}

/// An API declaration as served, possibly merged from several fragments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListingDto {
    pub swagger_version: String,
    pub api_version: String,
    pub base_path: String,
    pub resource_path: String,
    pub description: String,
    pub position: i32,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    pub authorizations: BTreeMap<String, Vec<AuthorizationScopeDto>>,
    pub apis: Vec<ApiDescriptionDto>,
    pub models: BTreeMap<String, ModelDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDescriptionDto {
    pub path: String,
    pub description: String,
    pub operations: Vec<OperationDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDto {
    pub method: String,
    pub summary: String,
    pub notes: String,
    pub nickname: String,
    pub position: i32,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub protocols: Vec<String>,
    pub deprecated: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub response_class: Option<String>,
    pub parameters: Vec<ParameterDto>,
    pub response_messages: Vec<ResponseMessageDto>,
    #[serde(flatten)]
    pub extensions: NormalizedExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDto {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub allow_multiple: bool,
    pub param_type: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessageDto {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDto {
    pub id: String,
    pub description: String,
    pub required: Vec<String>,
    pub properties: BTreeMap<String, ModelPropertyDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPropertyDto {
    #[serde(rename = "type")]
    pub data_type: String,
    pub description: String,
    pub position: i32,
}

pub fn to_resource_listing_dto(listing: &ResourceListing) -> ResourceListingDto {
    let mut apis: Vec<_> = listing.apis.iter().map(to_reference_dto).collect();
    apis.sort_by_key(|reference| reference.position);
    ResourceListingDto {
        swagger_version: SWAGGER_VERSION.to_string(),
        api_version: listing.api_version.clone(),
        apis,
        authorizations: listing
            .authorizations
            .iter()
            .map(|authorization| (authorization.name.clone(), to_authorization_type_dto(authorization)))
            .collect(),
        info: to_info_dto(&listing.info),
    }
}

/// Map one listing fragment, resolving its base path for the given request.
pub fn to_api_listing_dto(
    listing: &ApiListing,
    documentation_host: &str,
    context: &RequestContext,
) -> ApiListingDto {
    ApiListingDto {
        swagger_version: SWAGGER_VERSION.to_string(),
        api_version: listing.api_version.clone(),
        base_path: adjust_base_path(&listing.base_path, documentation_host, context),
        resource_path: listing.resource_path.clone(),
        description: listing.description.clone(),
        position: listing.position,
        produces: listing.produces.clone(),
        consumes: listing.consumes.clone(),
        protocols: listing.protocols.clone(),
        authorizations: listing
            .authorizations
            .iter()
            .map(|(name, scopes)| (name.clone(), scopes.iter().map(to_scope_dto).collect()))
            .collect(),
        apis: listing
            .apis
            .iter()
            .filter(|api| !api.hidden)
            .map(to_api_description_dto)
            .collect(),
        models: listing
            .models
            .iter()
            .map(|(id, model)| (id.clone(), to_model_dto(id, model)))
            .collect(),
    }
}

/// Drop extensions that would repeat one of the DTO's own keys; the DTO field wins.
fn inline_extensions(mut extensions: NormalizedExtensions, fields: &[&str]) -> NormalizedExtensions {
    for field in fields {
        if extensions.remove(field).is_some() {
            debug!(key = *field, "Dropping vendor extension that shadows a field");
        }
    }
    extensions
}

fn to_reference_dto(reference: &ApiListingReference) -> ApiListingReferenceDto {
    ApiListingReferenceDto {
        path: reference.path.clone(),
        description: reference.description.clone(),
        position: reference.position,
    }
}

fn to_info_dto(info: &ApiInfo) -> InfoDto {
    InfoDto {
        title: info.title.clone(),
        description: info.description.clone(),
        terms_of_service_url: info.terms_of_service_url.clone(),
        contact: info.contact.clone(),
        license: info.license.clone(),
        license_url: info.license_url.clone(),
        extensions: inline_extensions(normalize_nodes(&info.vendor_extensions), INFO_FIELDS),
    }
}

fn to_authorization_type_dto(authorization: &AuthorizationType) -> AuthorizationTypeDto {
    AuthorizationTypeDto {
        kind: authorization.kind.clone(),
        pass_as: authorization.pass_as.clone(),
        keyname: authorization.keyname.clone(),
        scopes: authorization.scopes.iter().map(to_scope_dto).collect(),
    }
}

fn to_scope_dto(scope: &AuthorizationScope) -> AuthorizationScopeDto {
    AuthorizationScopeDto {
        scope: scope.scope.clone(),
        description: scope.description.clone(),
    }
}

fn to_api_description_dto(api: &ApiDescription) -> ApiDescriptionDto {
    let mut operations: Vec<_> = api.operations.iter().map(to_operation_dto).collect();
    operations.sort_by_key(|operation| operation.position);
    ApiDescriptionDto {
        path: api.path.clone(),
        description: api.description.clone(),
        operations,
    }
}

fn to_operation_dto(operation: &Operation) -> OperationDto {
    OperationDto {
        method: operation.method.clone(),
        summary: operation.summary.clone(),
        notes: operation.notes.clone(),
        nickname: operation.nickname.clone(),
        position: operation.position,
        produces: operation.produces.clone(),
        consumes: operation.consumes.clone(),
        protocols: operation.protocols.clone(),
        deprecated: operation.deprecated,
        response_class: operation.response_class.clone(),
        parameters: operation.parameters.iter().map(to_parameter_dto).collect(),
        response_messages: operation
            .response_messages
            .iter()
            .map(to_response_message_dto)
            .collect(),
        extensions: inline_extensions(
            normalize_nodes(&operation.vendor_extensions),
            OPERATION_FIELDS,
        ),
    }
}

fn to_parameter_dto(parameter: &Parameter) -> ParameterDto {
    ParameterDto {
        name: parameter.name.clone(),
        description: parameter.description.clone(),
        required: parameter.required,
        allow_multiple: parameter.allow_multiple,
        param_type: parameter.param_type.clone(),
        data_type: parameter.data_type.clone(),
        default_value: parameter.default_value.clone(),
    }
}

fn to_response_message_dto(message: &ResponseMessage) -> ResponseMessageDto {
    ResponseMessageDto {
        code: message.code,
        message: message.message.clone(),
        response_model: message.response_model.clone(),
    }
}

fn to_model_dto(key: &str, model: &Model) -> ModelDto {
    // models declared without an id fall back to their map key
    let id = if model.id.is_empty() { key } else { &model.id };
    ModelDto {
        id: id.to_string(),
        description: model.description.clone(),
        required: model.required.clone(),
        properties: model
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), to_model_property_dto(property)))
            .collect(),
    }
}

fn to_model_property_dto(property: &ModelProperty) -> ModelPropertyDto {
    ModelPropertyDto {
        data_type: property.data_type.clone(),
        description: property.description.clone(),
        position: property.position,
    }
}
