//! SCIM 2.0 protocol models (RFC 7643 / 7644 subset)

use serde::{Deserialize, Serialize};

/// SCIM User resource (RFC 7643 §4.1)
///
/// Doubles as the inbound payload for create/replace: `user_name` is an
/// `Option` so a missing attribute surfaces as a protocol-level 400 instead
/// of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimUser {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "externalId", default)]
    pub external_id: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ScimName>,
    #[serde(default)]
    pub emails: Vec<ScimEmail>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

impl ScimUser {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:schemas:core:2.0:User";
}

/// SCIM Name sub-attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimName {
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(rename = "givenName", default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(rename = "familyName", default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

/// SCIM Email sub-attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimEmail {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// SCIM Meta sub-attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimMeta {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub created: String,
    #[serde(rename = "lastModified")]
    pub last_modified: String,
    pub location: String,
}

/// SCIM ListResponse envelope (RFC 7644 §3.4.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimListResponse<T: Serialize> {
    pub schemas: Vec<String>,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    #[serde(rename = "startIndex")]
    pub start_index: i64,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: i64,
    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T: Serialize> ScimListResponse<T> {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

    pub fn new(resources: Vec<T>, total_results: i64, start_index: i64) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            total_results,
            start_index,
            items_per_page: resources.len() as i64,
            resources,
        }
    }
}

/// SCIM PatchOp request body (RFC 7644 §3.5.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimPatchOp {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<ScimPatchOperation>,
}

impl ScimPatchOp {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
}

/// Individual SCIM patch operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimPatchOperation {
    pub op: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// SCIM Error response (RFC 7644 §3.12)
///
/// `scim_type` serializes as a literal `null` when absent; only uniqueness
/// conflicts carry a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimError {
    pub schemas: Vec<String>,
    pub status: String,
    pub detail: String,
    #[serde(rename = "scimType")]
    pub scim_type: Option<String>,
}

impl ScimError {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:Error";

    pub fn new(status: u16, scim_type: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            status: status.to_string(),
            detail: detail.into(),
            scim_type: scim_type.map(|s| s.to_string()),
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(401, None, detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, None, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, None, detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, Some("uniqueness"), detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(500, None, detail)
    }
}

/// SCIM ServiceProviderConfig (RFC 7643 §5)
#[derive(Debug, Clone, Serialize)]
pub struct ScimServiceProviderConfig {
    pub schemas: Vec<String>,
    #[serde(rename = "documentationUri")]
    pub documentation_uri: String,
    pub patch: ScimSupported,
    pub bulk: ScimBulkSupported,
    pub filter: ScimFilterSupported,
    #[serde(rename = "changePassword")]
    pub change_password: ScimSupported,
    pub sort: ScimSupported,
    pub etag: ScimSupported,
    #[serde(rename = "authenticationSchemes")]
    pub authentication_schemes: Vec<ScimAuthScheme>,
}

impl Default for ScimServiceProviderConfig {
    fn default() -> Self {
        Self {
            schemas: vec![
                "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig".to_string(),
            ],
            documentation_uri: "https://tools.ietf.org/html/rfc7644".to_string(),
            patch: ScimSupported { supported: true },
            bulk: ScimBulkSupported {
                supported: false,
                max_operations: 0,
                max_payload_size: 0,
            },
            filter: ScimFilterSupported {
                supported: true,
                max_results: 100,
            },
            change_password: ScimSupported { supported: false },
            sort: ScimSupported { supported: false },
            etag: ScimSupported { supported: false },
            authentication_schemes: vec![ScimAuthScheme {
                name: "Bearer Token".to_string(),
                description: "Authentication scheme using the Bearer Token".to_string(),
                spec_uri: "https://tools.ietf.org/html/rfc6750".to_string(),
                scheme_type: "bearertoken".to_string(),
                primary: true,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimSupported {
    pub supported: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimBulkSupported {
    pub supported: bool,
    #[serde(rename = "maxOperations")]
    pub max_operations: i64,
    #[serde(rename = "maxPayloadSize")]
    pub max_payload_size: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimFilterSupported {
    pub supported: bool,
    #[serde(rename = "maxResults")]
    pub max_results: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimAuthScheme {
    pub name: String,
    pub description: String,
    #[serde(rename = "specUri")]
    pub spec_uri: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub primary: bool,
}

/// SCIM ResourceType definition (for /ResourceTypes)
#[derive(Debug, Clone, Serialize)]
pub struct ScimResourceType {
    pub schemas: Vec<String>,
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub description: String,
    pub schema: String,
}

/// SCIM resource schema definition (for /Schemas)
#[derive(Debug, Clone, Serialize)]
pub struct ScimSchemaDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub attributes: Vec<ScimSchemaAttribute>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimSchemaAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(rename = "multiValued")]
    pub multi_valued: bool,
    pub description: String,
    pub required: bool,
    #[serde(rename = "caseExact", skip_serializing_if = "Option::is_none")]
    pub case_exact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniqueness: Option<String>,
    #[serde(rename = "subAttributes", skip_serializing_if = "Option::is_none")]
    pub sub_attributes: Option<Vec<ScimSchemaAttribute>>,
}

/// Outcome of evaluating a list `filter` parameter.
///
/// The only supported clause is `userName eq "<value>"`. Everything else is
/// `Unsupported`, which the store treats the same as `All` — an IdP sending
/// a richer filter gets an unfiltered page rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ListFilter {
    All,
    UserNameEq(String),
    Unsupported,
}

/// Request context injected by the bearer guard after authentication
#[derive(Debug, Clone)]
pub struct ScimRequestContext {
    /// Externally visible base URL of the SCIM surface, used for
    /// `meta.location`
    pub base_url: String,
}

fn default_true() -> bool {
    true
}
