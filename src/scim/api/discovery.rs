//! SCIM discovery endpoints (ServiceProviderConfig, ResourceTypes, Schemas)

use crate::domain::scim::{
    ScimResourceType, ScimSchemaAttribute, ScimSchemaDocument, ScimServiceProviderConfig, ScimUser,
};
use crate::scim::api::ScimJson;
use crate::state::AppContext;
use axum::response::IntoResponse;

/// GET /ServiceProviderConfig
pub async fn service_provider_config<S: AppContext>() -> impl IntoResponse {
    ScimJson(ScimServiceProviderConfig::default())
}

/// GET /ResourceTypes
pub async fn resource_types<S: AppContext>() -> impl IntoResponse {
    ScimJson(vec![ScimResourceType {
        schemas: vec!["urn:ietf:params:scim:schemas:core:2.0:ResourceType".to_string()],
        id: "User".to_string(),
        name: "User".to_string(),
        endpoint: "/Users".to_string(),
        description: "User Account".to_string(),
        schema: ScimUser::SCHEMA.to_string(),
    }])
}

/// GET /Schemas
pub async fn schemas<S: AppContext>() -> impl IntoResponse {
    ScimJson(vec![ScimSchemaDocument {
        id: ScimUser::SCHEMA.to_string(),
        name: "User".to_string(),
        description: "User Account".to_string(),
        attributes: vec![
            ScimSchemaAttribute {
                name: "userName".to_string(),
                attr_type: "string".to_string(),
                multi_valued: false,
                description: "Unique identifier for the User".to_string(),
                required: true,
                case_exact: Some(false),
                mutability: Some("readWrite".to_string()),
                returned: Some("default".to_string()),
                uniqueness: Some("server".to_string()),
                sub_attributes: None,
            },
            ScimSchemaAttribute {
                name: "name".to_string(),
                attr_type: "complex".to_string(),
                multi_valued: false,
                description: "The components of the user's real name".to_string(),
                required: false,
                case_exact: None,
                mutability: None,
                returned: None,
                uniqueness: None,
                sub_attributes: Some(vec![ScimSchemaAttribute {
                    name: "formatted".to_string(),
                    attr_type: "string".to_string(),
                    multi_valued: false,
                    description: "The full name".to_string(),
                    required: false,
                    case_exact: Some(false),
                    mutability: Some("readWrite".to_string()),
                    returned: Some("default".to_string()),
                    uniqueness: Some("none".to_string()),
                    sub_attributes: None,
                }]),
            },
        ],
    }])
}
