//! SCIM route table
//!
//! Mounted behind `scim_auth_middleware` (bearer token, not a user
//! session); the guard layer is applied where the router is assembled.

use crate::scim::api as scim_api;
use crate::state::AppContext;
use axum::{routing::get, Router};

/// Mount point of the SCIM surface. Also the path component of
/// `meta.location` URLs.
pub const SCIM_BASE_PATH: &str = "/scim/v2";

pub fn scim_routes<S>() -> Router<S>
where
    S: AppContext,
{
    Router::new()
        // Discovery
        .route(
            "/scim/v2/ServiceProviderConfig",
            get(scim_api::discovery::service_provider_config::<S>),
        )
        .route(
            "/scim/v2/ResourceTypes",
            get(scim_api::discovery::resource_types::<S>),
        )
        .route("/scim/v2/Schemas", get(scim_api::discovery::schemas::<S>))
        // Users
        .route(
            "/scim/v2/Users",
            get(scim_api::users::list_users::<S>).post(scim_api::users::create_user::<S>),
        )
        .route(
            "/scim/v2/Users/{id}",
            get(scim_api::users::get_user::<S>)
                .put(scim_api::users::replace_user::<S>)
                .patch(scim_api::users::patch_user::<S>)
                .delete(scim_api::users::delete_user::<S>),
        )
}
