//! HTTP middleware

pub mod scim_auth;

pub use scim_auth::scim_auth_middleware;
