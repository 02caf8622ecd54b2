//! SCIM Bridge - identity provisioning and reconciliation
//!
//! Exposes a local user directory over SCIM 2.0 so IdPs (Keycloak, Okta)
//! can provision accounts, and maps authenticated IdP profiles onto
//! existing directory records at login time.

pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod scim;
pub mod server;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
