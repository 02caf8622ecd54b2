//! Directory user entity and write models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user record in the local directory.
///
/// `user_name` is the SCIM uniqueness key and the external-facing login
/// handle. `keycloak_id` is the IdP-asserted subject identifier, bound
/// lazily on first successful login and unique when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub active: bool,
    pub keycloak_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_name: String::new(),
            email: None,
            name: None,
            external_id: None,
            active: true,
            keycloak_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field set for creating a user via SCIM provisioning.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub user_name: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub external_id: Option<String>,
}

/// Partial update set. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub user_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub external_id: Option<String>,
    pub keycloak_id: Option<String>,
}

impl UserChanges {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
