//! Login reconciliation
//!
//! Binds an authenticated IdP profile to an existing directory record.
//! Accounts are pre-provisioned (via SCIM, keyed by userName/email) and
//! bound permanently to the IdP subject id on first login. Login never
//! creates accounts.

use crate::domain::{User, UserChanges};
use crate::error::AppError;
use crate::repository::UserRepository;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Profile tuple handed over by a completed IdP authentication.
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    /// IdP-asserted stable subject identifier
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// How a profile resolved against the directory.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityMatch {
    /// Matched on the stored subject id binding
    ByStableId(User),
    /// Matched on `user_name == email` (pre-provisioned, not yet bound)
    ByEmail(User),
    Unmatched,
}

/// Login-path rejections. These are authentication denials with a
/// human-readable reason, not SCIM protocol errors.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("User not authorized. Please contact your administrator.")]
    NotProvisioned,

    #[error("User account is inactive.")]
    AccountInactive,

    #[error(transparent)]
    Store(#[from] AppError),
}

pub struct LoginService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> LoginService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Two-step lookup: stable subject id first, then email against the
    /// login handle. Never creates a record.
    pub async fn resolve(&self, profile: &ExternalProfile) -> Result<IdentityMatch, AppError> {
        if let Some(user) = self.repo.find_by_keycloak_id(&profile.subject_id).await? {
            return Ok(IdentityMatch::ByStableId(user));
        }

        if let Some(email) = &profile.email {
            if let Some(user) = self.repo.find_by_user_name(email).await? {
                return Ok(IdentityMatch::ByEmail(user));
            }
        }

        Ok(IdentityMatch::Unmatched)
    }

    /// Authenticate a profile against the directory.
    ///
    /// Rejections leave the directory untouched. On success the record is
    /// synchronized with the profile (subject id binding, email, display
    /// name) and returned; repeated logins converge to the same values.
    pub async fn login(&self, profile: &ExternalProfile) -> Result<User, LoginError> {
        let matched = match self.resolve(profile).await? {
            IdentityMatch::ByStableId(user) | IdentityMatch::ByEmail(user) => user,
            IdentityMatch::Unmatched => {
                warn!(
                    subject_id = %profile.subject_id,
                    email = profile.email.as_deref().unwrap_or(""),
                    "login rejected: user not found in directory"
                );
                return Err(LoginError::NotProvisioned);
            }
        };

        if !matched.active {
            warn!(user_name = %matched.user_name, "login rejected: user is inactive");
            return Err(LoginError::AccountInactive);
        }

        let changes = UserChanges {
            keycloak_id: Some(profile.subject_id.clone()),
            email: profile.email.clone(),
            name: profile.display_name.clone(),
            ..Default::default()
        };

        let user = self.repo.update(matched.id, &changes).await?;
        Ok(user)
    }
}
