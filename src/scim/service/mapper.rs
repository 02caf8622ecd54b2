//! SCIM representation mapper
//!
//! Bidirectional transform between the directory `User` entity and the SCIM
//! User wire shape. Used symmetrically by create and replace.

use crate::domain::scim::{ScimEmail, ScimMeta, ScimName, ScimUser};
use crate::domain::{User, UserDraft};
use crate::error::{AppError, Result};
use chrono::SecondsFormat;

/// Render a directory user as a SCIM User resource.
pub fn to_scim_user(user: &User, base_url: &str) -> ScimUser {
    let user_name = if user.user_name.is_empty() {
        user.email.clone().unwrap_or_default()
    } else {
        user.user_name.clone()
    };

    // givenName is the first whitespace token of the display name, familyName
    // the last; a single-token name yields both.
    let (given_name, family_name) = match user.name.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            let mut parts = name.split_whitespace();
            let given = parts.next().map(str::to_string);
            let family = name.split_whitespace().last().map(str::to_string);
            (given, family)
        }
        _ => (None, None),
    };

    let emails = match &user.email {
        Some(email) => vec![ScimEmail {
            value: email.clone(),
            email_type: None,
            primary: true,
        }],
        None => vec![],
    };

    ScimUser {
        schemas: vec![ScimUser::SCHEMA.to_string()],
        id: Some(user.id.to_string()),
        external_id: user.external_id.clone(),
        user_name: Some(user_name),
        name: Some(ScimName {
            formatted: user.name.clone(),
            given_name,
            family_name,
        }),
        emails,
        active: user.active,
        meta: Some(ScimMeta {
            resource_type: "User".to_string(),
            created: user
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            last_modified: user
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            location: format!("{}/Users/{}", base_url, user.id),
        }),
    }
}

/// Extract the directory field set from an inbound SCIM User payload.
///
/// `userName` is required. The display name prefers `name.formatted`, else
/// joins whichever of `givenName`/`familyName` are present. Absent optional
/// attributes stay `None` so a replace leaves the stored value untouched.
pub fn from_scim_user(scim_user: &ScimUser) -> Result<UserDraft> {
    let user_name = scim_user
        .user_name
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("userName is required".to_string()))?;

    let name = scim_user.name.as_ref().and_then(|n| {
        n.formatted
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| match (&n.given_name, &n.family_name) {
                (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
                (Some(given), None) => Some(given.clone()),
                (None, Some(family)) => Some(family.clone()),
                (None, None) => None,
            })
    });

    let email = scim_user.emails.first().map(|e| e.value.clone());

    Ok(UserDraft {
        user_name,
        name,
        email,
        active: scim_user.active,
        external_id: scim_user.external_id.clone(),
    })
}
