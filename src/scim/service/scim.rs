//! Core SCIM service - orchestrates user CRUD against the directory store

use crate::domain::scim::{
    ScimListResponse, ScimPatchOp, ScimRequestContext, ScimUser,
};
use crate::domain::UserChanges;
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use std::sync::Arc;

use super::filter::parse_filter;
use super::mapper::{from_scim_user, to_scim_user};
use super::patch::interpret;

pub struct ScimService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> ScimService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// List users with optional filter and 1-based pagination.
    ///
    /// `start_index` is echoed verbatim in the envelope; the query clamps it
    /// to >= 1. `count` is expected pre-clamped by the handler.
    pub async fn list_users(
        &self,
        ctx: &ScimRequestContext,
        filter: Option<&str>,
        start_index: i64,
        count: i64,
    ) -> Result<ScimListResponse<ScimUser>> {
        let filter = parse_filter(filter);
        let offset = (start_index - 1).max(0);

        let users = self.repo.list(&filter, offset, count).await?;
        let total_results = self.repo.count(&filter).await?;

        let resources = users
            .iter()
            .map(|u| to_scim_user(u, &ctx.base_url))
            .collect();

        Ok(ScimListResponse::new(resources, total_results, start_index))
    }

    pub async fn get_user(&self, user_id: i64, ctx: &ScimRequestContext) -> Result<ScimUser> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(to_scim_user(&user, &ctx.base_url))
    }

    /// Create a user. The handle must be free; concurrent creates race at
    /// the unique index and the loser surfaces the same conflict.
    pub async fn create_user(
        &self,
        ctx: &ScimRequestContext,
        scim_user: ScimUser,
    ) -> Result<ScimUser> {
        let draft = from_scim_user(&scim_user)?;

        if self
            .repo
            .find_by_user_name(&draft.user_name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = self.repo.create(&draft).await?;
        tracing::info!(user_id = user.id, user_name = %user.user_name, "SCIM user created");

        Ok(to_scim_user(&user, &ctx.base_url))
    }

    /// Replace (PUT) a user: all mapped fields present in the payload are
    /// written; absent optional attributes leave stored values untouched.
    pub async fn replace_user(
        &self,
        user_id: i64,
        ctx: &ScimRequestContext,
        scim_user: ScimUser,
    ) -> Result<ScimUser> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let draft = from_scim_user(&scim_user)?;

        if self
            .repo
            .find_user_name_conflict(&draft.user_name, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("userName already exists".to_string()));
        }

        let changes = UserChanges {
            user_name: Some(draft.user_name),
            name: draft.name,
            email: draft.email,
            active: Some(draft.active),
            external_id: draft.external_id,
            keycloak_id: None,
        };

        let user = self.repo.update(user_id, &changes).await?;
        Ok(to_scim_user(&user, &ctx.base_url))
    }

    /// Patch a user: the operation list folds into one merged update.
    pub async fn patch_user(
        &self,
        user_id: i64,
        ctx: &ScimRequestContext,
        patch: ScimPatchOp,
    ) -> Result<ScimUser> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if patch.operations.is_empty() {
            return Err(AppError::BadRequest(
                "Operations array is required".to_string(),
            ));
        }

        let changes = interpret(&patch.operations);
        let user = self.repo.update(user_id, &changes).await?;

        Ok(to_scim_user(&user, &ctx.base_url))
    }

    pub async fn delete_user(&self, user_id: i64, _ctx: &ScimRequestContext) -> Result<()> {
        self.repo.delete(user_id).await?;
        tracing::info!(user_id, "SCIM user deleted");
        Ok(())
    }
}
