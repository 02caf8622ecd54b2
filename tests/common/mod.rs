//! Common test utilities
//!
//! The protocol tests run the real router, guard, and services over an
//! in-memory `UserRepository`, swapped in through the `AppContext` trait.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::{middleware, Router};
use chrono::Utc;
use scim_bridge::domain::scim::ListFilter;
use scim_bridge::domain::{User, UserChanges, UserDraft};
use scim_bridge::error::{AppError, Result};
use scim_bridge::middleware::scim_auth_middleware;
use scim_bridge::repository::UserRepository;
use scim_bridge::scim::routes::scim_routes;
use scim_bridge::scim::service::ScimService;
use scim_bridge::service::LoginService;
use scim_bridge::state::AppContext;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "scim-test-secret";

/// In-memory directory store enforcing the same uniqueness contract as the
/// MySQL implementation.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn filter_matches(filter: &ListFilter, user: &User) -> bool {
    match filter {
        ListFilter::UserNameEq(user_name) => user.user_name == *user_name,
        ListFilter::All | ListFilter::Unsupported => true,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, draft: &UserDraft) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.user_name == draft.user_name) {
            return Err(AppError::Conflict(format!(
                "User with userName '{}' already exists",
                draft.user_name
            )));
        }
        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_name: draft.user_name.clone(),
            email: draft.email.clone(),
            name: draft.name.clone(),
            external_id: draft.external_id.clone(),
            active: draft.active,
            keycloak_id: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn find_by_keycloak_id(&self, keycloak_id: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.keycloak_id.as_deref() == Some(keycloak_id))
            .cloned())
    }

    async fn find_user_name_conflict(
        &self,
        user_name: &str,
        exclude_id: i64,
    ) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.user_name == user_name && u.id != exclude_id)
            .cloned())
    }

    async fn list(&self, filter: &ListFilter, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut matched: Vec<User> = users
            .iter()
            .filter(|u| filter_matches(filter, u))
            .cloned()
            .collect();
        matched.sort_by_key(|u| u.id);
        Ok(matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &ListFilter) -> Result<i64> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| filter_matches(filter, u)).count() as i64)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        if let Some(user_name) = &changes.user_name {
            if users.iter().any(|u| u.user_name == *user_name && u.id != id) {
                return Err(AppError::Conflict(format!(
                    "User with userName '{}' already exists",
                    user_name
                )));
            }
        }
        if let Some(keycloak_id) = &changes.keycloak_id {
            if users
                .iter()
                .any(|u| u.keycloak_id.as_deref() == Some(keycloak_id) && u.id != id)
            {
                return Err(AppError::Conflict(format!(
                    "User with keycloakId '{}' already exists",
                    keycloak_id
                )));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        if let Some(user_name) = &changes.user_name {
            user.user_name = user_name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = Some(email.clone());
        }
        if let Some(name) = &changes.name {
            user.name = Some(name.clone());
        }
        if let Some(external_id) = &changes.external_id {
            user.external_id = Some(external_id.clone());
        }
        if let Some(active) = changes.active {
            user.active = active;
        }
        if let Some(keycloak_id) = &changes.keycloak_id {
            user.keycloak_id = Some(keycloak_id.clone());
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct TestState {
    pub repo: Arc<InMemoryUserRepository>,
    pub scim_service: Arc<ScimService<InMemoryUserRepository>>,
    pub login_service: Arc<LoginService<InMemoryUserRepository>>,
}

impl TestState {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryUserRepository::new());
        Self {
            repo: repo.clone(),
            scim_service: Arc::new(ScimService::new(repo.clone())),
            login_service: Arc::new(LoginService::new(repo)),
        }
    }
}

impl Default for TestState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestState {
    type UserRepo = InMemoryUserRepository;

    fn scim_service(&self) -> &ScimService<Self::UserRepo> {
        &self.scim_service
    }

    fn login_service(&self) -> &LoginService<Self::UserRepo> {
        &self.login_service
    }

    fn scim_token(&self) -> &str {
        TEST_TOKEN
    }
}

/// The production router assembly over the test state.
pub fn test_router(state: TestState) -> Router {
    scim_routes::<TestState>()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            scim_auth_middleware::<TestState>,
        ))
        .with_state(state)
}

pub fn authed_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    request_with_token(method, uri, Some(TEST_TOKEN), body)
}

pub fn request_with_token(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "bridge.example.com");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/scim+json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
