//! Application state trait for dependency injection
//!
//! Handlers and middleware are generic over `AppContext` so the same code
//! runs against the production `AppState` and test states backed by other
//! `UserRepository` implementations.

use crate::repository::UserRepository;
use crate::scim::service::ScimService;
use crate::service::LoginService;

pub trait AppContext: Clone + Send + Sync + 'static {
    /// The user repository type backing the services
    type UserRepo: UserRepository;

    /// Get the SCIM orchestration service
    fn scim_service(&self) -> &ScimService<Self::UserRepo>;

    /// Get the login reconciliation service
    fn login_service(&self) -> &LoginService<Self::UserRepo>;

    /// Shared secret expected as the SCIM bearer token
    fn scim_token(&self) -> &str;
}
