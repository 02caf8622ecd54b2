//! Server initialization and routing

use crate::config::Config;
use crate::middleware::scim_auth_middleware;
use crate::repository::UserRepositoryImpl;
use crate::scim::routes::scim_routes;
use crate::scim::service::ScimService;
use crate::service::LoginService;
use crate::state::AppContext;
use anyhow::Result;
use axum::{middleware, Router};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub scim_service: Arc<ScimService<UserRepositoryImpl>>,
    pub login_service: Arc<LoginService<UserRepositoryImpl>>,
}

impl AppState {
    pub async fn from_config(config: Config) -> Result<Self> {
        let db_pool = MySqlPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await?;

        sqlx::migrate!("./migrations").run(&db_pool).await?;

        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            scim_service: Arc::new(ScimService::new(user_repo.clone())),
            login_service: Arc::new(LoginService::new(user_repo)),
        })
    }
}

impl AppContext for AppState {
    type UserRepo = UserRepositoryImpl;

    fn scim_service(&self) -> &ScimService<Self::UserRepo> {
        &self.scim_service
    }

    fn login_service(&self) -> &LoginService<Self::UserRepo> {
        &self.login_service
    }

    fn scim_token(&self) -> &str {
        &self.config.scim.token
    }
}

/// Assemble the router: SCIM routes behind the bearer guard, request
/// tracing outermost.
pub fn build_router(state: AppState) -> Router {
    scim_routes::<AppState>()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            scim_auth_middleware::<AppState>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let addr = config.http_addr();
    let state = AppState::from_config(config).await?;
    let router = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("SCIM bridge listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
