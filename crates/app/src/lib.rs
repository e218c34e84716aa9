//! Soudan application composition root
//!
//! Composes the domain routers under `/api/v1` and wires stores, the auth
//! backend and the LLM provider together.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use soudan_accounts::{AccountsState, PgUserStore, UserStore};
use soudan_auth::{AuthBackend, AuthConfig, IdentityStore, PgIdentityStore};
use soudan_common::Config;
use soudan_conversations::{
    ConversationOrchestrator, ConversationsRepositories, ConversationsState, ReplyGenerator,
};
use soudan_llm::{LlmConfig, LlmService, LlmServiceFactory};
use sqlx::{migrate::Migrator, PgPool};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Everything the router needs, independent of where it is stored
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub identities: Arc<dyn IdentityStore>,
    pub conversations: ConversationsRepositories,
    pub llm: Arc<dyn LlmService>,
    pub auth_config: AuthConfig,
    /// Server-wide provider key for users without their own
    pub default_api_key: Option<String>,
}

/// Build the application router from already constructed services
pub fn build_router(services: AppServices) -> Router {
    let auth = AuthBackend::new(services.identities, services.auth_config);

    let orchestrator = ConversationOrchestrator::new(
        services.conversations.conversations.clone(),
        services.conversations.messages.clone(),
        ReplyGenerator::new(services.llm),
    )
    .with_default_api_key(services.default_api_key);

    let accounts_state = AccountsState {
        users: services.users,
        auth: auth.clone(),
    };

    let conversations_state = ConversationsState {
        repos: services.conversations,
        auth,
        orchestrator: Arc::new(orchestrator),
    };

    let api = Router::new()
        .merge(soudan_accounts::routes().with_state(accounts_state))
        .merge(soudan_conversations::routes().with_state(conversations_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
}

/// Create the main application router backed by PostgreSQL
pub fn create_app(config: &Config, llm_config: LlmConfig, pool: PgPool) -> anyhow::Result<Router> {
    let default_api_key = llm_config.default_api_key.clone();
    let llm = LlmServiceFactory::create(llm_config).context("Failed to create LLM service")?;

    let services = AppServices {
        users: Arc::new(PgUserStore::new(pool.clone())),
        identities: Arc::new(PgIdentityStore::new(pool.clone())),
        conversations: ConversationsRepositories::postgres(pool),
        llm: Arc::from(llm),
        auth_config: AuthConfig::new(config.jwt_secret.clone())
            .with_token_ttl_hours(config.jwt_ttl_hours),
        default_api_key,
    };

    Ok(build_router(services))
}

/// CORS policy: a single allowed origin when configured, permissive otherwise
pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let Some(origin) = config.cors_allowed_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ALLOWED_ORIGIN is not a valid origin: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
