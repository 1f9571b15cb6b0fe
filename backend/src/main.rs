use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use unimarket_backend::{
    app::build_router,
    config::Config,
    models::user::{Role, User},
    repositories::users,
    services::audit_log::{AuditLogService, DocumentAuditSink},
    state::AppState,
    store::{DocumentStore, MemoryDocumentStore, StoreError},
    utils::password::hash_password,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unimarket_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        session_secret = %mask_secret(&config.session_secret),
        session_max_age_minutes = config.session_max_age_minutes,
        session_update_age_hours = config.session_update_age_hours,
        session_warning_minutes = config.session_warning_minutes,
        cookie_secure = config.cookie_secure,
        "Loaded configuration from environment/.env"
    );

    // The document store is an external collaborator; the in-process store
    // stands in for it here.
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    seed_admin(store.as_ref()).await?;

    let audit = AuditLogService::new(Arc::new(DocumentAuditSink::new(Arc::clone(&store))));
    let state = AppState::new(config, store, audit);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers(Any)
                    .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
            ),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Admin accounts are never self-assignable through registration; they are
/// provisioned from the environment at startup.
async fn seed_admin(store: &dyn DocumentStore) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let admin = User {
        id: Uuid::new_v4().to_string(),
        name: "Administrator".into(),
        email: email.clone(),
        password_hash: hash_password(&password)?,
        role: Role::Admin,
        created_at: Utc::now(),
    };

    match users::insert(store, &admin).await {
        Ok(()) => {
            tracing::info!(email = %email, "Seeded admin account");
            Ok(())
        }
        Err(StoreError::AlreadyExists { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
