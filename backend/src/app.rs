use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware, state::AppState};

/// Builds the application router with the access-control gate layered over
/// every route. Shared outer layers (trace, CORS) are added by the binary.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::session_status))
        .route("/api/products", post(handlers::products::create_product));

    let page_routes = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/login", get(handlers::pages::login_page))
        .route("/admin", get(handlers::pages::admin_dashboard))
        .route("/admin/dashboard", get(handlers::pages::admin_dashboard))
        .route("/admin/reports", get(handlers::pages::admin_reports))
        .route("/my-products", get(handlers::pages::my_products))
        .route("/products/new", get(handlers::pages::new_product_page));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::access_control,
        ))
        .with_state(state)
}
