//! Stand-ins for the storefront pages. Rendering is an external collaborator;
//! these handlers exist so the access-control layer has something real to
//! gate.

use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use crate::session::SessionClaims;

pub async fn home() -> Json<Value> {
    Json(json!({ "page": "home" }))
}

pub async fn login_page() -> Json<Value> {
    Json(json!({ "page": "login" }))
}

pub async fn admin_dashboard(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({ "page": "admin_dashboard", "admin": claims.sub }))
}

pub async fn admin_reports(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({ "page": "admin_reports", "admin": claims.sub }))
}

pub async fn my_products(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({ "page": "my_products", "owner": claims.sub }))
}

pub async fn new_product_page(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({ "page": "new_product", "seller": claims.sub }))
}
