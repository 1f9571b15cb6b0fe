use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, session::SessionClaims};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub price_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub title: String,
    pub price_cents: i64,
    pub seller_id: String,
}

/// Listing creation. The route only requires authentication; the seller-only
/// rule is enforced here, where the role is known from the verified claims.
pub async fn create_product(
    claims: Option<Extension<SessionClaims>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let Some(Extension(claims)) = claims else {
        return Err(AppError::Unauthorized("Not authenticated".into()));
    };
    if !claims.role.can_sell() {
        return Err(AppError::Forbidden("Only sellers can create listings".into()));
    }
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::BadRequest("Price cannot be negative".into()));
    }

    // Listing persistence belongs to the storefront CRUD layer, outside this
    // subsystem; only the authorization decision happens here.
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            price_cents: payload.price_cents,
            seller_id: claims.sub,
        }),
    ))
}
