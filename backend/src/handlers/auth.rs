use axum::{
    extract::{Extension, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        audit_log::AuditAction,
        user::{LoginRequest, LoginResponse, RegisterRequest, Role, User, UserResponse},
    },
    repositories::users,
    session::{token, SessionClaims},
    state::AppState,
    store::StoreError,
    utils::{
        cookies::{build_clear_cookie, build_session_cookie, CookieOptions},
        password::{hash_password, verify_password},
    },
};

/// Credential exchange. Wrong email and wrong password are indistinguishable
/// to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user = users::find_by_email(state.store.as_ref(), &payload.email)
        .await
        .map_err(AppError::InternalServerError)?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    let password_ok = verify_password(&payload.password, &user.password_hash)
        .map_err(AppError::InternalServerError)?;
    if !password_ok {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let mut metadata = Map::new();
    metadata.insert("email".into(), json!(user.email));
    metadata.insert("method".into(), json!("credentials"));
    state.audit.record(&user.id, AuditAction::SignIn, metadata);

    session_response(&state, user, StatusCode::OK)
}

/// Creates an account and signs it in. Admin is never self-assignable here;
/// admin accounts are provisioned out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let role = match Role::parse(&payload.role) {
        Some(role @ (Role::Buyer | Role::Seller)) => role,
        _ => return Err(AppError::BadRequest("Role must be buyer or seller".into())),
    };
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        password_hash: hash_password(&payload.password).map_err(AppError::InternalServerError)?,
        role,
        created_at: Utc::now(),
    };

    match users::insert(state.store.as_ref(), &user).await {
        Ok(()) => {}
        Err(StoreError::AlreadyExists { .. }) => {
            return Err(AppError::Conflict("Email already registered".into()))
        }
        Err(err) => return Err(AppError::InternalServerError(err.into())),
    }

    let mut metadata = Map::new();
    metadata.insert("email".into(), json!(user.email));
    metadata.insert("method".into(), json!("registration"));
    state.audit.record(&user.id, AuditAction::SignIn, metadata);

    session_response(&state, user, StatusCode::CREATED)
}

/// Clears the cookie unconditionally and succeeds even when unauthenticated;
/// the audit entry is only written for a known subject.
pub async fn logout(
    State(state): State<AppState>,
    claims: Option<Extension<SessionClaims>>,
) -> Result<Response, AppError> {
    if let Some(Extension(claims)) = claims {
        state
            .audit
            .record(&claims.sub, AuditAction::SignOut, Map::new());
    }

    let cookie = build_clear_cookie(cookie_options(&state));
    let response = (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Signed out" })),
    )
        .into_response();
    Ok(response)
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub is_active: bool,
    /// Issued-at of the current token, unix seconds.
    pub last_activity: i64,
    pub time_until_expiry_seconds: i64,
    pub is_expiring_soon: bool,
    pub user: SessionUser,
}

/// Identity facts carried by the token itself; the display name is not bound
/// into claims, so it is not reported here.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Point-in-time session status for the current token. An API route, so the
/// unauthenticated answer is a 401 body, not a redirect.
pub async fn session_status(
    State(state): State<AppState>,
    claims: Option<Extension<SessionClaims>>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let Some(Extension(claims)) = claims else {
        return Err(AppError::Unauthorized("Not authenticated".into()));
    };

    let status = state.policy.evaluate(&claims, Utc::now());
    Ok(Json(SessionStatusResponse {
        is_active: status.is_active,
        last_activity: status.last_activity,
        time_until_expiry_seconds: status.time_until_expiry.num_seconds(),
        is_expiring_soon: status.is_expiring_soon,
        user: SessionUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        },
    }))
}

fn session_response(
    state: &AppState,
    user: User,
    status: StatusCode,
) -> Result<Response, AppError> {
    let (token, _claims) = token::issue(&user, &state.config.session_secret, state.policy.max_age())
        .map_err(AppError::InternalServerError)?;

    let max_age = state
        .policy
        .max_age()
        .to_std()
        .map_err(|err| AppError::InternalServerError(err.into()))?;
    let cookie = build_session_cookie(&token, max_age, cookie_options(state));

    let body = Json(LoginResponse {
        user: UserResponse::from(user),
    });
    Ok((status, [(header::SET_COOKIE, cookie)], body).into_response())
}

fn cookie_options(state: &AppState) -> CookieOptions {
    CookieOptions {
        secure: state.config.cookie_secure,
        same_site: state.config.cookie_same_site,
    }
}
