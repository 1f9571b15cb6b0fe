use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::{
    middleware::security_headers,
    session::{
        routes::{self, HOME_PATH, LOGIN_PATH},
        token, SessionClaims,
    },
    state::AppState,
    utils::cookies::{build_session_cookie, extract_cookie_value, CookieOptions, SESSION_COOKIE_NAME},
};

/// Per-request authorization gate, layered over the whole router.
///
/// Every failure mode is a silent redirect, never an error surfaced to the
/// caller. Returns `Response` rather than `Result`; nothing here may
/// propagate an error into the handler chain.
pub async fn access_control(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let claims = extract_claims(&request, &state);
    let access = routes::required_access(&path);

    let mut response = match (&claims, access) {
        // Unauthenticated on a protected prefix; which validation step failed
        // is never leaked to the client.
        (None, Some(_)) => Redirect::temporary(LOGIN_PATH).into_response(),
        (Some(claims), Some(access)) if !access.permits(claims.role) => {
            tracing::debug!(
                subject = %claims.sub,
                role = %claims.role.as_str(),
                path = %path,
                "role mismatch on protected route"
            );
            Redirect::temporary(HOME_PATH).into_response()
        }
        (claims, _) => forward(claims.clone(), request, next, &state).await,
    };

    security_headers::apply(response.headers_mut());
    response
}

/// Pulls the session token out of the cookie carrier and validates it. Any
/// failure degrades to "no session"; malformed, forged, and expired tokens
/// are treated identically.
fn extract_claims(request: &Request, state: &AppState) -> Option<SessionClaims> {
    let raw_cookie = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())?;
    let token = extract_cookie_value(raw_cookie, SESSION_COOKIE_NAME)?;

    match token::verify(&token, &state.config.session_secret) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::debug!(error = %err, "rejecting session token");
            None
        }
    }
}

async fn forward(
    claims: Option<SessionClaims>,
    mut request: Request,
    next: Next,
    state: &AppState,
) -> Response {
    let Some(claims) = claims else {
        return next.run(request).await;
    };

    let status = state.policy.evaluate(&claims, Utc::now());
    request.extensions_mut().insert(claims.clone());
    let mut response = next.run(request).await;

    // Past the re-validation horizon the token is replaced, never mutated:
    // a freshly signed cookie rides along on the response.
    if status.needs_reissue {
        if let Some(cookie) = reissue_cookie(&claims, state) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }

    response
}

fn reissue_cookie(claims: &SessionClaims, state: &AppState) -> Option<HeaderValue> {
    let (token, _) = token::reissue(claims, &state.config.session_secret, state.policy.max_age())
        .map_err(|err| tracing::warn!(error = ?err, "failed to re-sign session token"))
        .ok()?;
    let cookie = build_session_cookie(
        &token,
        state.policy.max_age().to_std().ok()?,
        CookieOptions {
            secure: state.config.cookie_secure,
            same_site: state.config.cookie_same_site,
        },
    );
    HeaderValue::from_str(&cookie).ok()
}
