use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{Role, User};

/// Identity and role snapshot bound into a session token. Immutable once
/// issued; a role change requires issuing a replacement token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable user identifier.
    pub sub: String,
    pub role: Role,
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry horizon, unix seconds (`iat` + max age).
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(
        subject_id: String,
        role: Role,
        email: String,
        issued_at: DateTime<Utc>,
        max_age: Duration,
    ) -> Self {
        Self {
            sub: subject_id,
            role,
            email,
            iat: issued_at.timestamp(),
            exp: (issued_at + max_age).timestamp(),
        }
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token structure could not be parsed.
    #[error("malformed session token")]
    Malformed,
    /// The signature does not match the claims.
    #[error("session token signature mismatch")]
    BadSignature,
    /// The token is past its expiry horizon.
    #[error("session token expired")]
    Expired,
}

/// Signs a fresh token for the user. The signature covers every claims field,
/// so the role cannot be tampered with client-side.
pub fn issue(user: &User, secret: &str, max_age: Duration) -> anyhow::Result<(String, SessionClaims)> {
    let claims = SessionClaims::new(
        user.id.clone(),
        user.role,
        user.email.clone(),
        Utc::now(),
        max_age,
    );
    let token = sign(&claims, secret)?;
    Ok((token, claims))
}

/// Signs a replacement token carrying the same identity with a fresh
/// issued-at, used when the policy engine decides re-validation is due.
pub fn reissue(
    claims: &SessionClaims,
    secret: &str,
    max_age: Duration,
) -> anyhow::Result<(String, SessionClaims)> {
    let fresh = SessionClaims::new(
        claims.sub.clone(),
        claims.role,
        claims.email.clone(),
        Utc::now(),
        max_age,
    );
    let token = sign(&fresh, secret)?;
    Ok((token, fresh))
}

fn sign(claims: &SessionClaims, secret: &str) -> anyhow::Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

/// Decodes and validates a session token. Expiry boundaries are exact: no
/// validation leeway is granted.
pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })?;

    // A token claiming to be issued in the future is not a clock-skew case we
    // honor; reject it outright.
    if data.claims.iat > Utc::now().timestamp() {
        return Err(TokenError::Malformed);
    }

    Ok(data.claims)
}
