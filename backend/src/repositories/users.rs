use serde_json::Value;

use crate::models::user::User;
use crate::store::{DocumentStore, StoreError};

const USERS_COLLECTION: &str = "users";

pub async fn find_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> anyhow::Result<Option<User>> {
    let Some(document) = store.get(USERS_COLLECTION, email).await? else {
        return Ok(None);
    };
    let user = serde_json::from_value(document)?;
    Ok(Some(user))
}

/// Insert-only; surfaces `AlreadyExists` unchanged so callers can map it to a
/// conflict response.
pub async fn insert(store: &dyn DocumentStore, user: &User) -> Result<(), StoreError> {
    let document: Value = serde_json::to_value(user)
        .map_err(|err| StoreError::Backend(format!("serialize user: {err}")))?;
    store.create(USERS_COLLECTION, &user.email, document).await
}
