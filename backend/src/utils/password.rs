//! Argon2 credential hashing for the login and registration flows.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hashes a password for storage on the account document. Each call salts
/// freshly, so equal passwords never share a hash.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("hashing credential failed: {err}"))?;
    Ok(hash.to_string())
}

/// Checks a login attempt against the stored hash. A non-matching password is
/// `Ok(false)`; an error means the stored hash itself is unusable and the
/// account needs operator attention.
pub fn verify_password(candidate: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| anyhow::anyhow!("stored credential hash is unusable: {err}"))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow::anyhow!("credential verification failed: {err}")),
    }
}
