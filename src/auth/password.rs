use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    /// Stand-in hash verified when no account matches, so a miss costs the
    /// same Argon2 work as a wrong password.
    static ref DUMMY_HASH: Option<String> = hash_password("placeholder-password").ok();
}

/// Argon2id hash in PHC string format, with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash unreadable");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies against `stored`, or against the stand-in hash when there is no
/// stored hash. A missing hash never matches.
pub fn verify_or_dummy(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(plain, dummy)?;
            }
            Ok(false)
        }
    }
}
