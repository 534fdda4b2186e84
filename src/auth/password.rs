use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

const MIN_PASSWORD_LEN: usize = 8;
/// Upper bound keeps argon2 input (and register latency) bounded.
const MAX_PASSWORD_LEN: usize = 128;

/// Registration password policy; the error is the client-facing reason.
pub(crate) fn check_password_policy(plain: &str) -> Result<(), &'static str> {
    let len = plain.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err("Password too short");
    }
    if len > MAX_PASSWORD_LEN {
        return Err("Password too long");
    }
    Ok(())
}

/// PHC string (argon2id, default params, random salt) for storage in
/// `users.password_hash`.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow::anyhow!("stored password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
