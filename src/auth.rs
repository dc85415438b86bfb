use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;

/// Hash a plaintext password into a PHC string with a random 16-byte salt.
/// Two calls with the same plaintext produce different strings.
pub fn hash_password(password: &str) -> Result<String, String> {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| format!("failed to encode salt: {e}"))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("failed to hash password: {e}"))
}

/// Check a plaintext password against a stored PHC string.
/// A wrong password is `Ok(false)`; a malformed stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| format!("invalid password hash: {e}"))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(format!("failed to verify password: {e}")),
    }
}
