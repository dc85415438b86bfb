use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::auth;
use crate::db::Database;
use crate::models::User;

use super::errors::AppError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Mint an opaque session token.
fn new_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Build the session cookie carrying `token`.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Look up the user the request's session cookie points at, if any.
/// No cookie and a stale token both come back as `None`.
pub fn resolve(db: &Database, jar: &CookieJar) -> Result<Option<User>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    db.find_user_by_session_token(cookie.value())
        .map_err(AppError::Internal)
}

/// Check credentials and rotate the user's session token. Returns the user
/// and the fresh token to put in the cookie.
pub fn login(db: &Database, username: &str, password: &str) -> Result<(User, String), AppError> {
    let Some(user) = db.find_user_by_username(username).map_err(AppError::Internal)? else {
        tracing::warn!(username, "rejected login: unknown username");
        return Err(AppError::InvalidCredentials);
    };
    if !auth::verify_password(password, &user.password_hash).map_err(AppError::Internal)? {
        tracing::warn!(username, "rejected login: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = new_session_token();
    db.set_session_token(user.id, &token)
        .map_err(AppError::Internal)?;
    Ok((user, token))
}

/// Create an account and log it in. Returns the new user and its session
/// token; on any error no user row is created.
pub fn signup(
    db: &Database,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(User, String), AppError> {
    if password != confirm {
        return Err(AppError::PasswordMismatch);
    }
    if db
        .find_user_by_username(username)
        .map_err(AppError::Internal)?
        .is_some()
    {
        return Err(AppError::UsernameTaken);
    }

    let password_hash = auth::hash_password(password).map_err(AppError::Internal)?;
    let token = new_session_token();
    let user = db
        .insert_user(username, &password_hash, &token)
        .map_err(AppError::Internal)?;
    Ok((user, token))
}
