use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Application error type for web handlers. Auth and CSRF failures become
/// the redirects the browser flow expects; the rest map to status codes
/// with a plain-text body.
#[derive(Debug)]
pub enum AppError {
    /// Bad username or password at login.
    InvalidCredentials,
    /// Signup password confirmation does not match.
    PasswordMismatch,
    /// Signup username already registered.
    UsernameTaken,
    /// Anonymous request to a flow that requires a session.
    LoginRequired,
    /// Anonymous or non-author attempt to touch someone else's topic.
    Forbidden,
    /// Missing, expired, already-consumed, or foreign CSRF token.
    CsrfRejected,
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Username or password is incorrect.").into_response()
            }
            AppError::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                "Passwords don't match. Please try again.",
            )
                .into_response(),
            AppError::UsernameTaken => {
                (StatusCode::CONFLICT, "That username is already taken.").into_response()
            }
            AppError::LoginRequired | AppError::CsrfRejected => {
                Redirect::to("/login").into_response()
            }
            AppError::Forbidden => Redirect::to("/").into_response(),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
