/// A registered account. `session_token` holds the opaque token of the
/// user's current session, or `None` when the user has never logged in.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub session_token: Option<String>,
}

/// A forum post. `author_id` always references an existing user row.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub author_id: i64,
}
