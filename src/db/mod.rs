use rusqlite::{Connection, params};
use std::path::Path;

use crate::models::{Topic, User};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path).map_err(|e| format!("failed to open database: {e}"))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| format!("failed to set pragmas: {e}"))?;

        Ok(Database { conn })
    }

    /// Create the schema tables if they don't exist, then run any pending version-gated migrations.
    pub fn migrate(&self) -> Result<(), String> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                username      TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                session_token TEXT
            );

            CREATE TABLE IF NOT EXISTS topics (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                title     TEXT NOT NULL,
                text      TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_users_session_token ON users(session_token);
            CREATE INDEX IF NOT EXISTS idx_topics_author ON topics(author_id);
            ",
            )
            .map_err(|e| format!("migration failed: {e}"))?;

        // Ensure schema_version exists in config (fresh databases get version 0).
        self.conn
            .execute(
                "INSERT OR IGNORE INTO config (key, value) VALUES ('schema_version', '0')",
                [],
            )
            .map_err(|e| format!("failed to seed schema_version: {e}"))?;

        run_migrations(&self.conn)
    }

    // -- Users --

    pub fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        session_token: &str,
    ) -> Result<User, String> {
        self.conn
            .execute(
                "INSERT INTO users (username, password_hash, session_token) VALUES (?1, ?2, ?3)",
                params![username, password_hash, session_token],
            )
            .map_err(|e| format!("failed to insert user: {e}"))?;

        let id = self.conn.last_insert_rowid();
        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            session_token: Some(session_token.to_string()),
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, username, password_hash, session_token FROM users WHERE username = ?1",
            )
            .map_err(|e| format!("query error: {e}"))?;

        let mut rows = stmt
            .query_map(params![username], row_to_user)
            .map_err(|e| format!("query error: {e}"))?;

        match rows.next() {
            Some(Ok(user)) => Ok(Some(user)),
            Some(Err(e)) => Err(format!("query error: {e}")),
            None => Ok(None),
        }
    }

    pub fn find_user_by_session_token(&self, token: &str) -> Result<Option<User>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, username, password_hash, session_token FROM users WHERE session_token = ?1",
            )
            .map_err(|e| format!("query error: {e}"))?;

        let mut rows = stmt
            .query_map(params![token], row_to_user)
            .map_err(|e| format!("query error: {e}"))?;

        match rows.next() {
            Some(Ok(user)) => Ok(Some(user)),
            Some(Err(e)) => Err(format!("query error: {e}")),
            None => Ok(None),
        }
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, password_hash, session_token FROM users WHERE id = ?1")
            .map_err(|e| format!("query error: {e}"))?;

        let mut rows = stmt
            .query_map(params![id], row_to_user)
            .map_err(|e| format!("query error: {e}"))?;

        match rows.next() {
            Some(Ok(user)) => Ok(Some(user)),
            Some(Err(e)) => Err(format!("query error: {e}")),
            None => Ok(None),
        }
    }

    /// Overwrite the user's session token. Logging in from a second client
    /// invalidates the first session.
    pub fn set_session_token(&self, user_id: i64, token: &str) -> Result<(), String> {
        let rows_changed = self
            .conn
            .execute(
                "UPDATE users SET session_token = ?1 WHERE id = ?2",
                params![token, user_id],
            )
            .map_err(|e| format!("failed to update session token: {e}"))?;

        if rows_changed == 0 {
            return Err(format!("user not found: {user_id}"));
        }
        Ok(())
    }

    // -- Topics --

    pub fn insert_topic(&self, title: &str, text: &str, author_id: i64) -> Result<Topic, String> {
        self.conn
            .execute(
                "INSERT INTO topics (title, text, author_id) VALUES (?1, ?2, ?3)",
                params![title, text, author_id],
            )
            .map_err(|e| format!("failed to insert topic: {e}"))?;

        let id = self.conn.last_insert_rowid();
        Ok(Topic {
            id,
            title: title.to_string(),
            text: text.to_string(),
            author_id,
        })
    }

    pub fn get_topic(&self, id: i64) -> Result<Option<Topic>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, text, author_id FROM topics WHERE id = ?1")
            .map_err(|e| format!("query error: {e}"))?;

        let mut rows = stmt
            .query_map(params![id], row_to_topic)
            .map_err(|e| format!("query error: {e}"))?;

        match rows.next() {
            Some(Ok(topic)) => Ok(Some(topic)),
            Some(Err(e)) => Err(format!("query error: {e}")),
            None => Ok(None),
        }
    }

    pub fn update_topic(&self, id: i64, title: &str, text: &str) -> Result<(), String> {
        let rows_changed = self
            .conn
            .execute(
                "UPDATE topics SET title = ?1, text = ?2 WHERE id = ?3",
                params![title, text, id],
            )
            .map_err(|e| format!("update failed: {e}"))?;

        if rows_changed == 0 {
            return Err(format!("topic not found: {id}"));
        }
        Ok(())
    }

    pub fn delete_topic(&self, id: i64) -> Result<(), String> {
        let rows_changed = self
            .conn
            .execute("DELETE FROM topics WHERE id = ?1", params![id])
            .map_err(|e| format!("delete failed: {e}"))?;

        if rows_changed == 0 {
            return Err(format!("topic not found: {id}"));
        }
        Ok(())
    }

    pub fn count_topics(&self) -> Result<u64, String> {
        self.conn
            .query_row("SELECT COUNT(*) FROM topics", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as u64)
            .map_err(|e| format!("query error: {e}"))
    }

    /// One page of the listing, newest topic first.
    pub fn list_topics_page(&self, limit: u64, offset: u64) -> Result<Vec<Topic>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, text, author_id FROM topics ORDER BY id DESC LIMIT ?1 OFFSET ?2")
            .map_err(|e| format!("query error: {e}"))?;

        // Offsets far past the end must stay an empty page, not wrap negative.
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit as i64, offset], row_to_topic)
            .map_err(|e| format!("query error: {e}"))?;

        let mut topics = Vec::new();
        for row in rows {
            topics.push(row.map_err(|e| format!("row error: {e}"))?);
        }
        Ok(topics)
    }
}

/// Read the current schema version from the config table.
fn get_schema_version(conn: &Connection) -> Result<i32, String> {
    let mut stmt = conn
        .prepare("SELECT value FROM config WHERE key = 'schema_version'")
        .map_err(|e| format!("failed to read schema_version: {e}"))?;
    let mut rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| format!("failed to query schema_version: {e}"))?;
    match rows.next() {
        Some(Ok(v)) => v
            .parse::<i32>()
            .map_err(|e| format!("invalid schema_version value: {e}")),
        Some(Err(e)) => Err(format!("failed to read schema_version row: {e}")),
        None => Ok(0),
    }
}

/// Persist the schema version to the config table.
#[allow(dead_code)]
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), String> {
    conn.execute(
        "INSERT OR REPLACE INTO config (key, value) VALUES ('schema_version', ?1)",
        params![version.to_string()],
    )
    .map_err(|e| format!("failed to set schema_version: {e}"))?;
    Ok(())
}

/// Run all pending schema migrations in order.
///
/// Version 0 is the baseline created by the `CREATE TABLE IF NOT EXISTS`
/// block in `migrate()`. Future migrations are added here as
/// `if version < N { execute_batch(...); set_schema_version(conn, N)?; }`
/// blocks, each wrapped in a transaction.
fn run_migrations(conn: &Connection) -> Result<(), String> {
    let version = get_schema_version(conn)?;

    // v0 is the baseline -- no ALTER TABLE statements needed yet.
    let _ = version;

    Ok(())
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        session_token: row.get(3)?,
    })
}

fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        author_id: row.get(3)?,
    })
}
