
use std::collections::HashMap;
use std::path::PathBuf;

use cucumber::World;

/// Shared state carried through each scenario.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ForumWorld {
    /// Temporary directory that owns the database file.
    pub db_dir: Option<tempfile::TempDir>,
    /// Path to the SQLite database file inside `db_dir`.
    pub db_path: Option<PathBuf>,
    /// Port of the scenario's in-process web server.
    pub server_port: Option<u16>,
    /// Handle of the server task.
    pub server_handle: Option<tokio::task::JoinHandle<()>>,
    /// HTTP client with a cookie store and redirects disabled, so that
    /// Set-Cookie and Location headers are assertable.
    pub client: reqwest::Client,
    /// Status of the most recent response.
    pub last_status: u16,
    /// Body of the most recent response.
    pub last_body: String,
    /// Location header of the most recent response, when present.
    pub last_location: Option<String>,
    /// session_token Set-Cookie header of the most recent response.
    pub last_session_cookie: Option<String>,
    /// CSRF token scraped from the most recent create-topic form.
    pub csrf_token: Option<String>,
    /// Topic title to database id map, populated by seeding steps.
    pub topic_ids: HashMap<String, i64>,
}

impl ForumWorld {
    fn new() -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build http client");

        ForumWorld {
            db_dir: None,
            db_path: None,
            server_port: None,
            server_handle: None,
            client,
            last_status: 0,
            last_body: String::new(),
            last_location: None,
            last_session_cookie: None,
            csrf_token: None,
            topic_ids: HashMap::new(),
        }
    }
}

#[tokio::main]
async fn main() {
    ForumWorld::run("tests/features").await;
}
