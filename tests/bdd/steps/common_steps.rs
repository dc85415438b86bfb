#![allow(deprecated)]
use cucumber::{given, then, when};

use crate::ForumWorld;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Absolute URL for `path` on the scenario's server.
pub fn server_url(world: &ForumWorld, path: &str) -> String {
    let port = world
        .server_port
        .expect("server not started — did you forget 'Given a running forum'?");
    format!("http://127.0.0.1:{port}{path}")
}

/// Open a second connection to the scenario's database, for seeding and
/// direct assertions. WAL mode keeps it happy alongside the server's own.
pub fn open_db(world: &ForumWorld) -> agora::db::Database {
    let path = world
        .db_path
        .as_ref()
        .expect("db_path not set — did you forget 'Given a running forum'?");
    agora::db::Database::open(path).expect("failed to open database")
}

/// Store status, Location, session Set-Cookie, and body of a response on
/// the world for later Then steps.
pub async fn record_response(world: &mut ForumWorld, response: reqwest::Response) {
    world.last_status = response.status().as_u16();
    world.last_location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    world.last_session_cookie = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_token="))
        .map(|v| v.to_string());
    world.last_body = response.text().await.expect("failed to read response body");
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

/// Start an in-process server on a random free port with a scratch database
/// and an in-process CSRF store, and stash the handles on the world.
#[given("a running forum")]
async fn a_running_forum(world: &mut ForumWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("forum.sqlite");

    let db = agora::db::Database::open(&db_path).expect("failed to open database");
    db.migrate().expect("migration failed");

    let state = agora::web::AppState {
        db: std::sync::Arc::new(std::sync::Mutex::new(db)),
        csrf: agora::csrf::CsrfStore::in_memory(),
    };
    let app = agora::web::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to ephemeral port");
    let port = listener
        .local_addr()
        .expect("failed to get local addr")
        .port();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("web server error in test");
    });

    world.db_path = Some(db_path);
    // Keep the TempDir alive for the lifetime of the scenario.
    world.db_dir = Some(dir);
    world.server_port = Some(port);
    world.server_handle = Some(handle);

    // Poll until the listener accepts requests so later steps don't race it.
    for _ in 0..20 {
        if world
            .client
            .get(server_url(world, "/"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }
}

// ---------------------------------------------------------------------------
// When / Then steps
// ---------------------------------------------------------------------------

#[when(expr = "I GET {string}")]
async fn i_get(world: &mut ForumWorld, path: String) {
    let response = world
        .client
        .get(server_url(world, &path))
        .send()
        .await
        .expect("request failed");
    record_response(world, response).await;
}

#[then(expr = "the response status is {int}")]
async fn response_status_is(world: &mut ForumWorld, status: u16) {
    assert_eq!(
        world.last_status, status,
        "unexpected status, body: {}",
        world.last_body
    );
}

#[then(expr = "the response body contains {string}")]
async fn body_contains(world: &mut ForumWorld, needle: String) {
    assert!(
        world.last_body.contains(&needle),
        "body does not contain {needle:?}: {}",
        world.last_body
    );
}

#[then(expr = "the response body does not contain {string}")]
async fn body_does_not_contain(world: &mut ForumWorld, needle: String) {
    assert!(
        !world.last_body.contains(&needle),
        "body unexpectedly contains {needle:?}"
    );
}

#[then(expr = "I am redirected to {string}")]
async fn redirected_to(world: &mut ForumWorld, target: String) {
    assert_eq!(
        world.last_status, 303,
        "expected a redirect, body: {}",
        world.last_body
    );
    assert_eq!(world.last_location.as_deref(), Some(target.as_str()));
}
