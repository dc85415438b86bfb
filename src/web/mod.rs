use crate::csrf::CsrfStore;
use crate::db::Database;
use axum::{
    Router,
    extract::Path as AxumPath,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use rust_embed::Embed;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

mod errors;
mod handlers;
mod session;
mod templates;

use errors::AppError;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub csrf: CsrfStore,
}

impl AppState {
    /// Run `f` against the locked database handle. The guard never crosses
    /// an await point.
    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T, AppError>) -> Result<T, AppError> {
        let db = self
            .db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))?;
        f(&db)
    }
}

/// Embedded static assets (stylesheet) compiled into the binary.
#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

/// Serve embedded static files at /static/{path}.
async fn static_handler(AxumPath(path): AxumPath<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = if path.ends_with(".js") {
                "application/javascript"
            } else if path.ends_with(".css") {
                "text/css"
            } else {
                "application/octet-stream"
            };
            ([(header::CONTENT_TYPE, mime)], content.data).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login_submit),
        )
        .route(
            "/signup",
            get(handlers::signup_form).post(handlers::signup_submit),
        )
        .route(
            "/create-topic",
            get(handlers::topic_create_form).post(handlers::topic_create_submit),
        )
        .route("/topic/{topic_id}", get(handlers::topic_detail))
        .route(
            "/topic/{topic_id}/edit",
            get(handlers::topic_edit_form).post(handlers::topic_edit_submit),
        )
        .route(
            "/topic/{topic_id}/delete",
            get(handlers::topic_delete_form).post(handlers::topic_delete_submit),
        )
        .route("/static/{*path}", get(static_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the database, connect the CSRF store, and serve on the given port.
pub async fn serve(
    db_path: &std::path::Path,
    redis_url: Option<&str>,
    port: u16,
) -> Result<(), String> {
    let db = Database::open(db_path)?;
    db.migrate()?;

    let csrf = match redis_url {
        Some(url) => CsrfStore::connect(url).await?,
        None => {
            tracing::warn!("REDIS_URL not set; CSRF tokens use an in-process store");
            CsrfStore::in_memory()
        }
    };

    let state = AppState {
        db: Arc::new(Mutex::new(db)),
        csrf,
    };
    let app = create_router(state);
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to bind to {addr}: {e}"))?;
    tracing::info!("forum listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
