//! orgchart-web library - HTTP front end for the org chart session
//!
//! Owns one shared [`Session`] and exposes it as a JSON API. The browser
//! front end (if configured) is served from a static directory.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use orgchart_common::auth::Authenticator;
use orgchart_common::store::RecordStore;
use orgchart_common::Session;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod api;
pub mod loader;
pub mod supabase;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store that mutations are mirrored to
    pub store: Arc<dyn RecordStore>,
    /// Login check for `/api/login`
    pub auth: Arc<dyn Authenticator>,
    /// The single editing session; actions are serialized through the lock
    pub session: Arc<Mutex<Session>>,
    /// Bearer tokens issued by login
    pub tokens: Arc<RwLock<HashSet<Uuid>>>,
    /// `false` lets every request through without a token
    pub auth_enabled: bool,
    /// Browser front end served at `/`
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        auth: Arc<dyn Authenticator>,
        session: Session,
        auth_enabled: bool,
    ) -> Self {
        Self {
            store,
            auth,
            session: Arc::new(Mutex::new(session)),
            tokens: Arc::new(RwLock::new(HashSet::new())),
            auth_enabled,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }
}

/// Build application router
///
/// `/health` and `/api/login` are public; every other `/api` route requires
/// a bearer token unless auth is disabled.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/logout", post(api::logout))
        .route("/api/view", get(api::current_view))
        .route("/api/view/root", get(api::root_view))
        .route("/api/drill", get(api::drill_view))
        .route("/api/actions", post(api::apply_action))
        .route("/api/options", get(api::picker_options))
        .route("/api/export", get(api::export_roster))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/login", post(api::login))
        .merge(api::health_routes());

    let static_dir = state.static_dir.clone();
    let mut router = Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
