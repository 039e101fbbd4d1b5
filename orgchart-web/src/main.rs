//! orgchart-web - Org chart viewer/editor service
//!
//! Loads the roster from the hosted record store (or a local fallback file),
//! then serves the navigation and editing API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use orgchart_common::auth::Authenticator;
use orgchart_common::config::{resolve_config_path, OrgchartConfig};
use orgchart_common::store::{MemoryStore, RecordStore};
use orgchart_common::Session;
use orgchart_web::loader::load_initial_roster;
use orgchart_web::supabase::SupabaseStore;
use orgchart_web::{build_router, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "orgchart-web", version, about = "Org chart viewer/editor service")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, env = "ORGCHART_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = OrgchartConfig::load(config_path.as_deref())?;

    // Initialize tracing subscriber
    let default_level = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();

    info!("Starting orgchart-web v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let (store, auth): (Arc<dyn RecordStore>, Arc<dyn Authenticator>) =
        match SupabaseStore::new(&config.store) {
            Ok(client) => {
                info!("Record store: {} (table {})", config.store.url, config.store.table);
                let client = Arc::new(client);
                let store: Arc<dyn RecordStore> = client.clone();
                let auth: Arc<dyn Authenticator> = client;
                (store, auth)
            }
            Err(e) => {
                warn!("{}; running on an in-memory store", e);
                let memory = Arc::new(MemoryStore::new());
                let store: Arc<dyn RecordStore> = memory.clone();
                let auth: Arc<dyn Authenticator> = memory;
                (store, auth)
            }
        };

    let (roster, source) = load_initial_roster(store.as_ref(), &config).await;
    info!("Roster source: {:?} ({} people)", source, roster.len());

    if !config.auth.enabled {
        info!("API authentication disabled");
    }

    let session = Session::new(roster, config.root.clone());
    let state = AppState::new(store, auth, session, config.auth.enabled)
        .with_static_dir(config.server.static_dir.clone());
    let app = build_router(state);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("orgchart-web listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
