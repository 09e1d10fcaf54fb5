#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use label_core::RecordStore;
use tokio::sync::RwLock;

mod handlers;

pub use handlers::{AddedResponse, ImportResponse, StatusResponse};

/// Shared handle to the single in-memory store. Every handler takes the lock
/// once, so CRUD operations never interleave.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<RecordStore>>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn store(&self) -> &Arc<RwLock<RecordStore>> {
        &self.store
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("LABELS_BIND").unwrap_or(defaults.bind_addr),
            log_json: env_bool("LABELS_LOG_JSON", defaults.log_json),
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/labels", get(handlers::list_handler))
        .route("/add-label", post(handlers::add_handler))
        .route("/edit/:id", put(handlers::edit_handler))
        .route("/delete/:id", delete(handlers::delete_handler))
        .route("/clear", delete(handlers::clear_handler))
        .route("/import-labels", post(handlers::import_handler))
        .with_state(state)
}
