//! HTTP service for the stock page.
//!
//! Routes:
//! - `GET /stock/{symbol}`: analyze a symbol and remember it as the latest input
//! - `GET /stock`: the latest input as plain text
//! - `GET /chart/{symbol}`: candlestick series and axis bounds for a symbol
//! - `GET /health`: liveness probe used by the page bootstrap
//! - `/pkg/*`: the compiled browser package
//! - everything else: the static page directory

mod routes;

use crate::core::monitor::StockMonitor;
use crate::domain::model::AppState;
use crate::utils::error::Result;
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct ServiceState {
    pub(crate) monitor: StockMonitor,
    pub(crate) app_state: Arc<Mutex<AppState>>,
}

impl ServiceState {
    pub fn new(monitor: StockMonitor, default_symbol: Option<String>) -> Self {
        Self {
            monitor,
            app_state: Arc::new(Mutex::new(AppState {
                user_input: default_symbol,
            })),
        }
    }

    pub fn latest_symbol(&self) -> Option<String> {
        let state = self
            .app_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.user_input.clone()
    }

    pub(crate) fn remember_symbol(&self, symbol: &str) {
        let mut state = self
            .app_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.user_input = Some(symbol.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct StaticDirs {
    pub www_dir: PathBuf,
    pub pkg_dir: PathBuf,
}

pub fn router(state: ServiceState, dirs: &StaticDirs) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stock/{symbol}", get(routes::analyze_stock))
        .route("/stock", get(routes::latest_symbol))
        .route("/chart/{symbol}", get(routes::chart))
        .route("/health", get(routes::health))
        .nest_service("/pkg", ServeDir::new(&dirs.pkg_dir))
        .fallback_service(ServeDir::new(&dirs.www_dir).append_index_html_on_directories(true))
        .layer(cors)
        .with_state(state)
}

pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await?;
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: ServiceState, dirs: StaticDirs) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!("🚀 Server running on http://{}/", address);
    tracing::debug!(
        "Serving page from {} and package from {}",
        dirs.www_dir.display(),
        dirs.pkg_dir.display()
    );

    axum::serve(listener, router(state, &dirs)).await?;
    Ok(())
}
