use super::ServiceState;
use crate::core::chart::ChartLayout;
use crate::core::report::render_summary;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub(super) async fn analyze_stock(
    State(state): State<ServiceState>,
    Path(symbol): Path<String>,
) -> Response {
    state.remember_symbol(&symbol);

    match state.monitor.analyze_stock(&symbol).await {
        Ok(analysis) => {
            for line in render_summary(&analysis).lines() {
                tracing::info!("{}", line);
            }
            Json(analysis).into_response()
        }
        Err(e) => quote_failure(&symbol, e),
    }
}

fn quote_failure(symbol: &str, e: impl std::fmt::Display) -> Response {
    tracing::error!("❌ Analysis for {} failed: {}", symbol, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to get quotes: {}", e),
    )
        .into_response()
}

pub(super) async fn chart(State(state): State<ServiceState>, Path(symbol): Path<String>) -> Response {
    match state.monitor.analyze_stock(&symbol).await {
        Ok(analysis) => Json(ChartLayout::from_analysis(&analysis)).into_response(),
        Err(e) => quote_failure(&symbol, e),
    }
}

pub(super) async fn latest_symbol(State(state): State<ServiceState>) -> Response {
    match state.latest_symbol() {
        Some(symbol) => symbol.into_response(),
        None => (StatusCode::BAD_REQUEST, "No user input stored").into_response(),
    }
}

pub(super) async fn health() -> &'static str {
    "OK"
}
