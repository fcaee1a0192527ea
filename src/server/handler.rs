// Axum handlers: the launcher page plus a small JSON API.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use super::page;
use crate::launcher::{self, INITIAL_STATUS, LaunchOutcome, SharedLauncher, StopReport};
use crate::registry::DemoRegistry;

/// Shared by every request. Status is not stored: each response renders the
/// outcome of its own request, so one browser never sees another's result.
#[derive(Clone)]
pub struct AppState {
    launcher: SharedLauncher,
    registry: Arc<DemoRegistry>,
    title: Arc<str>,
}

impl AppState {
    pub fn new(launcher: SharedLauncher, title: &str) -> Self {
        // The registry never changes, so pages render without waiting on an
        // in-flight launch.
        let registry = Arc::new(launcher::lock(&launcher).registry().clone());
        Self {
            launcher,
            registry,
            title: Arc::from(title),
        }
    }

    fn render(&self, status: &str, selected: Option<&str>) -> Html<String> {
        Html(page::render(&self.title, &self.registry, status, selected))
    }

    async fn launch(&self, selection: Option<String>) -> Result<LaunchOutcome, StatusCode> {
        let shared = self.launcher.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            launcher::lock(&shared).launch_demo(selection.as_deref())
        })
        .await
        .map_err(|e| {
            error!(error = %e, "launch task panicked");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        Ok(outcome)
    }

    async fn stop_all(&self) -> Result<StopReport, StatusCode> {
        let shared = self.launcher.clone();
        let report = tokio::task::spawn_blocking(move || launcher::lock(&shared).stop_all_demos())
            .await
            .map_err(|e| {
                error!(error = %e, "stop task panicked");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchRequest {
    #[serde(default)]
    pub demo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoInfo {
    pub name: String,
    pub service: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/launch", post(launch_form))
        .route("/stop", post(stop_form))
        .route("/api/demos", get(list_demos))
        .route("/api/launch", post(launch_json))
        .route("/api/stop", post(stop_json))
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    info!(addr = %listener.local_addr()?, "web UI listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    state.render(INITIAL_STATUS, None)
}

async fn launch_form(
    State(state): State<AppState>,
    Form(req): Form<LaunchRequest>,
) -> Result<Html<String>, StatusCode> {
    let selected = req.demo.clone();
    let outcome = state.launch(req.demo).await?;
    Ok(state.render(&outcome.message(), selected.as_deref()))
}

async fn stop_form(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let report = state.stop_all().await?;
    Ok(state.render(&report.message(), None))
}

async fn list_demos(State(state): State<AppState>) -> Json<Vec<DemoInfo>> {
    Json(
        state
            .registry
            .iter()
            .map(|d| DemoInfo {
                name: d.display_name.clone(),
                service: d.service_id.clone(),
                url: d.url.clone(),
            })
            .collect(),
    )
}

async fn launch_json(
    State(state): State<AppState>,
    Json(req): Json<LaunchRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = state.launch(req.demo).await?;
    Ok(Json(ApiResponse {
        status: outcome.status().to_string(),
        message: outcome.message(),
    }))
}

async fn stop_json(State(state): State<AppState>) -> Result<Json<ApiResponse>, StatusCode> {
    let report = state.stop_all().await?;
    Ok(Json(ApiResponse {
        status: if report.is_clean() { "stopped" } else { "partial" }.to_string(),
        message: report.message(),
    }))
}
