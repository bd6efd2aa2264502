// HTTP request handlers
use crate::application::dashboard_service::{WidgetState, WidgetSummary};
use crate::domain::control::ControlValue;
use crate::domain::error::DashboardError;
use crate::infrastructure::http_response::{error_response, page_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page_html;
use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub changes: BTreeMap<String, ControlValue>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// HTML shell for a configured page; the client script fetches each widget.
pub async fn render_page(OriginalUri(uri): OriginalUri, State(state): State<Arc<AppState>>) -> Response {
    let Some(page) = state.dashboard_service.page(uri.path()) else {
        return error_response(StatusCode::NOT_FOUND, format!("no page at {}", uri.path()));
    };

    let widgets = match page
        .widgets
        .iter()
        .map(|id| state.dashboard_service.widget_summary(id))
        .collect::<Result<Vec<WidgetSummary>, DashboardError>>()
    {
        Ok(widgets) => widgets,
        Err(e) => return e.into_response(),
    };

    page_response(render_page_html(page, &widgets, &state.settings.static_url))
}

pub async fn list_widgets(State(state): State<Arc<AppState>>) -> Json<Vec<WidgetSummary>> {
    Json(state.dashboard_service.widgets())
}

pub async fn get_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WidgetState>, DashboardError> {
    Ok(Json(state.dashboard_service.widget_state(&id)?))
}

/// Apply the posted control values to a fresh controller and return the result.
///
/// Bodies that do not parse are answered like any other bad control value.
pub async fn update_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<WidgetState>, DashboardError> {
    let Json(request) = payload.map_err(|rejection| DashboardError::MalformedRequest(rejection.body_text()))?;
    Ok(Json(
        state.dashboard_service.update_widget(&id, request.changes)?,
    ))
}
