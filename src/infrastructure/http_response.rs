// HTTP response utilities for JSON and HTML bodies
use crate::domain::error::DashboardError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::WidgetNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::UnknownControl { .. }
            | DashboardError::InvalidControlValue { .. }
            | DashboardError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::DataIntegrity { .. }
            | DashboardError::Configuration(_)
            | DashboardError::EmptySeries => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        error_response(status, self.to_string())
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// HTML page that must not be cached; widget data changes between processes.
pub fn page_response(body: String) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DashboardError::WidgetNotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DashboardError::UnknownControl {
                widget: "w".to_string(),
                control: "c".to_string(),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::MalformedRequest("bad json".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::DataIntegrity {
                row: "1w".to_string(),
                column: "Mon".to_string(),
                existing: 1.0,
                conflicting: 2.0,
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_has_json_body() {
        let response = error_response(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
