// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_widget, health_check, list_widgets, render_page, update_widget};
use crate::presentation::host_guard::require_allowed_host;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    let page_paths: Vec<String> = state
        .dashboard_service
        .pages()
        .map(|p| p.path.clone())
        .collect();

    let mut router = Router::new();
    for path in &page_paths {
        router = router.route(path, get(render_page));
    }

    // The health check sits outside the host guard so platform probes always reach it.
    router
        .route("/api/widgets", get(list_widgets))
        .route("/api/widgets/:id", get(get_widget).post(update_widget))
        .nest_service(
            state.settings.static_url.trim_end_matches('/'),
            ServeDir::new(&state.settings.static_dir),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_allowed_host,
        ))
        .route("/healthz", get(health_check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::domain::error::{ConfigurationError, DashboardError};
    use crate::infrastructure::config::{AppConfig, DatasetSettings, PageConfig, ServerSettings, WidgetsConfig};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router(settings: ServerSettings) -> Router {
        let app_config = AppConfig {
            server: settings.clone(),
            datasets: DatasetSettings { seed: Some(11) },
        };
        let dashboard_service =
            DashboardService::from_config(&app_config, &WidgetsConfig::default()).unwrap();
        build_router(Arc::new(AppState {
            dashboard_service,
            settings,
        }))
    }

    fn get_request(uri: &str, host: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::HOST, "localhost")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_ignores_host() {
        let router = test_router(ServerSettings::default());
        let response = router
            .oneshot(get_request("/healthz", "probe.internal"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_pages_render_their_widgets() {
        let router = test_router(ServerSettings::default());
        let response = router
            .clone()
            .oneshot(get_request("/", "localhost:8080"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("data-widget-id=\"heart-rate\""));
        assert!(html.contains("data-refresh-ms=\"30000\""));

        let response = router
            .oneshot(get_request("/newpage/", "localhost"))
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("data-widget-id=\"sleep-weekly\""));
    }

    #[tokio::test]
    async fn test_disallowed_host_is_rejected_unless_debug() {
        let router = test_router(ServerSettings::default());
        let response = router.oneshot(get_request("/", "evil.example")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let router = test_router(ServerSettings {
            debug: true,
            ..ServerSettings::default()
        });
        let response = router.oneshot(get_request("/", "evil.example")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_widget_listing_and_state() {
        let router = test_router(ServerSettings::default());
        let response = router
            .clone()
            .oneshot(get_request("/api/widgets", "localhost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let widgets = json_body(response).await;
        assert_eq!(widgets.as_array().map(Vec::len), Some(8));

        let response = router
            .oneshot(get_request("/api/widgets/sleep-weekly", "localhost"))
            .await
            .unwrap();
        let state = json_body(response).await;
        let figure = &state["outputs"]["heatmap.figure"];
        assert_eq!(figure["kind"], "figure");
        assert_eq!(figure["data"][0]["type"], "heatmap");
        assert_eq!(figure["data"][0]["z"][0][0], 1.0);
    }

    #[tokio::test]
    async fn test_update_filters_by_date_range() {
        let router = test_router(ServerSettings::default());
        let response = router
            .oneshot(post_json(
                "/api/widgets/daily-scores",
                r#"{"changes": {"date-picker.start_date": "2024-08-19", "date-picker.end_date": "2024-08-19"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let state = json_body(response).await;
        assert_eq!(state["updated"][0], "box-plot.figure");
        let x = state["outputs"]["box-plot.figure"]["data"][0]["x"]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(x.len(), 50);
        assert!(x.iter().all(|d| d == "2024-08-19"));
        assert_eq!(state["controls"]["date-picker.start_date"], "2024-08-19");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let router = test_router(ServerSettings::default());
        let response = router
            .clone()
            .oneshot(get_request("/api/widgets/world-map", "localhost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "widget `world-map` not found");

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/widgets/sleep",
                r#"{"changes": {"slider.value": 3}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(post_json(
                "/api/widgets/sleep",
                r#"{"changes": {"date-picker.start_date": 3}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_untyped_control_value_is_a_json_bad_request() {
        let router = test_router(ServerSettings::default());
        let response = router
            .oneshot(post_json(
                "/api/widgets/sleep",
                r#"{"changes": {"date-picker.start_date": 3.5}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("malformed request"));
    }

    #[tokio::test]
    async fn test_authority_stands_in_for_missing_host_header() {
        let router = test_router(ServerSettings::default());
        let request = Request::builder()
            .uri("http://localhost:8080/api/widgets")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("http://evil.example/api/widgets")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_page_on_static_mount_fails_before_routing() {
        let widgets_config = WidgetsConfig {
            pages: vec![PageConfig {
                path: "/static".to_string(),
                title: "Assets".to_string(),
                widgets: Vec::new(),
            }],
            ..WidgetsConfig::default()
        };
        let result = DashboardService::from_config(&AppConfig::default(), &widgets_config);
        assert!(matches!(
            result,
            Err(DashboardError::Configuration(ConfigurationError::ReservedPath(path))) if path == "/static"
        ));
    }
}
