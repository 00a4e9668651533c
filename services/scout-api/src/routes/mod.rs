use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/scout/batch", post(scout_batch))
        .route("/scout/:cas_or_name", get(scout_by_identifier))
        .route("/validate", get(validate_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_app, middleware::REQUEST_ID_HEADER};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use httpmock::prelude::*;
    use scout_crawler::Scout;
    use scout_utils::AppConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(search_url: &str) -> Router {
        let mut config = AppConfig::default();
        config.sources.search_url_template = format!("{}?q={{query}}", search_url);
        config.sources.probe_content_type = false;
        config.fetcher.max_retries = 0;

        let scout = Scout::from_config(&config).unwrap();
        create_app(AppState::new(scout).unwrap(), &config)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_home_and_health() {
        let (status, body) = send(app("http://127.0.0.1:9/search"), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the Scout Crawler API");

        let (status, body) = send(app("http://127.0.0.1:9/search"), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app("http://127.0.0.1:9/search").oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_invalid_identifier_makes_no_request() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).body("<html></html>");
            })
            .await;

        for uri in ["/scout/%20", "/scout/%21%40%23"] {
            let (status, body) = send(app(&server.url("/search")), get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["status"], "invalid_identifier");
            assert!(body["error"].is_string());
        }

        search.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_no_candidates_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search").query_param("q", "\"50-00-0\" filetype:pdf");
                then.status(200)
                    .header("Content-Type", "text/html")
                    .body("<html><body>No results.</body></html>");
            })
            .await;

        let (status, body) = send(app(&server.url("/search")), get("/scout/50-00-0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "not_found");
        assert_eq!(body["identifier"], "50-00-0");
        assert_eq!(body["kind"], "cas");
        assert!(body.get("source_url").is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_unprocessable() {
        let server = MockServer::start_async().await;
        let listing = format!(r#"<html><a href="{}">SDS</a></html>"#, server.url("/sds/broken.pdf"));
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).header("Content-Type", "text/html").body(listing);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sds/broken.pdf");
                then.status(200)
                    .header("Content-Type", "application/pdf")
                    .body("%PDF-1.4 truncated");
            })
            .await;

        let (status, body) = send(app(&server.url("/search")), get("/scout/acetone")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "name");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(403);
            })
            .await;

        let (status, body) = send(app(&server.url("/search")), get("/scout/acetone")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], "network_error");
    }

    #[tokio::test]
    async fn test_validate_requires_url() {
        let (status, body) = send(
            app("http://127.0.0.1:9/search"),
            get("/validate?identifier=50-00-0"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "invalid_identifier");
    }

    #[tokio::test]
    async fn test_validate_rejects_non_http_url() {
        let (status, _) = send(
            app("http://127.0.0.1:9/search"),
            get("/validate?identifier=50-00-0&url=file%3A%2F%2F%2Fetc%2Fpasswd"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_rejects_empty_entries() {
        let request = Request::builder()
            .method("POST")
            .uri("/scout/batch")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"entries": []}"#))
            .unwrap();

        let (status, body) = send(app("http://127.0.0.1:9/search"), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_batch_path_only_accepts_post() {
        let response = app("http://127.0.0.1:9/search")
            .oneshot(get("/scout/batch"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_metrics_count_outcomes() {
        let app = app("http://127.0.0.1:9/search");

        let (status, _) = send(app.clone(), get("/scout/%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let response = app.oneshot(get("/metrics")).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains(r#"scout_outcomes_total{route="scout",status="invalid_identifier"} 1"#));
    }
}
