use prayer_display_core::error::Result;
use prayer_display_core::{CoreError, TimeoutSpec};
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, warn};
use url::Url;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Served as `application/json`
    Json(serde_json::Value),
    /// Anything else, as text
    Text(String),
}

/// GET `url`, giving up once `timeout` has elapsed.
///
/// The deadline covers the whole exchange including retries and reading the
/// body. A disabled timeout waits indefinitely.
///
/// # Errors
///
/// - [`CoreError::Timeout`] when the deadline is reached first
/// - [`CoreError::HttpStatus`] with the trimmed body for non-success statuses
/// - Network and decode errors otherwise
pub async fn request(
    client: &ClientWithMiddleware,
    url: &Url,
    timeout: &TimeoutSpec,
) -> Result<ApiResponse> {
    let exchange = get(client, url);

    match timeout.duration() {
        Some(deadline) => tokio::time::timeout(deadline, exchange)
            .await
            .map_err(|_| {
                warn!("Request to {} timed out after {}", url, timeout.label());
                CoreError::Timeout {
                    duration: timeout.label().to_string(),
                }
            })?,
        None => exchange.await,
    }
}

async fn get(client: &ClientWithMiddleware, url: &Url) -> Result<ApiResponse> {
    debug!("GET {}", url);
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    debug!("Response status: {}", status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            warn!("Failed to read error body from {}: {}", url, e);
            String::new()
        });
        return Err(CoreError::HttpStatus {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        Ok(ApiResponse::Json(response.json().await?))
    } else {
        Ok(ApiResponse::Text(response.text().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve;
    use crate::{build_client, build_client_with_policy};
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use reqwest_retry::policies::ExponentialBackoff;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn router() -> Router {
        Router::new()
            .route("/json", get(|| async { Json(json!({ "ok": true })) }))
            .route(
                "/json-charset",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                        r#"{"ok":true}"#,
                    )
                }),
            )
            .route("/text", get(|| async { "assalamualaikum" }))
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "  database offline\n") }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "too late"
                }),
            )
    }

    #[tokio::test]
    async fn test_json_response() {
        let base = serve(router()).await;
        let client = build_client(0).unwrap();
        let timeout = TimeoutSpec::default();

        for path in ["json", "json-charset"] {
            let response = request(&client, &base.join(path).unwrap(), &timeout)
                .await
                .unwrap();
            assert_eq!(response, ApiResponse::Json(json!({ "ok": true })));
        }
    }

    #[tokio::test]
    async fn test_text_response() {
        let base = serve(router()).await;
        let client = build_client(0).unwrap();

        let response = request(&client, &base.join("text").unwrap(), &TimeoutSpec::default())
            .await
            .unwrap();
        assert_eq!(response, ApiResponse::Text("assalamualaikum".to_string()));
    }

    #[tokio::test]
    async fn test_http_error_carries_trimmed_body() {
        let base = serve(router()).await;
        let client = build_client(0).unwrap();

        let err = request(&client, &base.join("broken").unwrap(), &TimeoutSpec::default())
            .await
            .unwrap_err();
        assert!(!err.is_timeout());
        assert!(matches!(err, CoreError::HttpStatus { status: 500, .. }));
        assert_eq!(err.to_string(), "database offline (500)");
    }

    #[tokio::test]
    async fn test_http_error_with_truncated_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .unwrap();
        });

        let client = build_client(0).unwrap();
        let url = Url::parse(&format!("http://{addr}/api/data")).unwrap();
        let err = request(&client, &url, &TimeoutSpec::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::HttpStatus { status: 404, ref body } if body.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_http_error() {
        let base = serve(router()).await;
        let client = build_client(0).unwrap();
        let timeout: TimeoutSpec = "200ms".parse().unwrap();

        let err = request(&client, &base.join("slow").unwrap(), &timeout)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Timeout after 200ms");
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/flaky",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, "warming up")
                    } else {
                        (StatusCode::OK, "ready")
                    }
                }
            }),
        );
        let base = serve(router).await;
        let policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(1), Duration::from_millis(10))
            .build_with_max_retries(2);
        let client = build_client_with_policy(policy).unwrap();

        let response = request(&client, &base.join("flaky").unwrap(), &TimeoutSpec::default())
            .await
            .unwrap();
        assert_eq!(response, ApiResponse::Text("ready".to_string()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
