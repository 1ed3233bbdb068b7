use crate::request::{request, ApiResponse};
use async_trait::async_trait;
use prayer_display_core::error::Result;
use prayer_display_core::{ApiConfig, ApiData, CoreError, Schedule, ScheduleSource, TimeoutSpec};
use reqwest_middleware::ClientWithMiddleware;
use tracing::info;
use url::Url;

/// Schedule source backed by the display server's data endpoint.
pub struct HttpScheduleSource {
    client: ClientWithMiddleware,
    base_url: Url,
    data_url: Url,
    timeout: TimeoutSpec,
}

impl HttpScheduleSource {
    /// Create a source from the `[api]` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the URLs are invalid or the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(config.max_retries)?,
            base_url: config.base_url()?,
            data_url: config.data_url()?,
            timeout: config.timeout.clone(),
        })
    }
}

#[async_trait]
impl ScheduleSource for HttpScheduleSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<Schedule> {
        info!("Fetching schedule from {}", self.data_url);

        let ApiResponse::Json(body) = request(&self.client, &self.data_url, &self.timeout).await?
        else {
            return Err(CoreError::UnexpectedContentType {
                url: self.data_url.to_string(),
            });
        };

        let mut data: ApiData = serde_json::from_value(body)?;
        for image in &mut data.images {
            image.resolve_against(&self.base_url);
        }

        info!(
            "Fetched {} events and {} images",
            data.events.len(),
            data.images.len()
        );
        Ok(Schedule::from_api(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    const FAJR: i64 = 1_760_480_000_000;

    fn config(base: &Url, timeout: &str) -> ApiConfig {
        ApiConfig {
            base_url: base.to_string(),
            timeout: timeout.parse().unwrap(),
            max_retries: 0,
            ..ApiConfig::default()
        }
    }

    fn data_router() -> Router {
        Router::new().route(
            "/api/data",
            get(|| async {
                Json(json!({
                    "images": [{
                        "url": "/image/kaaba.jpg",
                        "mainColor": "#102030",
                        "headerMain": "#111111",
                        "headerAccent": "#222222",
                        "headerFont": "#ffffff",
                        "footerMain": "#333333",
                        "footerAccent": "#444444",
                        "footerFont": "#eeeeee"
                    }],
                    "events": [
                        { "name": "fajr", "time": FAJR, "iqama": FAJR + 1_200_000 },
                        { "name": "sunrise", "time": FAJR + 3_600_000, "iqama": 0 },
                        { "name": "nextFajr", "time": FAJR + 86_400_000 }
                    ]
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_fetch_builds_schedule() {
        let base = serve(data_router()).await;
        let source = HttpScheduleSource::new(&config(&base, "1m")).unwrap();

        let schedule = source.fetch().await.unwrap();

        let names: Vec<_> = schedule.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["fajr", "sunrise"]);
        let targets: Vec<_> = schedule.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(targets, ["fajr", "fajrIqama", "sunrise", "nextFajr"]);

        assert_eq!(schedule.images.len(), 1);
        assert_eq!(
            schedule.images[0].url,
            base.join("image/kaaba.jpg").unwrap().to_string()
        );
        assert_eq!(schedule.images[0].header_font, "#ffffff");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json() {
        let router = Router::new().route("/api/data", get(|| async { "<html></html>" }));
        let base = serve(router).await;
        let source = HttpScheduleSource::new(&config(&base, "1m")).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedContentType { .. }));
    }

    #[tokio::test]
    async fn test_fetch_reports_missing_endpoint() {
        let base = serve(Router::new()).await;
        let source = HttpScheduleSource::new(&config(&base, "1m")).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CoreError::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(HttpScheduleSource::new(&config).is_err());
    }
}
