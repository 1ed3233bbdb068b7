//! HTTP access to the display server: the fetch-with-timeout helper and the
//! schedule source built on it.

mod request;
mod source;

pub use request::{request, ApiResponse};
pub use source::HttpScheduleSource;

use prayer_display_core::CoreError;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;

/// Connect timeout for the underlying client. The request deadline itself is
/// applied per call by [`request`].
const CONNECT_TIMEOUT_SECS: u64 = 5;

const USER_AGENT: &str = concat!("prayer-display/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client that retries transient failures with exponential backoff.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn build_client(max_retries: u32) -> Result<ClientWithMiddleware, CoreError> {
    build_client_with_policy(ExponentialBackoff::builder().build_with_max_retries(max_retries))
}

fn build_client_with_policy(
    retry_policy: ExponentialBackoff,
) -> Result<ClientWithMiddleware, CoreError> {
    let base_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;
    use url::Url;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }
}
