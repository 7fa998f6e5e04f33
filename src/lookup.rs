//! Upstream HTTP lookups.
//!
//! One GET per call, bounded by the configured timeout. Never retries.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::LookupError;

/// Stateless HTTP GET client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl LookupClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Fetches `url` and parses the body as JSON.
    ///
    /// Anything but `200 OK` is [`LookupError::BadStatus`].
    pub async fn fetch(&self, url: &str) -> Result<Value, LookupError> {
        let response = self.http.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url, status = status.as_u16(), "Upstream returned non-200 status");
            return Err(LookupError::BadStatus(status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_parses_json_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .and(query_param("date", "01.12.2014"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "exchangeRate": [] })),
            )
            .mount(&server)
            .await;

        let client = LookupClient::new(Duration::from_secs(5));
        let body = client
            .fetch(&format!("{}/rates?date=01.12.2014", server.uri()))
            .await
            .unwrap();
        assert_eq!(body["exchangeRate"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = LookupClient::new(Duration::from_secs(5));
        let err = client.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err, LookupError::BadStatus(503));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = LookupClient::new(Duration::from_secs(5));
        let err = client.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_times_out_without_hanging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let client = LookupClient::new(Duration::from_millis(300));
        let started = Instant::now();
        let err = client.fetch(&server.uri()).await.unwrap_err();

        assert_eq!(err, LookupError::Timeout);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = LookupClient::new(Duration::from_secs(5));
        let err = client
            .fetch(&format!("http://127.0.0.1:{port}/rates"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)), "got {err:?}");
    }
}
