//! HTTP client for the read-only catalog service.
//!
//! Two queries and a health probe, each issued as exactly one request:
//!
//! - `GET /?type=subcategories&category=<slug>` → `["Most Watched", ...]`
//! - `GET /?type=videos&category=<slug>&subcategory=<label>` → `[Video, ...]`
//! - `GET /health` → [`HealthReport`]
//!
//! No retries and no caching happen here. Every failure is folded into
//! [`CatalogError`], which classifies itself via [`CatalogError::kind`].

use super::taxonomy::LANGUAGE_HUB;
use super::video::Video;
use futures::StreamExt;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Response bodies above this size are rejected without being parsed.
const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// ============================================================================
// Errors
// ============================================================================

/// Coarse failure classes surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or timeout; the request may not have reached the service.
    Network,
    /// The service answered, but not with a usable payload.
    BadResponse,
    /// A bug on our side (misuse of the client, panicked fetch task).
    Internal,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::BadResponse => "bad response",
            Self::Internal => "internal error",
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("Malformed response: expected a JSON array")]
    NotAnArray,
    #[error("Invalid catalog base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("The language hub has no server-side subcategories")]
    HubCategory,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Timeout(_) | CatalogError::Network(_) => ErrorKind::Network,
            CatalogError::HttpStatus(_)
            | CatalogError::ResponseTooLarge(_)
            | CatalogError::MalformedJson(_)
            | CatalogError::NotAnArray => ErrorKind::BadResponse,
            CatalogError::InvalidBaseUrl(_) | CatalogError::HubCategory => ErrorKind::Internal,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub database_connected: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.database_connected
    }
}

// ============================================================================
// Client
// ============================================================================

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Thin, cloneable handle to the catalog service.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CatalogClient {
    /// Build a client for `base_url` with a pooled HTTP connection.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = parse_base_url(base_url)?;

        // PERF: Small pool, the UI never has more than two requests in flight.
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_http_client(http, base_url, timeout))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        if base_url.scheme() == "http" {
            tracing::debug!(base_url = %base_url, "Catalog service reached over plain HTTP");
        }
        Self {
            http,
            base_url,
            timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Active subcategory labels for a server-side category.
    pub async fn fetch_subcategories(&self, category: &str) -> Result<Vec<String>, CatalogError> {
        if category == LANGUAGE_HUB {
            return Err(CatalogError::HubCategory);
        }
        self.get_array(&[("type", "subcategories"), ("category", category)])
            .await
    }

    /// Videos shelved under `(category, subcategory)`, in service order.
    pub async fn fetch_videos(
        &self,
        category: &str,
        subcategory: &str,
    ) -> Result<Vec<Video>, CatalogError> {
        if category == LANGUAGE_HUB {
            return Err(CatalogError::HubCategory);
        }
        self.get_array(&[
            ("type", "videos"),
            ("category", category),
            ("subcategory", subcategory),
        ])
        .await
    }

    /// Probe the service's health endpoint.
    pub async fn health(&self) -> Result<HealthReport, CatalogError> {
        let url = self
            .base_url
            .join("health")
            .map_err(|_| CatalogError::InvalidBaseUrl(self.base_url.to_string()))?;
        let body = self.send(self.http.get(url)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_array<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, CatalogError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(query);
        let body = self.send(self.http.get(url)).await?;
        decode_array(&body)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, CatalogError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| CatalogError::Timeout(self.timeout))?
            .map_err(CatalogError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "Catalog request failed");
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        // Body streaming shares the request's time budget.
        tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_RESPONSE_SIZE))
            .await
            .map_err(|_| CatalogError::Timeout(self.timeout))?
    }
}

/// Validate and normalize the service base URL.
///
/// The path gets a trailing slash so `join("health")` stays under it.
fn parse_base_url(raw: &str) -> Result<Url, CatalogError> {
    let mut url = Url::parse(raw.trim()).map_err(|_| CatalogError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(CatalogError::InvalidBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Parse a body that must be a JSON array of `T`.
fn decode_array<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, CatalogError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Err(CatalogError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(CatalogError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_subcategories_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("type", "subcategories"))
            .and(query_param("category", "system_design"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["Scalability", "Databases"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let subs = client_for(&server)
            .fetch_subcategories("system_design")
            .await
            .unwrap();
        assert_eq!(subs, vec!["Scalability".to_string(), "Databases".to_string()]);
    }

    #[tokio::test]
    async fn fetch_videos_encodes_subcategory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("type", "videos"))
            .and(query_param("category", "language_cpp"))
            .and(query_param("subcategory", "C++ - Most Watched"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": "v1",
                    "title": "Pointers",
                    "channelTitle": "The Cherno",
                    "publishedAt": "2022-02-02T00:00:00Z",
                    "viewCount": 100
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let videos = client_for(&server)
            .fetch_videos("language_cpp", "C++ - Most Watched")
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "v1");
        assert_eq!(videos[0].channel, "The Cherno");
    }

    #[tokio::test]
    async fn empty_array_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let subs = client_for(&server).fetch_subcategories("dsa").await.unwrap();
        assert!(subs.is_empty());
    }

    #[tokio::test]
    async fn http_500_is_bad_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_videos("dsa", "Most Watched")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::HttpStatus(500)));
        assert_eq!(err.kind(), ErrorKind::BadResponse);
    }

    #[tokio::test]
    async fn http_400_is_bad_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_subcategories("dsa")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::HttpStatus(400)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_subcategories("dsa")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedJson(_)));
        assert_eq!(err.kind(), ErrorKind::BadResponse);
    }

    #[tokio::test]
    async fn object_body_is_not_an_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"detail": "nope"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_subcategories("dsa")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotAnArray));
    }

    #[tokio::test]
    async fn wrong_element_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_subcategories("dsa")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedJson(_)));
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let server = MockServer::start().await;
        let big = format!("[\"{}\"]", "a".repeat(MAX_RESPONSE_SIZE));
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(big))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_subcategories("dsa")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ResponseTooLarge(_)));
    }

    #[tokio::test]
    async fn slow_response_times_out_as_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), Duration::from_millis(50)).unwrap();
        let err = client.fetch_subcategories("dsa").await.unwrap_err();
        assert!(matches!(err, CatalogError::Timeout(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        // Bind then drop a server so the port is very likely closed.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let client = CatalogClient::new(&uri, Duration::from_secs(2)).unwrap();
        let err = client.fetch_subcategories("dsa").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn hub_category_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch_subcategories(LANGUAGE_HUB).await.unwrap_err();
        assert!(matches!(err, CatalogError::HubCategory));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn health_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "message": "API and database are working",
                "database_connected": true
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).health().await.unwrap();
        assert!(report.is_healthy());
        assert_eq!(report.message, "API and database are working");
    }

    #[tokio::test]
    async fn health_without_database_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "message": "Database connection not available"
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).health().await.unwrap();
        assert!(!report.is_healthy());
    }

    #[test]
    fn base_url_validation() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
        assert_eq!(
            parse_base_url("https://api.example.com/v1").unwrap().as_str(),
            "https://api.example.com/v1/"
        );
        assert_eq!(
            parse_base_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn error_kinds() {
        assert_eq!(CatalogError::Timeout(DEFAULT_TIMEOUT).kind(), ErrorKind::Network);
        assert_eq!(CatalogError::HttpStatus(404).kind(), ErrorKind::BadResponse);
        assert_eq!(CatalogError::NotAnArray.kind(), ErrorKind::BadResponse);
        assert_eq!(CatalogError::HubCategory.kind(), ErrorKind::Internal);
    }
}
