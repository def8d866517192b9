//! HTTP client for the sensor feed.
//!
//! The feed is a single unauthenticated GET endpoint returning a JSON array
//! of reading objects. This module performs the request and shape check;
//! it does no per-field validation. Individual malformed elements degrade
//! to an empty [`Reading`] so one bad row never drops the whole payload.
//!
//! # Example
//!
//! ```no_run
//! use soilwatch_core::SensorClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SensorClient::new("http://api.ehub.ph/rgb.php")?;
//! let readings = client.fetch_readings().await?;
//! println!("{} readings", readings.len());
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use soilwatch_types::Reading;

/// Default timeout applied to each fetch.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// HTTP client for the sensor feed endpoint.
#[derive(Debug, Clone)]
pub struct SensorClient {
    client: Client,
    url: String,
}

/// Error type for feed fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The feed URL is not an http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The feed is not reachable.
    #[error("Feed not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The feed answered with a non-success status.
    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },

    /// The decoded payload was not a JSON array.
    ///
    /// Callers treat this as "no data", not as a user-facing error.
    #[error("Expected a JSON array of readings, got {found}")]
    Shape { found: &'static str },

    /// The request or body decoding failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result type for feed fetch operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl SensorClient {
    /// Create a new client for the given feed URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Request)?;
        Self::with_client(url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(url: &str, client: Client) -> Result<Self> {
        let url = url.trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                url
            )));
        }

        Ok(Self { client, url })
    }

    /// Get the feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full reading sequence from the feed.
    ///
    /// Returns the decoded sequence verbatim, in feed order. The last
    /// element is treated as the latest reading by consumers; ordering is
    /// trusted from the source.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] when the response status is not 2xx
    /// - [`ClientError::Shape`] when the payload is not a JSON array
    /// - [`ClientError::NotReachable`] / [`ClientError::Request`] on
    ///   transport or decode failures
    pub async fn fetch_readings(&self) -> Result<Vec<Reading>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            ClientError::NotReachable {
                url: self.url.clone(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await.map_err(ClientError::Request)?;
        match payload {
            Value::Array(items) => Ok(items.into_iter().map(decode_element).collect()),
            other => Err(ClientError::Shape {
                found: json_type_name(&other),
            }),
        }
    }
}

/// Decode one array element, degrading to an empty reading on failure.
fn decode_element(value: Value) -> Reading {
    match serde_json::from_value(value) {
        Ok(reading) => reading,
        Err(e) => {
            debug!(error = %e, "malformed reading element, keeping placeholder");
            Reading::default()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SensorClient::new("http://api.ehub.ph/rgb.php");
        assert!(client.is_ok());
        assert_eq!(client.unwrap().url(), "http://api.ehub.ph/rgb.php");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = SensorClient::new("https://example.com/feed/").unwrap();
        assert_eq!(client.url(), "https://example.com/feed");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = SensorClient::new("api.ehub.ph/rgb.php");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_error_message_shape() {
        let err = ClientError::Http { status: 500 };
        assert_eq!(err.to_string(), "HTTP error! Status: 500");
    }

    #[test]
    fn test_decode_element_degrades_gracefully() {
        let good = decode_element(serde_json::json!({"deviceId": "npk-01", "ztotal": 1.2}));
        assert_eq!(good.device_id.as_deref(), Some("npk-01"));

        // A non-object element becomes a placeholder instead of failing.
        let bad = decode_element(serde_json::json!("not an object"));
        assert_eq!(bad, Reading::default());
    }

    /// Serve one canned HTTP response on an ephemeral port and return the
    /// feed URL pointing at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_readings_decodes_array_payload() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"deviceId":"npk-01","ztotal":1.2},{"deviceId":"npk-02","ztotal":3.4}]"#,
        )
        .await;

        let client = SensorClient::new(&url).unwrap();
        let readings = client.fetch_readings().await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].device_id.as_deref(), Some("npk-01"));
        assert_eq!(readings[1].ztotal, Some(3.4));
    }

    #[tokio::test]
    async fn test_fetch_readings_maps_non_success_status() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "[]").await;

        let client = SensorClient::new(&url).unwrap();
        let err = client.fetch_readings().await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500 }));
        assert_eq!(err.to_string(), "HTTP error! Status: 500");
    }

    #[tokio::test]
    async fn test_fetch_readings_rejects_non_array_payload() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"status":"ok"}"#).await;

        let client = SensorClient::new(&url).unwrap();
        let err = client.fetch_readings().await.unwrap_err();
        assert!(matches!(err, ClientError::Shape { found: "object" }));
    }
}
