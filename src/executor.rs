//! Request execution
//!
//! Sends a [`RequestDescriptor`] over the network, times it, and normalizes
//! the response for display. Any HTTP status is a normal response; only
//! transport failures are errors.

use chrono::{DateTime, Utc};
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::request::RequestDescriptor;

/// Transport settings for the HTTP client
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// None means wait as long as the transport allows
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub max_redirects: usize,
    pub accept_invalid_certs: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("replayn/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
            accept_invalid_certs: false,
        }
    }
}

/// Normalized result of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    pub status_code: u16,
    pub status_text: String,
    /// Dispatch until the full body was read
    pub elapsed_ms: f64,
    /// Pretty-printed when the raw body is JSON, verbatim otherwise
    pub body_text: String,
    /// Size of the raw body in bytes
    pub body_size: usize,
    pub started_at: DateTime<Utc>,
}

impl ResponseResult {
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status_code, self.status_text)
            .trim_end()
            .to_string()
    }

    pub fn elapsed_display(&self) -> String {
        format!("{:.2}ms", self.elapsed_ms)
    }
}

/// HTTP client that keeps cookies across sends
#[derive(Debug, Clone)]
pub struct Executor {
    client: reqwest::Client,
}

impl Executor {
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(Error::ClientBuild)?;
        Ok(Self { client })
    }

    /// Send one request and wait for the full response
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<ResponseResult> {
        let method = Method::from_bytes(descriptor.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(descriptor.method.clone()))?;
        let header_map = build_header_map(&descriptor.headers)?;

        let mut req = self
            .client
            .request(method, descriptor.url.as_str())
            .headers(header_map);
        if let Some(ref body) = descriptor.body {
            req = req.body(body.clone());
        }

        info!(method = %descriptor.method, url = %descriptor.url, "Sending request");

        let started_at = Utc::now();
        let start = Instant::now();
        let (status, status_text, raw_body) = match dispatch(req).await {
            Ok(parts) => parts,
            Err(e) => {
                warn!(url = %descriptor.url, error = %e, "Request failed");
                return Err(e);
            }
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            status = status.as_u16(),
            elapsed_ms,
            bytes = raw_body.len(),
            "Response received"
        );

        Ok(ResponseResult {
            status_code: status.as_u16(),
            status_text,
            elapsed_ms,
            body_size: raw_body.len(),
            body_text: pretty_json(&raw_body),
            started_at,
        })
    }
}

async fn dispatch(req: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, String, String)> {
    let response = req.send().await?;
    let status = response.status();
    let status_text = reason_phrase(&response);
    let body = response.text().await?;
    Ok((status, status_text, body))
}

/// Reason phrase as sent by the server.
///
/// hyper only records the phrase when it differs from the canonical one, so
/// a missing extension means the canonical phrase was on the wire.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string(),
    }
}

/// Re-serialize JSON with indentation; anything else is returned unchanged
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| text.to_string())
}

/// Build a HeaderMap from header tuples, keeping repeated names
fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name: HeaderName = name
            .parse()
            .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
        let header_value: HeaderValue = value
            .parse()
            .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
        map.append(header_name, header_value);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_json_indents_objects() {
        let pretty = pretty_json("{\"b\":1,\"a\":[true,null]}");
        assert_eq!(
            pretty,
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_pretty_json_round_trips() {
        let raw = r#"{"name":"widget","tags":["x","y"],"price":9.5,"meta":{"id":7}}"#;
        let pretty = pretty_json(raw);
        let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        let original: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_pretty_json_leaves_text_alone() {
        assert_eq!(pretty_json("<html></html>"), "<html></html>");
        assert_eq!(pretty_json(""), "");
        assert_eq!(pretty_json("{broken"), "{broken");
    }

    #[test]
    fn test_build_header_map_keeps_duplicates() {
        let headers = vec![
            ("X-Tag".to_string(), "a".to_string()),
            ("x-tag".to_string(), "b".to_string()),
        ];
        let map = build_header_map(&headers).unwrap();
        let values: Vec<&str> = map
            .get_all("x-tag")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_build_header_map_rejects_bad_name() {
        let headers = vec![("Bad Header".to_string(), "x".to_string())];
        let err = build_header_map(&headers).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { .. }));
    }

    #[test]
    fn test_status_line_without_reason() {
        let result = ResponseResult {
            status_code: 599,
            status_text: String::new(),
            elapsed_ms: 1.234,
            body_text: String::new(),
            body_size: 0,
            started_at: Utc::now(),
        };
        assert_eq!(result.status_line(), "599");
        assert_eq!(result.elapsed_display(), "1.23ms");
    }
}
