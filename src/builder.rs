//! Request construction
//!
//! Turns a [`RawRequestConfig`] into a [`RequestDescriptor`]. Pure: no I/O,
//! and the same config always yields the same descriptor.
//!
//! Parameter placement:
//! - GET: params are appended to the URL query after the URL's own params.
//! - other methods: params become a form-encoded body only when the body
//!   text is blank. A non-blank body wins and the params are dropped.

use http::{header::CONTENT_TYPE, Method};
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::{Error, Result};
use crate::request::{filter_rows, find_header, RawRequestConfig, RequestDescriptor};

const CONTENT_TYPE_NAME: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build the wire-ready descriptor for a form snapshot
pub fn build(config: &RawRequestConfig) -> Result<RequestDescriptor> {
    let method = parse_method(&config.method)?;
    let mut url = parse_url(&config.url)?;

    let params = filter_rows(&config.params);
    let mut headers = filter_rows(&config.headers);
    let has_content_type = find_header(&headers, CONTENT_TYPE.as_str()).is_some();

    let body = if method == Method::GET {
        if !params.is_empty() {
            append_query(&mut url, &params);
        }
        None
    } else if !config.body_text.trim().is_empty() {
        if !has_content_type && is_json(&config.body_text) {
            headers.push((CONTENT_TYPE_NAME.to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        Some(config.body_text.clone())
    } else if !params.is_empty() {
        if !has_content_type {
            headers.push((CONTENT_TYPE_NAME.to_string(), FORM_CONTENT_TYPE.to_string()));
        }
        Some(encode_form(&params))
    } else {
        None
    };

    let descriptor = RequestDescriptor {
        method: method.to_string(),
        url: url.to_string(),
        headers,
        body,
    };
    debug!(
        method = %descriptor.method,
        url = %descriptor.url,
        headers = descriptor.headers.len(),
        has_body = descriptor.body.is_some(),
        "Built request"
    );
    Ok(descriptor)
}

/// Normalize the method token; standard methods are matched in any case
fn parse_method(raw: &str) -> Result<Method> {
    let token = raw.trim().to_ascii_uppercase();
    if token.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(token.as_bytes()).map_err(|_| Error::InvalidMethod(raw.to_string()))
}

/// Parse an absolute http(s) URL
fn parse_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_url(raw, "URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| Error::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::invalid_url(
            raw,
            format!("unsupported scheme {other:?}"),
        )),
    }
}

/// Re-serialize the existing query with `params` appended, keeping order
fn append_query(url: &mut Url, params: &[(String, String)]) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    pairs.extend(params.iter().cloned());

    url.set_query(None);
    url.query_pairs_mut().extend_pairs(&pairs);
}

fn encode_form(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text.trim()).is_ok()
}
