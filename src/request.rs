//! Request data model
//!
//! The raw form snapshot a user edits and the wire-ready descriptor built
//! from it.

use serde::{Deserialize, Serialize};

/// One key/value row of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

pub type ParamEntry = KeyValue;
pub type HeaderEntry = KeyValue;

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Trimmed `(key, value)`, or `None` when the key is blank
    pub fn trimmed(&self) -> Option<(String, String)> {
        let key = self.key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), self.value.trim().to_string()))
    }
}

/// Keep rows with a non-blank key, trimming key and value. Order and
/// duplicates are preserved.
pub fn filter_rows(rows: &[KeyValue]) -> Vec<(String, String)> {
    rows.iter().filter_map(KeyValue::trimmed).collect()
}

/// Pre-send snapshot of the form, the unit held by the replay cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequestConfig {
    pub method: String,
    pub url: String,
    pub params: Vec<ParamEntry>,
    pub headers: Vec<HeaderEntry>,
    pub body_text: String,
}

impl Default for RawRequestConfig {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            params: vec![],
            headers: vec![],
            body_text: String::new(),
        }
    }
}

impl RawRequestConfig {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(KeyValue::new(key, value));
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValue::new(key, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_text = body.into();
        self
    }
}

/// Finalized, wire-ready request. GET never carries a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// First header value matching `name`, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
