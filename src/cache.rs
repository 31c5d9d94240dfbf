//! Single-slot replay cache
//!
//! Holds the form snapshot of the most recently initiated send. The slot is
//! replaced wholesale on every send and never expires on its own.

use crate::request::RawRequestConfig;

#[derive(Debug, Default)]
pub struct ReplayCache {
    last: Option<RawRequestConfig>,
}

impl ReplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot unconditionally
    pub fn set(&mut self, config: RawRequestConfig) {
        self.last = Some(config);
    }

    pub fn get(&self) -> Option<&RawRequestConfig> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}
