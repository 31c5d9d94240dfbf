//! Send and replay
//!
//! A [`Session`] holds the editable form, the HTTP executor and the replay
//! cache. `send` and `replay` are the outermost boundary of the pipeline:
//! every failure comes back as an [`Outcome::Error`], never as a panic or an
//! `Err` the caller has to handle.

use serde::Serialize;
use tracing::{debug, warn};

use crate::builder;
use crate::cache::ReplayCache;
use crate::error::{Error, ErrorResult, Result};
use crate::executor::{Executor, ResponseResult};
use crate::request::{RawRequestConfig, RequestDescriptor};

/// What the user sees after a send or replay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Response(ResponseResult),
    Error(ErrorResult),
}

impl Outcome {
    pub fn response(&self) -> Option<&ResponseResult> {
        match self {
            Outcome::Response(r) => Some(r),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            Outcome::Response(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }
}

impl From<Result<ResponseResult>> for Outcome {
    fn from(result: Result<ResponseResult>) -> Self {
        match result {
            Ok(response) => Outcome::Response(response),
            Err(e) => Outcome::Error(e.into()),
        }
    }
}

pub struct Session {
    executor: Executor,
    cache: ReplayCache,
    form: RawRequestConfig,
    last_outcome: Option<Outcome>,
}

impl Session {
    pub fn new(executor: Executor) -> Self {
        Self::with_cache(executor, ReplayCache::new())
    }

    pub fn with_cache(executor: Executor, cache: ReplayCache) -> Self {
        Self {
            executor,
            cache,
            form: RawRequestConfig::default(),
            last_outcome: None,
        }
    }

    pub fn form(&self) -> &RawRequestConfig {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RawRequestConfig {
        &mut self.form
    }

    pub fn set_form(&mut self, form: RawRequestConfig) {
        self.form = form;
    }

    pub fn cache(&self) -> &ReplayCache {
        &self.cache
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Descriptor the current form would send, without sending it
    pub fn preview(&self) -> Result<RequestDescriptor> {
        builder::build(&self.form)
    }

    /// Build and send the current form.
    ///
    /// The form is cached for replay once it builds, before the network
    /// call resolves. Taking `&mut self` keeps a second send from starting
    /// while one is in flight.
    pub async fn send(&mut self) -> Outcome {
        let config = self.form.clone();

        let outcome: Outcome = match builder::build(&config) {
            Ok(descriptor) => {
                self.cache.set(config);
                self.executor.send(&descriptor).await.into()
            }
            Err(e) => {
                warn!(error = %e, "Request not sent");
                Outcome::Error(e.into())
            }
        };

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Restore the form from the cache and send it again
    pub async fn replay(&mut self) -> Outcome {
        let Some(cached) = self.cache.get() else {
            warn!("Replay requested with no prior request");
            let outcome = Outcome::Error(Error::NoPriorRequest.into());
            self.last_outcome = Some(outcome.clone());
            return outcome;
        };

        debug!(method = %cached.method, url = %cached.url, "Replaying last request");
        self.form = cached.clone();
        self.send().await
    }

    /// Reset the form, forget the last response and clear the replay cache
    pub fn reset(&mut self) {
        self.form = RawRequestConfig::default();
        self.last_outcome = None;
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::executor::ExecutorConfig;

    fn session() -> Session {
        Session::new(Executor::new(&ExecutorConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_empty_url_is_not_cached() {
        let mut session = session();
        let outcome = session.send().await;

        assert_eq!(outcome.error().unwrap().kind, ErrorKind::InvalidRequest);
        assert!(session.cache().is_empty());
    }

    #[tokio::test]
    async fn test_replay_with_empty_cache() {
        let mut session = session();
        session.set_form(RawRequestConfig::new("GET", "https://example.com"));

        let outcome = session.replay().await;
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::NoPriorRequest);
        assert_eq!(session.form().url, "https://example.com");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = session();
        session.set_form(
            RawRequestConfig::new("DELETE", "https://example.com/items/1").with_header("X-A", "1"),
        );
        session.reset();

        assert_eq!(session.form(), &RawRequestConfig::default());
        assert!(session.last_outcome().is_none());
    }
}
