//! replayn: compose an HTTP request from key/value rows, send it, inspect
//! the response, and replay the last request unchanged.
//!
//! The pipeline is [`builder::build`] (pure) followed by
//! [`executor::Executor::send`]. [`session::Session`] ties both to a
//! single-slot [`cache::ReplayCache`].

pub mod builder;
pub mod cache;
pub mod error;
pub mod executor;
pub mod output;
pub mod request;
pub mod session;
pub mod shell;

pub use builder::build;
pub use cache::ReplayCache;
pub use error::{Error, ErrorKind, ErrorResult, Result};
pub use executor::{Executor, ExecutorConfig, ResponseResult};
pub use request::{HeaderEntry, KeyValue, ParamEntry, RawRequestConfig, RequestDescriptor};
pub use session::{Outcome, Session};
