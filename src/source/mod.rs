//! Remote sources.
//!
//! A `RemoteSource` fetches one resource by URL and returns its raw JSON payload.
//! It does not retry; retry policy belongs to the caller.

pub mod fixture;
pub mod http;

pub use fixture::FixtureSource;
pub use http::HttpSource;

use crate::errors::CatalogResult;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

pub trait RemoteSource: Send + Sync + 'static {
    /// Retrieve the resource at `url`.
    ///
    /// Fails with `NotFound` when the remote reports the resource missing and with
    /// `Unavailable` for every other non-success status or transport failure.
    fn fetch(&self, url: &str) -> impl Future<Output = CatalogResult<Value>> + Send;
}

impl<S: RemoteSource> RemoteSource for Arc<S> {
    fn fetch(&self, url: &str) -> impl Future<Output = CatalogResult<Value>> + Send {
        (**self).fetch(url)
    }
}
