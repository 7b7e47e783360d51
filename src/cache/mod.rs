//! Request caching for commands that call out to external services
//!
//! A [`RequestCache`] memoizes the result of an async request for a fixed
//! TTL and collapses concurrent requests for the same key into a single
//! shared execution. It knows nothing about what the request does.

mod store;

pub use store::{CacheError, CacheStats, RequestCache};
