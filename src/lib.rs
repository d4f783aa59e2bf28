//! Table Cache - request caching for a restaurant booking client
//!
//! Provides a TTL request cache that coalesces concurrent identical requests
//! into one operation, and a customer API client built on top of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::CustomerApi;
pub use cache::{CacheKey, RequestCache, RequestParams};
pub use config::Config;
pub use error::ApiError;
pub use tasks::spawn_refresh_task;
