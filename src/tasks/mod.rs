//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the client is up.
//!
//! # Tasks
//! - Refresh: re-fetches a resource through the request cache on an interval

mod refresh;

pub use refresh::spawn_refresh_task;
