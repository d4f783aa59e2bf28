//! Models for the restaurant API
//!
//! Domain types and the response envelope they arrive in.

pub mod domain;
pub mod responses;

// Re-export commonly used types
pub use domain::{Booking, Notification, Order, OrderItem, Restaurant, Table, UnreadCount};
pub use responses::ApiResponse;
