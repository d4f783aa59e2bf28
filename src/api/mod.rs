//! API Module
//!
//! HTTP client for the restaurant REST API.
//!
//! # Endpoints
//! - `GET /restaurants` - Restaurant list
//! - `GET /orders` - Customer orders
//! - `GET /bookings` - Customer bookings
//! - `GET /bookings/notifications` - Latest notifications
//! - `GET /bookings/notifications/unread-count` - Unread notification count
//! - `PUT /bookings/notifications/:id/read` - Mark one notification read
//! - `PUT /bookings/notifications/mark-all-read` - Mark all notifications read

pub mod client;
pub mod endpoints;

pub use client::{ClientStats, CustomerApi};
