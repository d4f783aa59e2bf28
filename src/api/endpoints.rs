//! API Endpoints
//!
//! Paths of the restaurant API, relative to the configured base URL. The
//! read paths double as the resource identifiers of their cache keys.

/// `GET` - public restaurant list
pub const RESTAURANTS: &str = "/restaurants";

/// `GET` - orders of the logged-in customer
pub const ORDERS: &str = "/orders";

/// `GET` - bookings of the logged-in customer
pub const BOOKINGS: &str = "/bookings";

/// `GET` - latest notifications, takes a `limit` query parameter
pub const NOTIFICATIONS: &str = "/bookings/notifications";

/// `GET` - number of unread notifications
pub const UNREAD_COUNT: &str = "/bookings/notifications/unread-count";

/// `PUT` - marks every notification as read
pub const MARK_ALL_READ: &str = "/bookings/notifications/mark-all-read";

/// `PUT` - marks one notification as read
pub fn notification_read(id: i64) -> String {
    format!("{}/{}/read", NOTIFICATIONS, id)
}

/// Whether an endpoint needs the customer's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Required,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_read_path() {
        assert_eq!(notification_read(42), "/bookings/notifications/42/read");
    }

    #[test]
    fn test_notification_family_shares_prefix() {
        // Pattern invalidation of the family relies on this
        assert!(UNREAD_COUNT.starts_with(NOTIFICATIONS));
        assert!(MARK_ALL_READ.starts_with(NOTIFICATIONS));
    }
}
