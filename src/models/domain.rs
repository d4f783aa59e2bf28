//! Domain models returned by the restaurant API
//!
//! Fields the server may omit are optional or defaulted, so older rows and
//! partial payloads still decode.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub total_tables: Option<u32>,
    #[serde(default)]
    pub available_tables: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: i64,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub booking_date: Option<String>,
    #[serde(default)]
    pub booking_time: Option<String>,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A booking/order notification shown in the notification bell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default = "default_notification_kind")]
    pub kind: String,
    /// SQLite hands booleans back as 0/1
    #[serde(default, deserialize_with = "bool_or_int")]
    pub is_read: bool,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

fn default_quantity() -> u32 {
    1
}

fn default_notification_kind() -> String {
    "info".to_string()
}

/// Accepts RFC 3339 as well as SQLite's `YYYY-MM-DD HH:MM:SS` (UTC).
fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(flag)) => flag,
        Some(Flag::Int(value)) => value != 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_restaurant_minimal_fields() {
        let json = r#"{"id": 1, "name": "The Golden Spoon"}"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.name, "The Golden Spoon");
        assert!(restaurant.tables.is_empty());
        assert!(restaurant.rating.is_none());
    }

    #[test]
    fn test_restaurant_full_fields() {
        let json = r#"{
            "id": 2,
            "name": "Sakura Sushi",
            "cuisine": "Japanese",
            "rating": 4.6,
            "tables": [{"id": 7, "table_number": 3, "capacity": 4, "status": "available"}],
            "total_tables": 15,
            "available_tables": 8
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.cuisine.as_deref(), Some("Japanese"));
        assert_eq!(restaurant.tables.len(), 1);
        assert_eq!(restaurant.tables[0].capacity, Some(4));
        assert_eq!(restaurant.available_tables, Some(8));
    }

    #[test]
    fn test_notification_sqlite_row() {
        let json = r#"{
            "id": 9,
            "title": "Booking confirmed",
            "message": "Table for two at 19:00",
            "type": "success",
            "is_read": 0,
            "restaurant_name": "Mama's Italian",
            "created_at": "2024-03-05 18:30:00"
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, "success");
        assert!(!notification.is_read);

        let created = notification.created_at.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 5));
        assert_eq!(created.hour(), 18);
    }

    #[test]
    fn test_notification_defaults() {
        let json = r#"{"id": 1, "title": "t", "message": "m", "is_read": true,
                       "created_at": "2024-03-05T18:30:00Z"}"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, "info");
        assert!(notification.is_read);
        assert!(notification.created_at.is_some());
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = r#"{"id": 1, "created_at": "yesterday"}"#;
        assert!(serde_json::from_str::<Order>(json).is_err());
    }

    #[test]
    fn test_order_item_default_quantity() {
        let json = r#"{"id": 5, "items": [{"name": "Ramen", "price": 12.5}], "created_at": null}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.items[0].quantity, 1);
        assert!(order.created_at.is_none());
    }
}
