//! Customer API Client
//!
//! Fetches restaurants, orders, bookings and notifications, routing every
//! read through a request cache so concurrent identical requests share one
//! network call.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::endpoints::{self, Auth};
use crate::cache::{CacheStats, RequestCache, RequestParams};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{ApiResponse, Booking, Notification, Order, Restaurant, UnreadCount};

/// Timeout applied to each HTTP request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type ResponseCache<T> = RequestCache<ApiResponse<T>, ApiError>;

/// One cache per resource family, so each holds a single payload type.
#[derive(Debug, Clone)]
struct ResponseCaches {
    restaurants: ResponseCache<Vec<Restaurant>>,
    orders: ResponseCache<Vec<Order>>,
    bookings: ResponseCache<Vec<Booking>>,
    notifications: ResponseCache<Vec<Notification>>,
    unread: ResponseCache<UnreadCount>,
}

impl ResponseCaches {
    fn from_config(config: &Config) -> Self {
        Self {
            restaurants: RequestCache::from_config(config),
            orders: RequestCache::from_config(config),
            bookings: RequestCache::from_config(config),
            notifications: RequestCache::from_config(config),
            unread: RequestCache::from_config(config),
        }
    }
}

/// Cache statistics of every resource family.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub restaurants: CacheStats,
    pub orders: CacheStats,
    pub bookings: CacheStats,
    pub notifications: CacheStats,
    pub unread: CacheStats,
}

// == Customer Api ==
/// Client for the customer side of the restaurant API.
///
/// Cheap to clone; clones share the HTTP connection pool and the caches.
#[derive(Debug, Clone)]
pub struct CustomerApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    caches: ResponseCaches,
}

impl CustomerApi {
    // == Constructor ==
    /// Creates a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            caches: ResponseCaches::from_config(config),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // == Reads ==
    /// Returns the restaurant list.
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>> {
        self.cached_get(
            &self.caches.restaurants,
            endpoints::RESTAURANTS,
            RequestParams::new(),
            Auth::Public,
        )
        .await
    }

    /// Returns the restaurant list if a valid copy is cached, without any request.
    pub fn cached_restaurants(&self) -> Option<Vec<Restaurant>> {
        self.caches
            .restaurants
            .lookup(endpoints::RESTAURANTS, &RequestParams::new())
            .and_then(|response| response.into_data(endpoints::RESTAURANTS).ok())
    }

    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.cached_get(
            &self.caches.orders,
            endpoints::ORDERS,
            RequestParams::new(),
            Auth::Required,
        )
        .await
    }

    pub async fn bookings(&self) -> Result<Vec<Booking>> {
        self.cached_get(
            &self.caches.bookings,
            endpoints::BOOKINGS,
            RequestParams::new(),
            Auth::Required,
        )
        .await
    }

    /// Returns the latest `limit` notifications.
    pub async fn notifications(&self, limit: u32) -> Result<Vec<Notification>> {
        self.cached_get(
            &self.caches.notifications,
            endpoints::NOTIFICATIONS,
            RequestParams::new().with("limit", limit),
            Auth::Required,
        )
        .await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        let unread = self
            .cached_get(
                &self.caches.unread,
                endpoints::UNREAD_COUNT,
                RequestParams::new(),
                Auth::Required,
            )
            .await?;
        Ok(unread.count)
    }

    // == Commands ==
    /// Marks one notification as read and drops cached notification data.
    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        let path = endpoints::notification_read(id);
        let request = self.request(Method::PUT, &path, Auth::Required)?;
        send_json::<serde_json::Value>(path.clone(), request)
            .await?
            .ensure_success(&path)?;
        self.invalidate_notifications();
        Ok(())
    }

    /// Marks every notification as read and drops cached notification data.
    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        let path = endpoints::MARK_ALL_READ;
        let request = self.request(Method::PUT, path, Auth::Required)?;
        send_json::<serde_json::Value>(path.to_string(), request)
            .await?
            .ensure_success(path)?;
        self.invalidate_notifications();
        Ok(())
    }

    // == Cache Control ==
    /// Drops every cached response, e.g. on logout.
    pub fn clear_caches(&self) {
        self.caches.restaurants.clear();
        self.caches.orders.clear();
        self.caches.bookings.clear();
        self.caches.notifications.clear();
        self.caches.unread.clear();
    }

    pub fn stats(&self) -> ClientStats {
        ClientStats {
            restaurants: self.caches.restaurants.stats(),
            orders: self.caches.orders.stats(),
            bookings: self.caches.bookings.stats(),
            notifications: self.caches.notifications.stats(),
            unread: self.caches.unread.stats(),
        }
    }

    fn invalidate_notifications(&self) {
        let removed = self.caches.notifications.invalidate_pattern(endpoints::NOTIFICATIONS)
            + self.caches.unread.invalidate_pattern(endpoints::NOTIFICATIONS);
        debug!(removed, "Dropped cached notification data");
    }

    // == Request Plumbing ==
    async fn cached_get<T>(
        &self,
        cache: &ResponseCache<T>,
        path: &'static str,
        params: RequestParams,
        auth: Auth,
    ) -> Result<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let mut request = self.request(Method::GET, path, auth)?;
        if !params.is_empty() {
            request = request.query(&params);
        }

        let response = cache
            .dedupe(path, &params, move || send_json::<T>(path.to_string(), request))
            .await?;
        response.into_data(path)
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder> {
        let request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match (auth, &self.token) {
            (Auth::Public, _) => Ok(request),
            (Auth::Required, Some(token)) => Ok(request.bearer_auth(token)),
            (Auth::Required, None) => Err(ApiError::Unauthenticated(path.to_string())),
        }
    }
}

/// Sends a request and decodes its JSON body.
async fn send_json<T: DeserializeOwned>(
    path: String,
    request: RequestBuilder,
) -> Result<ApiResponse<T>> {
    debug!(path = %path, "Sending request");
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        warn!(path = %path, status = status.as_u16(), "Request failed");
        return Err(ApiError::Status {
            path,
            status: status.as_u16(),
        });
    }

    Ok(response.json::<ApiResponse<T>>().await?)
}
