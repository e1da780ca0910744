//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

use serde::Serialize;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available (including non-wasm targets)
pub fn api_base() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return String::new(),
        };
        let location = window.location();
        let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
        let hostname = location
            .hostname()
            .unwrap_or_else(|_| "127.0.0.1".to_string());
        format!("{}//{}:3000", protocol, hostname)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Build a full API URL with a query string serialized from `query`
///
/// Falls back to the bare URL when the query cannot be serialized.
///
/// # Example
/// ```rust,ignore
/// let url = api_url_with_query("/api/v1/analytics/outliers/sales", &ZScoreQuery::from(&filter));
/// ```
pub fn api_url_with_query<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", api_url(path), qs),
        Ok(_) => api_url(path),
        Err(e) => {
            log::warn!("Failed to serialize query for {}: {}", path, e);
            api_url(path)
        }
    }
}
