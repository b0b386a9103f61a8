//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing endpoint URLs and auth headers.

use crate::shared::config::ApiConfig;

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url(&config.api, &config.api.upload_path);
/// ```
pub fn api_url(api: &ApiConfig, path: &str) -> String {
    let base = api.base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Value for the `Authorization` header
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
