//! URL helpers for frontend-backend communication
//!
//! The dashboard and the report page talk to the same backend; both build
//! their URLs here so the query-encoding rule lives in one place.

use contracts::dashboards::d400_match_stats::FilterSet;

/// Build a full API URL from a base and a path
///
/// # Arguments
/// * `base` - Origin prefix, empty for same-origin requests
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```rust
/// assert_eq!(frontend::shared::api_utils::api_url("", "/api/summary"), "/api/summary");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Encode a filter as a query string, skipping unset fields
///
/// Returns an empty string when no field is set.
pub fn filter_query(filters: &FilterSet) -> String {
    match serde_qs::to_string(&filters.normalized()) {
        Ok(query) => query,
        Err(e) => {
            log::error!("Failed to encode filters {:?}: {}", filters, e);
            String::new()
        }
    }
}

/// Append a filter query to a URL, omitting `?` when there is nothing to add
pub fn with_filters(url: &str, filters: &FilterSet) -> String {
    let query = filter_query(filters);
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, query)
    }
}
