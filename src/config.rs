use log::Level;

/// Prefix for every local storage key the site writes.
pub const STORAGE_NAMESPACE: &str = "growth.engagement";

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub fn analytics_endpoint() -> String {
    format!("{}/api/analytics/events", get_backend_url())
}

/// Local builds log analytics to the console instead of posting them.
#[cfg(debug_assertions)]
pub fn analytics_enabled() -> bool {
    false
}

#[cfg(not(debug_assertions))]
pub fn analytics_enabled() -> bool {
    true
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
