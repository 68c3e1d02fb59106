use serde::Serialize;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

pub fn health_report() -> HealthResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp,
    }
}

/// Best-effort reachability probe of the caption provider. Any HTTP answer
/// counts as reachable. Blocking; call outside the async runtime.
pub fn check_provider(base_url: &str, timeout: Duration) -> bool {
    let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(_) => return false,
    };
    client.head(base_url.trim_end_matches('/')).send().is_ok()
}
