//! Mock data store
//!
//! Static fixtures backing mock mode. Every accessor returns a fresh copy,
//! so callers may mutate what they get.

mod providers;
mod role_play;
mod solution;
mod token_map;

pub use providers::{provider_info, ProviderInfo, PROVIDERS};
pub use role_play::role_play_session;
pub use solution::solution;
pub use token_map::{token_map, FIXTURE_CUSTOMER_ID, FIXTURE_CUSTOMER_NAME};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate an identifier like `map-1a2b3c4d5e6f-7`.
///
/// The random part comes from a v4 UUID and the suffix from a process-wide
/// counter, so two calls in the same run never collide.
pub fn generate_id(prefix: &str) -> String {
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{:x}", prefix, &random[..12], seq)
}

/// Fixed fixture timestamp (UTC)
pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_prefix() {
        let id = generate_id("map");
        assert!(id.starts_with("map-"));
    }

    #[test]
    fn test_generate_id_is_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id("sol")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_fixture_timestamp() {
        assert_eq!(at(2026, 2, 14, 10, 0).to_rfc3339(), "2026-02-14T10:00:00+00:00");
    }
}
