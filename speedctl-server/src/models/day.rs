//! UTC calendar day boundaries

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// Half-open `[start, end)` interval covering one UTC calendar day.
///
/// Computed here rather than with `DATE(UTC_TIMESTAMP())` so the filter is a
/// plain range comparison against bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcDay {
    start: DateTime<Utc>,
}

impl UtcDay {
    /// The UTC day that contains `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let midnight = instant.date_naive().and_time(NaiveTime::MIN);
        Self {
            start: Utc.from_utc_datetime(&midnight),
        }
    }

    /// The current UTC day.
    pub fn today() -> Self {
        Self::containing(Utc::now())
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::days(1)
    }
}
