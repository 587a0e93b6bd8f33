use chrono::{DateTime, NaiveDate};

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;

    /// Calendar date (UTC) for `now_ms`.
    fn today(&self) -> NaiveDate {
        DateTime::from_timestamp_millis(self.now_ms())
            .map(|dt| dt.date_naive())
            .unwrap_or_default()
    }
}
