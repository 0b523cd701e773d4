use {
    crate::{ChartError, Result},
    chrono::{DateTime, NaiveDate, TimeZone, Utc},
    chrono_tz::Tz,
};

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar arithmetic pinned to a single timezone, so bucket keys never
/// depend on where the process happens to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Berlin)
    }
}

impl Calendar {
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn day_of(self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn date_key(self, instant: DateTime<Utc>) -> String {
        self.day_of(instant).format(KEY_FORMAT).to_string()
    }

    /// Local midnight of the day named by `key`, as an absolute instant.
    pub fn start_of_day(self, key: &str) -> Result<DateTime<Utc>> {
        let day = NaiveDate::parse_from_str(key, KEY_FORMAT)
            .map_err(|_| ChartError::InvalidDate(key.to_string()))?;
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ChartError::InvalidDate(key.to_string()))?;

        // Midnight can be skipped by a DST jump in some zones; fall back to UTC midnight
        Ok(self
            .tz
            .from_local_datetime(&midnight)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight)))
    }

    /// Accepts either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
    pub fn parse_day(self, value: &str) -> Result<NaiveDate> {
        if let Ok(day) = NaiveDate::parse_from_str(value, KEY_FORMAT) {
            return Ok(day);
        }

        DateTime::parse_from_rfc3339(value)
            .map(|instant| self.day_of(instant.with_timezone(&Utc)))
            .map_err(|_| ChartError::InvalidDate(value.to_string()))
    }

    /// Whole days from the calendar day of `from` to `target`. Negative when
    /// the target lies before that day; time of day in `from` is ignored.
    pub fn days_until(self, from: DateTime<Utc>, target: NaiveDate) -> i64 {
        (target - self.day_of(from)).num_days()
    }

    pub fn days_between(self, from: DateTime<Utc>, target: &str) -> Result<i64> {
        Ok(self.days_until(from, self.parse_day(target)?))
    }
}
