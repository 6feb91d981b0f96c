use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_HOUR: f64 = 3_600.0;
const SECS_PER_DAY: f64 = 86_400.0;

/// Point in time as (fractional) seconds since the Unix epoch.
///
/// Absence is modelled with `Option<Timestamp>`. The scorer additionally treats
/// a zero timestamp as absent: file systems that cannot report a time tend to
/// report the epoch, and such a value carries no recency information.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    pub const fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// `true` for the epoch itself, which the scorer reads as "no data".
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Hours elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn hours_until(self, later: Timestamp) -> f64 {
        (later.0 - self.0) / SECS_PER_HOUR
    }

    /// Days elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn days_until(self, later: Timestamp) -> f64 {
        (later.0 - self.0) / SECS_PER_DAY
    }

    /// Calendar year in the local time zone, `None` when out of chrono's range.
    pub fn local_year(self) -> Option<i32> {
        self.to_local().map(|dt| dt.year())
    }

    pub fn to_local(self) -> Option<DateTime<Local>> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
            .map(|utc| utc.with_timezone(&Local))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Self(elapsed.as_secs_f64()),
            Err(before) => Self(-before.duration().as_secs_f64()),
        }
    }
}
