use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::warn;

use super::error::AccessError;

/// What to do when an upstream record carries a missing or unparseable
/// `event_date`/`event_time` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedDatePolicy {
    /// Substitute the current instant. Lossy: bad upstream data goes unnoticed.
    #[default]
    FallbackToNow,
    /// Fail the whole operation with [`AccessError::InvalidDate`].
    Reject,
}

impl MalformedDatePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "now" | "fallback" | "fallback_to_now" => Some(Self::FallbackToNow),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Combine a calendar date and a time of day, applying this policy when
    /// the parts cannot be combined.
    pub fn combine(
        &self,
        date: Option<&str>,
        time: Option<&str>,
    ) -> Result<DateTime<Utc>, AccessError> {
        match combine_date_time(date, time) {
            Some(instant) => Ok(instant),
            None => match self {
                Self::FallbackToNow => {
                    warn!(?date, ?time, "Malformed event date/time, using current time");
                    Ok(Utc::now())
                }
                Self::Reject => Err(AccessError::InvalidDate(format!(
                    "date={} time={}",
                    date.unwrap_or("<missing>"),
                    time.unwrap_or("<missing>")
                ))),
            },
        }
    }
}

/// Interprets `YYYY-MM-DD` and `HH:MM[:SS]` as local wall-clock time.
/// Each part is read up to its first non-digit, so `2025-06-01T00:00:00.000Z`
/// yields 2025-06-01. Seconds are ignored. Returns `None` when either part is
/// missing or has no leading digits, or when the local time does not exist
/// (DST gap).
pub fn combine_date_time(date: Option<&str>, time: Option<&str>) -> Option<DateTime<Utc>> {
    let mut date_parts = date?.trim().split('-');
    let year: i32 = leading_int(date_parts.next()?)?;
    let month: u32 = leading_int(date_parts.next()?)?;
    let day: u32 = leading_int(date_parts.next()?)?;

    let mut time_parts = time?.trim().split(':');
    let hour: u32 = leading_int(time_parts.next()?)?;
    let minute: u32 = leading_int(time_parts.next()?)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?
        .and_time(NaiveTime::from_hms_opt(hour, minute, 0)?);

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

fn leading_int<T: FromStr>(part: &str) -> Option<T> {
    let part = part.trim_start();
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

/// Splits an instant into the `(YYYY-MM-DD, HH:MM:00)` pair the upstream API
/// stores, using local wall-clock time.
pub fn split_date_time(instant: &DateTime<Utc>) -> (String, String) {
    let local = instant.with_timezone(&Local);
    (
        local.format("%Y-%m-%d").to_string(),
        local.format("%H:%M:00").to_string(),
    )
}
