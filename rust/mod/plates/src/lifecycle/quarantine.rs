//! Returned plates rest for two calendar years before they can be issued
//! again.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use platetrack_core::parse_instant;

use super::error::LifecycleError;
use crate::model::{Plate, PlateStatus};

pub const QUARANTINE_YEARS: i32 = 2;

/// `returned` plus two calendar years, same time of day.
///
/// A return on 29 February releases on 1 March when the target year has no
/// leap day.
pub fn release_date(returned: DateTime<Utc>) -> DateTime<Utc> {
    let year = returned.year() + QUARANTINE_YEARS;
    returned
        .with_year(year)
        .or_else(|| {
            NaiveDate::from_ymd_opt(year, 3, 1).map(|d| d.and_time(returned.time()).and_utc())
        })
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn is_released(returned: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    release_date(returned) <= now
}

/// Release date of a plate still in quarantine at `now`, if any.
///
/// Only RETURNED plates with a `date_returned` can be quarantined.
pub fn pending_release(plate: &Plate, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, LifecycleError> {
    if plate.status != PlateStatus::Returned {
        return Ok(None);
    }
    let Some(raw) = plate.date_returned.as_option() else {
        return Ok(None);
    };
    let returned = parse_instant(raw).ok_or_else(|| LifecycleError::InvalidTimestamp { value: raw.clone() })?;
    let release = release_date(returned);
    Ok((release > now).then_some(release))
}
