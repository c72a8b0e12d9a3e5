// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! MET ↔ UTC calendar conversions.
//!
//! The mission clock counts SI seconds since 2001-01-01T00:00:00 UTC and
//! therefore includes every leap second inserted since. Chrono, like POSIX
//! time, does not; converting in either direction means removing or adding
//! the leap seconds listed in [`leap_seconds`](crate::leap_seconds).
//!
//! ```rust
//! use fermi_lcr::{calendar, Met};
//!
//! let date = calendar::met_to_date(Met::new(43_200.0)).unwrap();
//! assert_eq!(date.datetime().to_rfc3339(), "2001-01-01T12:00:00+00:00");
//! assert!((date.fraction_of_day_used() - 0.5).abs() < 1e-12);
//! ```

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::leap_seconds::{leap_seconds_at, leap_seconds_before_met};
use crate::met::Met;

/// Unix timestamp of the mission epoch, 2001-01-01T00:00:00 UTC.
pub const MISSION_EPOCH_UNIX: i64 = 978_307_200;

const NANOS_PER_SECOND: f64 = 1e9;

/// The mission epoch as a chrono timestamp.
#[inline]
pub fn mission_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::TimeDelta::seconds(MISSION_EPOCH_UNIX)
}

/// A MET expressed on the UTC calendar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CalendarDate {
    datetime: DateTime<Utc>,
    fraction_of_day_used: f64,
}

impl CalendarDate {
    fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let seconds_of_day =
            datetime.second() as f64 + 60.0 * datetime.minute() as f64 + 3600.0 * datetime.hour() as f64;
        Self {
            datetime,
            fraction_of_day_used: (seconds_of_day / 86.4) / 1000.0,
        }
    }

    /// UTC timestamp of the instant.
    #[inline]
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    /// Legacy day fraction, `((h·3600 + m·60 + s) / 86.4) / 1000`.
    ///
    /// Built from whole seconds only; sub-second digits are dropped. Kept
    /// in this form because downstream MJD values are defined with it.
    #[inline]
    pub fn fraction_of_day_used(&self) -> f64 {
        self.fraction_of_day_used
    }

    /// Proleptic Gregorian ordinal, 0001-01-01 being day 1.
    #[inline]
    pub fn ordinal_day(&self) -> i32 {
        self.datetime.num_days_from_ce()
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Convert a MET to its UTC calendar date.
///
/// One second is removed for every leap-second threshold the MET exceeds
/// before the remaining offset is added to the epoch. Returns `None` for
/// NaN/infinite input or dates outside chrono's range.
pub fn met_to_date(met: Met) -> Option<CalendarDate> {
    let seconds = met.value();
    if !seconds.is_finite() {
        return None;
    }
    let corrected = seconds - leap_seconds_before_met(seconds) as f64;

    let mut whole = corrected.floor();
    let mut nanos = ((corrected - whole) * NANOS_PER_SECOND).round();
    if nanos >= NANOS_PER_SECOND {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    let unix = (whole as i64).checked_add(MISSION_EPOCH_UNIX)?;
    let datetime = DateTime::<Utc>::from_timestamp(unix, nanos as u32)?;
    Some(CalendarDate::from_datetime(datetime))
}

/// MET of a UTC timestamp.
///
/// Inverse of [`met_to_date`]: the POSIX offset from the epoch plus one
/// second for every leap second already inserted at `datetime`.
pub fn met_from_utc(datetime: DateTime<Utc>) -> Met {
    let whole = (datetime.timestamp() - MISSION_EPOCH_UNIX) as f64;
    let fraction = datetime.timestamp_subsec_nanos() as f64 / NANOS_PER_SECOND;
    Met::new(whole + fraction + leap_seconds_at(datetime) as f64)
}

/// MET of the current wall-clock time.
pub fn current_met() -> Met {
    met_from_utc(Utc::now())
}
