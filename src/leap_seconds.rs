// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Leap seconds inserted since the mission epoch.
//!
//! Five leap seconds have been inserted into UTC since 2001-01-01: at the
//! ends of 2005, 2008, June 2012, June 2015 and 2016. They are described
//! twice, once per conversion direction:
//!
//! * [`MET_THRESHOLDS`] — MET values beyond which a leap second has to be
//!   removed before adding the offset to the epoch (MET → date).
//! * [`CALENDAR_BOUNDARIES`] — the first UTC (year, month) at which the
//!   leap second is in effect (date → MET).
//!
//! Both tables must grow together when IERS Bulletin C announces a new
//! insertion.

use chrono::{DateTime, Datelike, Utc};

/// MET thresholds, one per leap second, in chronological order.
///
/// | Threshold (s) | Leap second |
/// |---------------|-------------|
/// | 157 766 400 | 2005-12-31 |
/// | 252 460 801 | 2008-12-31 |
/// | 362 793 601 | 2012-06-30 |
/// | 457 401 601 | 2015-06-30 |
/// | 504 921 601 | 2016-12-31 |
pub const MET_THRESHOLDS: [f64; 5] = [
    157_766_400.0,
    252_460_801.0,
    362_793_601.0,
    457_401_601.0,
    504_921_601.0,
];

/// First UTC (year, month) at which each leap second has been applied.
pub const CALENDAR_BOUNDARIES: [(i32, u32); 5] = [
    (2006, 1), // 2005-12-31T23:59:60
    (2009, 1), // 2008-12-31T23:59:60
    (2012, 7), // 2012-06-30T23:59:60
    (2015, 7), // 2015-06-30T23:59:60
    (2017, 1), // 2016-12-31T23:59:60
];

/// Number of leap seconds to remove from `met` before calendar conversion.
///
/// Each threshold is compared against the input value, so removing one
/// second can never push the value back under a later threshold.
#[inline]
pub fn leap_seconds_before_met(met: f64) -> u32 {
    MET_THRESHOLDS
        .iter()
        .filter(|&&threshold| met > threshold)
        .count() as u32
}

/// Number of leap seconds already inserted at the given UTC time.
///
/// Compares by calendar month only, matching the granularity of the
/// announcements (leap seconds are always inserted at a month end).
#[inline]
pub fn leap_seconds_at(datetime: DateTime<Utc>) -> u32 {
    let now = (datetime.year(), datetime.month());
    CALENDAR_BOUNDARIES
        .iter()
        .filter(|&&boundary| now >= boundary)
        .count() as u32
}
