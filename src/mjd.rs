// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Modified Julian Date of mission times.
//!
//! The MJD used by the repository is built from the calendar date rather
//! than from a continuous time scale:
//!
//! ```text
//! JD  = ordinal_day(date) + 1 721 425
//! MJD = JD − 2 400 001   (+ fraction_of_day_used)
//! ```
//!
//! which agrees with the usual `JD − 2 400 000.5` at 00:00 UTC of each day.

use qtty::{Day, Days, Seconds};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{met_from_utc, met_to_date, MISSION_EPOCH_UNIX};
use crate::met::Met;

/// Offset from the proleptic ordinal day to the Julian Day number.
pub const ORDINAL_TO_JD: i64 = 1_721_425;

/// Offset from the ordinal Julian Day number to MJD.
pub const JD_TO_MJD: i64 = 2_400_001;

/// MJD of the Unix epoch, 1970-01-01.
const UNIX_EPOCH_MJD: f64 = 40_587.0;

/// A Modified Julian Date, in days.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Mjd {
    quantity: Days,
}

impl Mjd {
    /// Create from a raw day count.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying scalar value in days.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Convert back to mission elapsed time.
    ///
    /// The day count is placed on the UTC calendar and then goes through
    /// [`met_from_utc`], so the leap seconds are added back. Returns `None`
    /// when the date is outside chrono's range.
    pub fn to_met(&self) -> Option<Met> {
        let unix_seconds = Days::new(self.value() - UNIX_EPOCH_MJD).to::<qtty::Second>();
        let secs = unix_seconds.value();
        if !secs.is_finite() {
            return None;
        }
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0);
        let datetime = chrono::DateTime::<chrono::Utc>::from_timestamp(whole as i64, nanos as u32)?;
        Some(met_from_utc(datetime))
    }
}

impl std::fmt::Display for Mjd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MJD {}", self.value())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Mjd {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Mjd {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

impl From<Mjd> for Days {
    #[inline]
    fn from(mjd: Mjd) -> Self {
        mjd.quantity
    }
}

/// MJD of a MET.
///
/// With `include_fraction == false` only the whole day number of the UTC
/// calendar date is returned.
pub fn met_to_mjd(met: Met, include_fraction: bool) -> Option<Mjd> {
    let date = met_to_date(met)?;
    let jd = date.ordinal_day() as i64 + ORDINAL_TO_JD;
    let mut mjd = (jd - JD_TO_MJD) as f64;
    if include_fraction {
        mjd += date.fraction_of_day_used();
    }
    Some(Mjd::new(mjd))
}

/// Convert a span of mission seconds (a bin width, an error bar) to days.
#[inline]
pub fn seconds_to_days(span: Seconds) -> Days {
    span.to::<Day>()
}

/// MJD of the mission epoch.
#[inline]
pub fn mission_epoch_mjd() -> Mjd {
    Mjd::new(UNIX_EPOCH_MJD + (MISSION_EPOCH_UNIX / 86_400) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_mjd() {
        assert_eq!(met_to_mjd(Met::EPOCH, true).unwrap().value(), 51_910.0);
        assert_eq!(mission_epoch_mjd().value(), 51_910.0);
    }

    #[test]
    fn fraction_is_optional() {
        let met = Met::new(86_400.0 * 10.0 + 43_200.0);
        let with = met_to_mjd(met, true).unwrap().value();
        let without = met_to_mjd(met, false).unwrap().value();
        assert_eq!(without, 51_920.0);
        assert!((with - 51_920.5).abs() < 1e-9);
    }

    #[test]
    fn leap_seconds_shift_day_boundary() {
        // 2017-01-01T00:00:00 UTC is 5844 days and 5 leap seconds after the
        // epoch; one second earlier is still 2016-12-31.
        let midnight = Met::new(5_844.0 * 86_400.0 + 5.0);
        assert_eq!(met_to_mjd(midnight, false).unwrap().value(), 57_754.0);
        let before = midnight - Seconds::new(1.0);
        assert_eq!(met_to_mjd(before, false).unwrap().value(), 57_753.0);
    }

    #[test]
    fn mjd_to_met_roundtrip_within_a_second() {
        for threshold in crate::leap_seconds::MET_THRESHOLDS {
            for offset in [-5_000.0, 5_000.0] {
                let met = Met::new(threshold + offset);
                let back = met_to_mjd(met, true).unwrap().to_met().unwrap();
                assert!(
                    (back.value() - met.value()).abs() < 1.0,
                    "MET {} came back as {}",
                    met.value(),
                    back.value()
                );
            }
        }
    }

    #[test]
    fn seconds_to_days_for_daily_half_width() {
        let days = seconds_to_days(Seconds::new(259_200.0));
        assert!((days.value() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn display() {
        assert_eq!(Mjd::new(59_000.5).to_string(), "MJD 59000.5");
    }
}
