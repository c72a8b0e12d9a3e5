// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mission Elapsed Time instant.
//!
//! [`Met`] stores a [`Seconds`] quantity counted from the mission epoch,
//! 2001-01-01T00:00:00 UTC. Values coming off the wire are plain `f64`
//! seconds; wrapping them keeps MET from being mixed up with MJD days or
//! bin durations. Calendar and MJD conversions live in
//! [`calendar`](crate::calendar) and [`mjd`](crate::mjd) and are exposed
//! here as inherent methods.

use chrono::{DateTime, Utc};
use qtty::Seconds;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{self, CalendarDate};
use crate::mjd::{self, Mjd};

/// A point on the mission elapsed time axis.
///
/// `Copy` and layout-identical to a single `f64`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Met {
    quantity: Seconds,
}

impl Met {
    /// The mission epoch itself (MET 0).
    pub const EPOCH: Self = Self::new(0.0);

    /// Create from raw seconds since the mission epoch.
    #[inline]
    pub const fn new(seconds: f64) -> Self {
        Self {
            quantity: Seconds::new(seconds),
        }
    }

    /// Create from a [`Seconds`] quantity.
    #[inline]
    pub const fn from_seconds(quantity: Seconds) -> Self {
        Self { quantity }
    }

    /// The underlying quantity in seconds.
    #[inline]
    pub const fn quantity(&self) -> Seconds {
        self.quantity
    }

    /// The underlying scalar value in seconds.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    // ── conversions ───────────────────────────────────────────────────

    /// Calendar date of this MET with the historical leap seconds removed.
    ///
    /// Returns `None` for non-finite values or dates chrono cannot represent.
    #[inline]
    pub fn to_date(&self) -> Option<CalendarDate> {
        calendar::met_to_date(*self)
    }

    /// Modified Julian Date of this MET, see [`mjd::met_to_mjd`].
    #[inline]
    pub fn to_mjd(&self, include_fraction: bool) -> Option<Mjd> {
        mjd::met_to_mjd(*self, include_fraction)
    }

    /// MET of a UTC timestamp, leap seconds added back.
    #[inline]
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        calendar::met_from_utc(datetime)
    }

    /// MET of the current wall-clock time.
    #[inline]
    pub fn now() -> Self {
        calendar::current_met()
    }

    // ── min / max ─────────────────────────────────────────────────────

    /// Earlier of two instants.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.value() < self.value() {
            other
        } else {
            self
        }
    }

    /// Later of two instants.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other.value() > self.value() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for Met {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MET {} s", self.value())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Met {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Met {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Seconds> for Met {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Seconds) -> Self::Output {
        Self::from_seconds(self.quantity + rhs)
    }
}

impl AddAssign<Seconds> for Met {
    #[inline]
    fn add_assign(&mut self, rhs: Seconds) {
        self.quantity = self.quantity + rhs;
    }
}

impl Sub<Seconds> for Met {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Seconds) -> Self::Output {
        Self::from_seconds(self.quantity - rhs)
    }
}

impl SubAssign<Seconds> for Met {
    #[inline]
    fn sub_assign(&mut self, rhs: Seconds) {
        self.quantity = self.quantity - rhs;
    }
}

impl Sub for Met {
    type Output = Seconds;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

impl From<f64> for Met {
    #[inline]
    fn from(seconds: f64) -> Self {
        Self::new(seconds)
    }
}

impl From<Met> for Seconds {
    #[inline]
    fn from(met: Met) -> Self {
        met.quantity
    }
}
