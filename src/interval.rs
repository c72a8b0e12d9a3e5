// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time intervals on the MET axis.
//!
//! Used for the extent of each light-curve bin (`met ± duration`) and for
//! the overall time coverage of a light curve.

use qtty::Seconds;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::met::Met;
use crate::mjd::Mjd;

/// A half-open interval `[start, end)` of mission elapsed time.
///
/// ```
/// use fermi_lcr::{Interval, Met};
/// use qtty::Seconds;
///
/// let bin = Interval::centered(Met::new(1_000_000.0), Seconds::new(259_200.0));
/// assert_eq!(bin.start.value(), 740_800.0);
/// assert_eq!(bin.duration(), Seconds::new(518_400.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: Met,
    pub end: Met,
}

impl Interval {
    pub fn new(start: Met, end: Met) -> Self {
        Interval { start, end }
    }

    /// `[center − half_width, center + half_width)`.
    pub fn centered(center: Met, half_width: Seconds) -> Self {
        Interval::new(center - half_width, center + half_width)
    }

    /// Length of the interval.
    pub fn duration(&self) -> Seconds {
        self.end - self.start
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> Met {
        Met::new((self.start.value() + self.end.value()) / 2.0)
    }

    pub fn contains(&self, instant: Met) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Overlap of two intervals; touching intervals do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self::new(start, end))
        } else {
            None
        }
    }

    /// Smallest interval covering both.
    pub fn union_hull(&self, other: &Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Endpoints as MJD (with day fraction). `None` if either endpoint is
    /// outside the calendar range.
    pub fn to_mjd(&self) -> Option<(Mjd, Mjd)> {
        Some((self.start.to_mjd(true)?, self.end.to_mjd(true)?))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start_met", &self.start.value())?;
        s.serialize_field("end_met", &self.end.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start_met: f64,
            end_met: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Interval::new(Met::new(raw.start_met), Met::new(raw.end_met)))
    }
}
