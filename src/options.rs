// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Query enumerations: cadence, flux type and spectral index type.
//!
//! Parsing is exact: the wire spelling must match one option character for
//! character. `"dailyX"`, `"Daily"` and `" daily"` are all rejected.

use qtty::Seconds;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LcrError;

/// Binning cadence of a light curve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Cadence {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    pub const ALL: [Cadence; 3] = [Cadence::Daily, Cadence::Weekly, Cadence::Monthly];

    /// Wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }

    /// Offset from a bin center to either bin edge.
    ///
    /// Bins span `[met − duration, met + duration]`.
    pub const fn bin_half_width(self) -> Seconds {
        match self {
            Cadence::Daily => Seconds::new(259_200.0),
            Cadence::Weekly => Seconds::new(604_800.0),
            Cadence::Monthly => Seconds::new(2_592_000.0),
        }
    }
}

impl FromStr for Cadence {
    type Err = LcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LcrError::InvalidCadence {
                value: s.to_string(),
            })
    }
}

/// Flux unit family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FluxType {
    #[default]
    Photon,
    Energy,
}

impl FluxType {
    pub const ALL: [FluxType; 2] = [FluxType::Photon, FluxType::Energy];

    pub const fn as_str(self) -> &'static str {
        match self {
            FluxType::Photon => "photon",
            FluxType::Energy => "energy",
        }
    }

    /// Axis label used by renderers.
    pub const fn label(self) -> &'static str {
        match self {
            FluxType::Photon => "photon Flux",
            FluxType::Energy => "energy Flux",
        }
    }
}

impl FromStr for FluxType {
    type Err = LcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LcrError::InvalidFluxType {
                value: s.to_string(),
            })
    }
}

/// Whether the spectral index was held fixed or fitted per bin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexType {
    #[default]
    Fixed,
    Free,
}

impl IndexType {
    pub const ALL: [IndexType; 2] = [IndexType::Fixed, IndexType::Free];

    pub const fn as_str(self) -> &'static str {
        match self {
            IndexType::Fixed => "fixed",
            IndexType::Free => "free",
        }
    }
}

impl FromStr for IndexType {
    type Err = LcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LcrError::InvalidIndexType {
                value: s.to_string(),
            })
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_as_str!(Cadence, FluxType, IndexType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_spellings_parse() {
        for c in Cadence::ALL {
            assert_eq!(c.as_str().parse::<Cadence>().unwrap(), c);
        }
        for t in FluxType::ALL {
            assert_eq!(t.as_str().parse::<FluxType>().unwrap(), t);
        }
        for t in IndexType::ALL {
            assert_eq!(t.to_string().parse::<IndexType>().unwrap(), t);
        }
    }

    #[test]
    fn near_misses_are_rejected() {
        for bad in ["dailyX", "Daily", "dail", " daily", "", "daily,weekly"] {
            assert!(matches!(
                bad.parse::<Cadence>(),
                Err(LcrError::InvalidCadence { .. })
            ));
        }
        for bad in ["photons", "Photon", "energ"] {
            assert!(matches!(
                bad.parse::<FluxType>(),
                Err(LcrError::InvalidFluxType { .. })
            ));
        }
        for bad in ["freee", "fix", "FIXED"] {
            assert!(matches!(
                bad.parse::<IndexType>(),
                Err(LcrError::InvalidIndexType { .. })
            ));
        }
    }

    #[test]
    fn half_widths() {
        assert_eq!(Cadence::Daily.bin_half_width().value(), 259_200.0);
        assert_eq!(Cadence::Weekly.bin_half_width().value(), 604_800.0);
        assert_eq!(Cadence::Monthly.bin_half_width().value(), 2_592_000.0);
    }

    #[test]
    fn defaults_match_repository_defaults() {
        assert_eq!(Cadence::default(), Cadence::Daily);
        assert_eq!(FluxType::default(), FluxType::Photon);
        assert_eq!(IndexType::default(), IndexType::Fixed);
    }
}
