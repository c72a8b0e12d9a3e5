// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The validated light-curve record.
//!
//! A [`LightCurve`] is built once by [`normalize`](crate::normalize::normalize)
//! from a single catalog response and never changes afterwards: fields are
//! private to the crate and exposed as slices.
//!
//! Three index spaces coexist:
//!
//! | Index space | Columns |
//! |-------------|---------|
//! | all bins | `met`, `ts`, `fit_tolerance`, `fit_convergence`, `dlogl`, `EG`, `GAL`, `bin_id` |
//! | detections | `met_detections`, `flux`, `flux_error`, `photon_index`, `photon_index_interval` |
//! | upper limits | `met_upperlimits`, `flux_upper_limits` |

use qtty::Seconds;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::interval::Interval;
use crate::met::Met;
use crate::options::{Cadence, FluxType, IndexType};
use crate::payload::FluxBounds;

/// Classification of one bin of the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BinStatus {
    Detection,
    UpperLimit,
    /// Reported by neither the flux nor the upper-limit list.
    Unclassified,
}

/// A light curve of one source at one cadence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LightCurve {
    pub(crate) source: String,
    pub(crate) cadence: Cadence,
    pub(crate) flux_type: FluxType,
    pub(crate) index_type: IndexType,
    pub(crate) ts_min: f64,

    pub(crate) met: Vec<f64>,
    pub(crate) ts: Vec<f64>,
    pub(crate) status: Vec<BinStatus>,

    pub(crate) met_detections: Vec<f64>,
    pub(crate) flux: Vec<f64>,
    pub(crate) flux_error: Vec<FluxBounds>,
    pub(crate) photon_index: Vec<f64>,
    pub(crate) photon_index_interval: Vec<f64>,

    pub(crate) met_upperlimits: Vec<f64>,
    pub(crate) flux_upper_limits: Vec<f64>,

    pub(crate) fit_tolerance: Vec<f64>,
    pub(crate) fit_convergence: Vec<f64>,
    pub(crate) dlogl: Vec<f64>,
    pub(crate) eg: Vec<f64>,
    pub(crate) gal: Vec<f64>,
    pub(crate) bin_id: Vec<f64>,
}

impl LightCurve {
    // ── request echo ──────────────────────────────────────────────────

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn flux_type(&self) -> FluxType {
        self.flux_type
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// TS threshold the service applied when splitting detections from
    /// upper limits.
    pub fn ts_min(&self) -> f64 {
        self.ts_min
    }

    // ── all bins ──────────────────────────────────────────────────────

    /// Bin-center METs, ascending.
    pub fn met(&self) -> &[f64] {
        &self.met
    }

    pub fn ts(&self) -> &[f64] {
        &self.ts
    }

    /// Detection / upper-limit status of each bin of [`met`](Self::met).
    pub fn bin_status(&self) -> &[BinStatus] {
        &self.status
    }

    pub fn fit_tolerance(&self) -> &[f64] {
        &self.fit_tolerance
    }

    pub fn fit_convergence(&self) -> &[f64] {
        &self.fit_convergence
    }

    pub fn dlogl(&self) -> &[f64] {
        &self.dlogl
    }

    /// Extragalactic diffuse normalization per bin.
    pub fn eg(&self) -> &[f64] {
        &self.eg
    }

    /// Galactic diffuse normalization per bin.
    pub fn gal(&self) -> &[f64] {
        &self.gal
    }

    pub fn bin_id(&self) -> &[f64] {
        &self.bin_id
    }

    pub fn len(&self) -> usize {
        self.met.len()
    }

    pub fn is_empty(&self) -> bool {
        self.met.is_empty()
    }

    // ── detections ────────────────────────────────────────────────────

    pub fn met_detections(&self) -> &[f64] {
        &self.met_detections
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Absolute (lower, upper) flux bounds of each detection.
    pub fn flux_error(&self) -> &[FluxBounds] {
        &self.flux_error
    }

    pub fn photon_index(&self) -> &[f64] {
        &self.photon_index
    }

    pub fn photon_index_interval(&self) -> &[f64] {
        &self.photon_index_interval
    }

    // ── upper limits ──────────────────────────────────────────────────

    pub fn met_upperlimits(&self) -> &[f64] {
        &self.met_upperlimits
    }

    pub fn flux_upper_limits(&self) -> &[f64] {
        &self.flux_upper_limits
    }

    // ── derived ───────────────────────────────────────────────────────

    /// Offset from each bin center to its edges, set by the cadence.
    pub fn duration(&self) -> Seconds {
        self.cadence.bin_half_width()
    }

    /// `[met − duration, met + duration)` for every bin.
    pub fn bin_intervals(&self) -> Vec<Interval> {
        let duration = self.duration();
        self.met
            .iter()
            .map(|&m| Interval::centered(Met::new(m), duration))
            .collect()
    }

    /// From the start of the first bin to the end of the last one.
    pub fn time_range(&self) -> Option<Interval> {
        self.bin_intervals()
            .into_iter()
            .reduce(|acc, bin| acc.union_hull(&bin))
    }

    /// Plot-ready error magnitude of each detection: `flux − lower`.
    pub fn flux_error_magnitudes(&self) -> Vec<f64> {
        self.flux
            .iter()
            .zip(&self.flux_error)
            .map(|(flux, bounds)| flux - bounds.lower)
            .collect()
    }

    /// `photon_index − photon_index_interval` for each detection.
    pub fn photon_index_errors(&self) -> Vec<f64> {
        self.photon_index
            .iter()
            .zip(&self.photon_index_interval)
            .map(|(index, interval)| index - interval)
            .collect()
    }

    /// Bin counts by category.
    pub fn summary(&self) -> LightCurveSummary {
        LightCurveSummary {
            source: self.source.clone(),
            cadence: self.cadence,
            flux_type: self.flux_type,
            index_type: self.index_type,
            ts_min: self.ts_min,
            bins: self.met.len(),
            detections: self.flux.len(),
            upper_limits: self.flux_upper_limits.len(),
            non_converged: self.fit_convergence.iter().filter(|&&c| c != 0.0).count(),
        }
    }
}

/// Bin counts of a light curve, printable as a short report.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurveSummary {
    pub source: String,
    pub cadence: Cadence,
    pub flux_type: FluxType,
    pub index_type: IndexType,
    pub ts_min: f64,
    pub bins: usize,
    pub detections: usize,
    pub upper_limits: usize,
    /// Bins whose fit reported a non-zero convergence code.
    pub non_converged: usize,
}

impl LightCurveSummary {
    /// Share of all bins, in percent. `0` for an empty light curve.
    pub fn percent(&self, count: usize) -> f64 {
        if self.bins == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.bins as f64
        }
    }
}

impl fmt::Display for LightCurveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source name: {}", self.source)?;
        writeln!(f, "Cadence: {}", self.cadence)?;
        writeln!(f, "Flux type: {}", self.flux_type)?;
        writeln!(f, "Photon index fit type: {}", self.index_type)?;
        writeln!(f, "Minimum detection TS: {}", self.ts_min)?;
        writeln!(f)?;
        writeln!(f, "Number of bins: {}", self.bins)?;
        writeln!(
            f,
            "Number of detections: {} ({:.2}%)",
            self.detections,
            self.percent(self.detections)
        )?;
        writeln!(
            f,
            "Number of upper limits: {} ({:.2}%)",
            self.upper_limits,
            self.percent(self.upper_limits)
        )?;
        write!(
            f,
            "Number of non-convergant fits: {} ({:.2}%)",
            self.non_converged,
            self.percent(self.non_converged)
        )
    }
}
