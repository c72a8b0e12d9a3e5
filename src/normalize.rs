// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Raw payload → [`LightCurve`].
//!
//! # Classification
//!
//! A bin is a detection when its MET appears among the timestamps of the
//! `flux` array and an upper limit when it appears among those of
//! `flux_upper_limits`. The TS column is never compared with `ts_min`
//! here: the service already made that decision and the two lists are its
//! answer. METs are compared bit for bit; they come from the same upstream
//! table and are never rounded independently.
//!
//! # Alignment
//!
//! | Column | Aligned to | Matched by |
//! |--------|------------|------------|
//! | `fit_tolerance`, `fit_convergence` | `ts` grid | MET |
//! | `dlogl`, `EG`, `GAL`, `bin_id` | `ts` grid | position |
//! | `flux_error`, `photon_index`, `photon_index_interval` | `flux` | MET |
//!
//! Any disagreement in length, MET or order is a
//! [`ShapeMismatch`](crate::LcrError::ShapeMismatch); columns are never
//! truncated or padded.

use std::collections::HashSet;

use crate::catalog::LightCurveRequest;
use crate::error::{LcrError, Result};
use crate::light_curve::{BinStatus, LightCurve};
use crate::payload::{field, RawPayload, Sample};

/// Build a [`LightCurve`] from a payload fetched for `request`.
pub fn normalize(request: &LightCurveRequest, payload: &RawPayload) -> Result<LightCurve> {
    let (met, ts) = split(payload.samples(field::TS)?);
    check_strictly_increasing(field::TS, &met)?;

    let (met_detections, flux) = split(payload.samples(field::FLUX)?);
    let (met_upperlimits, flux_upper_limits) = split(payload.samples(field::FLUX_UPPER_LIMITS)?);

    let flux_error_samples = payload.flux_error_samples()?;
    check_aligned(
        field::FLUX_ERROR,
        flux_error_samples.iter().map(|s| s.met),
        field::FLUX,
        &met_detections,
    )?;
    let flux_error = flux_error_samples.into_iter().map(|s| s.bounds).collect();

    let photon_index = aligned_values(payload, field::PHOTON_INDEX, field::FLUX, &met_detections)?;
    let photon_index_interval = aligned_values(
        payload,
        field::PHOTON_INDEX_INTERVAL,
        field::FLUX,
        &met_detections,
    )?;
    let fit_tolerance = aligned_values(payload, field::FIT_TOLERANCE, field::TS, &met)?;
    let fit_convergence = aligned_values(payload, field::FIT_CONVERGENCE, field::TS, &met)?;

    let dlogl = positional(payload, field::DLOGL, met.len())?;
    let eg = positional(payload, field::EG, met.len())?;
    let gal = positional(payload, field::GAL, met.len())?;
    let bin_id = positional(payload, field::BIN_ID, met.len())?;

    let status = classify(&met, &met_detections, &met_upperlimits)?;

    tracing::debug!(
        source = request.source(),
        bins = met.len(),
        detections = met_detections.len(),
        upper_limits = met_upperlimits.len(),
        "normalized light curve"
    );

    Ok(LightCurve {
        source: request.source().to_string(),
        cadence: request.cadence(),
        flux_type: request.flux_type(),
        index_type: request.index_type(),
        ts_min: request.ts_min(),
        met,
        ts,
        status,
        met_detections,
        flux,
        flux_error,
        photon_index,
        photon_index_interval,
        met_upperlimits,
        flux_upper_limits,
        fit_tolerance,
        fit_convergence,
        dlogl,
        eg,
        gal,
        bin_id,
    })
}

/// Per-bin status of `grid` by membership in the two derived lists.
///
/// Both lists must be subsequences of the grid (same relative order) and
/// disjoint.
pub fn classify(grid: &[f64], detections: &[f64], upper_limits: &[f64]) -> Result<Vec<BinStatus>> {
    let on_grid: HashSet<u64> = grid.iter().copied().map(met_key).collect();
    let detected = membership(field::FLUX, detections, &on_grid)?;
    let limited = membership(field::FLUX_UPPER_LIMITS, upper_limits, &on_grid)?;

    if let Some(&both) = detections.iter().find(|&&m| limited.contains(&met_key(m))) {
        return Err(LcrError::shape(
            field::FLUX_UPPER_LIMITS,
            format!("MET {both} is listed both as a detection and as an upper limit"),
        ));
    }

    let status: Vec<BinStatus> = grid
        .iter()
        .map(|&m| {
            let key = met_key(m);
            if detected.contains(&key) {
                BinStatus::Detection
            } else if limited.contains(&key) {
                BinStatus::UpperLimit
            } else {
                BinStatus::Unclassified
            }
        })
        .collect();

    check_subsequence(field::FLUX, grid, &status, BinStatus::Detection, detections)?;
    check_subsequence(
        field::FLUX_UPPER_LIMITS,
        grid,
        &status,
        BinStatus::UpperLimit,
        upper_limits,
    )?;
    Ok(status)
}

fn split(samples: Vec<Sample>) -> (Vec<f64>, Vec<f64>) {
    samples.into_iter().map(|s| (s.met, s.value)).unzip()
}

/// Exact-equality key; `0.0` and `-0.0` collapse to one bin.
fn met_key(met: f64) -> u64 {
    if met == 0.0 {
        0
    } else {
        met.to_bits()
    }
}

fn membership(name: &str, mets: &[f64], on_grid: &HashSet<u64>) -> Result<HashSet<u64>> {
    let mut set = HashSet::with_capacity(mets.len());
    for &m in mets {
        let key = met_key(m);
        if !on_grid.contains(&key) {
            return Err(LcrError::shape(
                name,
                format!("MET {m} is not a bin of the ts grid"),
            ));
        }
        if !set.insert(key) {
            return Err(LcrError::shape(name, format!("MET {m} is listed twice")));
        }
    }
    Ok(set)
}

fn check_subsequence(
    name: &str,
    grid: &[f64],
    status: &[BinStatus],
    wanted: BinStatus,
    listed: &[f64],
) -> Result<()> {
    let derived = grid
        .iter()
        .zip(status)
        .filter(|(_, s)| **s == wanted)
        .map(|(&m, _)| m);
    if derived.eq(listed.iter().copied()) {
        Ok(())
    } else {
        Err(LcrError::shape(name, "entries are not in ts grid order"))
    }
}

fn check_strictly_increasing(name: &str, mets: &[f64]) -> Result<()> {
    match mets.windows(2).position(|w| w[0] >= w[1]) {
        None => Ok(()),
        Some(i) => Err(LcrError::shape(
            name,
            format!(
                "bin METs must be strictly increasing; entry {} ({}) follows {}",
                i + 1,
                mets[i + 1],
                mets[i]
            ),
        )),
    }
}

fn check_aligned(
    name: &str,
    mets: impl ExactSizeIterator<Item = f64>,
    reference_name: &str,
    reference: &[f64],
) -> Result<()> {
    if mets.len() != reference.len() {
        return Err(LcrError::shape(
            name,
            format!(
                "{} entries, but '{}' has {}",
                mets.len(),
                reference_name,
                reference.len()
            ),
        ));
    }
    for (i, (m, r)) in mets.zip(reference).enumerate() {
        if met_key(m) != met_key(*r) {
            return Err(LcrError::shape(
                name,
                format!("entry {i} has MET {m}, but '{reference_name}' has {r}"),
            ));
        }
    }
    Ok(())
}

fn aligned_values(
    payload: &RawPayload,
    name: &str,
    reference_name: &str,
    reference: &[f64],
) -> Result<Vec<f64>> {
    let samples = payload.samples(name)?;
    check_aligned(name, samples.iter().map(|s| s.met), reference_name, reference)?;
    Ok(samples.into_iter().map(|s| s.value).collect())
}

fn positional(payload: &RawPayload, name: &str, bins: usize) -> Result<Vec<f64>> {
    let values = payload.scalars(name)?;
    if values.len() != bins {
        return Err(LcrError::shape(
            name,
            format!("{} entries, but 'ts' has {bins}", values.len()),
        ));
    }
    Ok(values)
}
