// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Raw catalog payload and its per-bin samples.
//!
//! The service answers with a JSON object of parallel arrays. Most entries
//! are `[met, value]` pairs; `flux_error` entries are `[met, lower, upper]`;
//! `dlogl`, `EG`, `GAL` and `bin_id` are bare value arrays. Accessors here
//! turn each entry into a named struct and fail with
//! [`LcrError::ShapeMismatch`] on anything else, never guessing.

use serde_json::{Map, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LcrError, Result};

/// Payload keys.
pub mod field {
    pub const TS: &str = "ts";
    pub const FLUX: &str = "flux";
    pub const FLUX_UPPER_LIMITS: &str = "flux_upper_limits";
    pub const FLUX_ERROR: &str = "flux_error";
    pub const PHOTON_INDEX: &str = "photon_index";
    pub const PHOTON_INDEX_INTERVAL: &str = "photon_index_interval";
    pub const FIT_TOLERANCE: &str = "fit_tolerance";
    pub const FIT_CONVERGENCE: &str = "fit_convergence";
    pub const DLOGL: &str = "dlogl";
    pub const EG: &str = "EG";
    pub const GAL: &str = "GAL";
    pub const BIN_ID: &str = "bin_id";

    /// Keys whose entries are `[met, value]` pairs.
    pub const PAIRED: [&str; 7] = [
        TS,
        FLUX,
        FLUX_UPPER_LIMITS,
        PHOTON_INDEX,
        PHOTON_INDEX_INTERVAL,
        FIT_TOLERANCE,
        FIT_CONVERGENCE,
    ];

    /// Keys whose entries are bare values aligned to the `ts` grid.
    pub const BARE: [&str; 4] = [DLOGL, EG, GAL, BIN_ID];
}

/// One `[met, value]` entry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    pub met: f64,
    pub value: f64,
}

/// Lower and upper flux bound of a detection.
///
/// Both are absolute flux values, not offsets from the measured flux.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FluxBounds {
    pub lower: f64,
    pub upper: f64,
}

/// One `[met, lower, upper]` entry of `flux_error`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FluxErrorSample {
    pub met: f64,
    pub bounds: FluxBounds,
}

/// The decoded JSON body of a catalog response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    fields: Map<String, Value>,
}

impl RawPayload {
    /// Wrap a decoded JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(LcrError::shape(
                "<root>",
                format!("expected a JSON object, found {}", kind(&other)),
            )),
        }
    }

    /// Decode a JSON document.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| LcrError::Decode {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Number of entries in `ts`, `0` if the key is missing or not an array.
    pub fn ts_len(&self) -> usize {
        self.fields
            .get(field::TS)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Whether the payload carries at least one analyzed bin.
    pub fn has_bins(&self) -> bool {
        self.ts_len() > 0
    }

    /// `[met, value]` entries of `name`.
    pub fn samples(&self, name: &str) -> Result<Vec<Sample>> {
        self.array(name)?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let [met, value] = numbers::<2>(name, i, entry)?;
                Ok(Sample { met, value })
            })
            .collect()
    }

    /// `[met, lower, upper]` entries of `flux_error`.
    pub fn flux_error_samples(&self) -> Result<Vec<FluxErrorSample>> {
        let name = field::FLUX_ERROR;
        self.array(name)?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let [met, lower, upper] = numbers::<3>(name, i, entry)?;
                Ok(FluxErrorSample {
                    met,
                    bounds: FluxBounds { lower, upper },
                })
            })
            .collect()
    }

    /// Bare numeric entries of `name`.
    pub fn scalars(&self, name: &str) -> Result<Vec<f64>> {
        self.array(name)?
            .iter()
            .enumerate()
            .map(|(i, entry)| number(name, i, entry))
            .collect()
    }

    fn array(&self, name: &str) -> Result<&Vec<Value>> {
        let value = self
            .fields
            .get(name)
            .ok_or_else(|| LcrError::shape(name, "missing from payload"))?;
        value.as_array().ok_or_else(|| {
            LcrError::shape(name, format!("expected an array, found {}", kind(value)))
        })
    }
}

fn numbers<const N: usize>(name: &str, index: usize, entry: &Value) -> Result<[f64; N]> {
    let items = entry.as_array().ok_or_else(|| {
        LcrError::shape(
            name,
            format!("entry {index}: expected a {N}-element array, found {}", kind(entry)),
        )
    })?;
    if items.len() != N {
        return Err(LcrError::shape(
            name,
            format!("entry {index}: expected {N} elements, found {}", items.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = number(name, index, item)?;
    }
    Ok(out)
}

fn number(name: &str, index: usize, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        LcrError::shape(
            name,
            format!("entry {index}: expected a number, found {}", kind(value)),
        )
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
