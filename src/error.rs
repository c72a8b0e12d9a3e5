// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every stage of a light-curve retrieval.
//!
//! Validation errors are raised before any network activity; transport and
//! status errors come from the fetch stage; [`LcrError::ShapeMismatch`] is
//! raised by normalization when the payload violates its own contract.
//! None of them leave a partially built [`LightCurve`](crate::LightCurve)
//! behind.

use thiserror::Error;

/// Errors produced while validating, fetching or normalizing a light curve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LcrError {
    #[error("'{name}' is not a source tracked by the Light Curve Repository")]
    UnknownSource { name: String },

    #[error("unrecognized cadence '{value}' (expected 'daily', 'weekly' or 'monthly')")]
    InvalidCadence { value: String },

    #[error("unrecognized flux type '{value}' (expected 'photon' or 'energy')")]
    InvalidFluxType { value: String },

    #[error("unrecognized spectral index type '{value}' (expected 'fixed' or 'free')")]
    InvalidIndexType { value: String },

    /// Name resolution or connection failure; no HTTP status was received.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// Non-2xx status, or a 2xx response whose `ts` array is empty.
    #[error("catalog service returned HTTP status {code}")]
    HttpStatus { code: u16 },

    /// A 2xx response whose body is not valid JSON.
    #[error("could not decode catalog response: {reason}")]
    Decode { reason: String },

    #[error("malformed payload field '{field}': {reason}")]
    ShapeMismatch { field: String, reason: String },

    #[error("invalid client configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl LcrError {
    pub(crate) fn shape(field: &str, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// `true` for errors raised by local validation, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownSource { .. }
                | Self::InvalidCadence { .. }
                | Self::InvalidFluxType { .. }
                | Self::InvalidIndexType { .. }
        )
    }

    /// `true` for failures worth another attempt: transport errors only.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LcrError>;
