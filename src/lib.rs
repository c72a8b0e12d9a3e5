// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fermi-LAT Light Curve Repository client
//!
//! Retrieves light curves of gamma-ray sources from the Fermi LAT Light
//! Curve Repository, validates the response and exposes it as a typed,
//! immutable [`LightCurve`]. Times are handled in the mission's own time
//! system.
//!
//! # Pipeline
//!
//! | Stage | Entry point | Failure kinds |
//! |-------|-------------|---------------|
//! | validation | [`LightCurveRequest::new`] | [`UnknownSource`](LcrError::UnknownSource), [`InvalidCadence`](LcrError::InvalidCadence), [`InvalidFluxType`](LcrError::InvalidFluxType), [`InvalidIndexType`](LcrError::InvalidIndexType) |
//! | fetch | [`Fetch::fetch`] | [`Transport`](LcrError::Transport), [`HttpStatus`](LcrError::HttpStatus), [`Decode`](LcrError::Decode) |
//! | normalization | [`normalize()`] | [`ShapeMismatch`](LcrError::ShapeMismatch) |
//!
//! [`LightCurveClient`] runs the three stages in order.
//!
//! # Time system
//!
//! - [`Met`] — Mission Elapsed Time, seconds since 2001-01-01T00:00:00 UTC,
//!   counting the leap seconds inserted since.
//! - [`CalendarDate`] — UTC date of a MET ([`met_to_date`]).
//! - [`Mjd`] — Modified Julian Date of a MET ([`met_to_mjd`]).
//!
//! The five leap seconds inserted during the mission (end of 2005, 2008,
//! June 2012, June 2015 and 2016) are tabulated in [`leap_seconds`].
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod calendar;
pub mod catalog;
mod client;
pub mod config;
mod error;
pub mod fetch;
mod interval;
pub mod leap_seconds;
mod light_curve;
mod met;
pub mod mjd;
pub mod normalize;
mod options;
pub mod payload;
pub mod render;

#[cfg(test)]
mod test_support;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{current_met, met_from_utc, met_to_date, CalendarDate};
pub use catalog::{LightCurveRequest, SourceCatalog, SourceRegistry, DEFAULT_TS_MIN};
pub use client::LightCurveClient;
pub use config::{ClientConfig, RetryPolicy};
pub use error::{LcrError, Result};
pub use fetch::{Fetch, HttpFetcher, RetryingFetcher};
pub use interval::Interval;
pub use light_curve::{BinStatus, LightCurve, LightCurveSummary};
pub use met::Met;
pub use mjd::{met_to_mjd, Mjd};
pub use normalize::normalize;
pub use options::{Cadence, FluxType, IndexType};
pub use payload::{FluxBounds, RawPayload, Sample};
pub use render::{AxisData, RenderOptions, Renderer, TimeAxis};
