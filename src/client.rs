// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! One-call retrieval: validate, fetch, normalize.

use crate::catalog::{LightCurveRequest, SourceRegistry};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::fetch::{Fetch, HttpFetcher, RetryingFetcher};
use crate::light_curve::LightCurve;
use crate::normalize::normalize;
use crate::options::{Cadence, FluxType, IndexType};
use crate::payload::RawPayload;

/// Retrieves light curves for sources known to `R` through fetcher `F`.
///
/// ```no_run
/// use fermi_lcr::{ClientConfig, LightCurveClient, SourceCatalog};
///
/// let registry = SourceCatalog::load("4fgl_dr3_names.txt")?;
/// let client = LightCurveClient::http(&ClientConfig::from_env()?, registry)?;
/// let lc = client.get_light_curve("4FGL J0534.5+2200", "daily", "photon", "fixed", 4.0)?;
/// println!("{}", lc.summary());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LightCurveClient<F, R> {
    fetcher: F,
    registry: R,
}

impl<F: Fetch, R: SourceRegistry> LightCurveClient<F, R> {
    pub fn new(fetcher: F, registry: R) -> Self {
        Self { fetcher, registry }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Validate the options, fetch the payload and normalize it.
    ///
    /// Validation failures return before any request is made.
    pub fn get_light_curve(
        &self,
        source: &str,
        cadence: &str,
        flux_type: &str,
        index_type: &str,
        ts_min: f64,
    ) -> Result<LightCurve> {
        let request =
            LightCurveRequest::new(source, cadence, flux_type, index_type, ts_min, &self.registry)?;
        self.fetch_request(&request)
    }

    /// Same as [`get_light_curve`](Self::get_light_curve) with typed options.
    pub fn get_light_curve_with(
        &self,
        source: &str,
        cadence: Cadence,
        flux_type: FluxType,
        index_type: IndexType,
        ts_min: f64,
    ) -> Result<LightCurve> {
        let request = LightCurveRequest::with_options(
            source,
            cadence,
            flux_type,
            index_type,
            ts_min,
            &self.registry,
        )?;
        self.fetch_request(&request)
    }

    /// Fetch and normalize an already validated request.
    pub fn fetch_request(&self, request: &LightCurveRequest) -> Result<LightCurve> {
        let payload = self.fetch_raw(request)?;
        let curve = normalize(request, &payload)?;
        tracing::info!(
            source = curve.source(),
            cadence = %curve.cadence(),
            bins = curve.len(),
            detections = curve.flux().len(),
            "retrieved light curve"
        );
        Ok(curve)
    }

    /// Payload as received, before normalization.
    pub fn fetch_raw(&self, request: &LightCurveRequest) -> Result<RawPayload> {
        tracing::debug!(
            source = request.source(),
            cadence = %request.cadence(),
            flux_type = %request.flux_type(),
            index_type = %request.index_type(),
            ts_min = request.ts_min(),
            "fetching light curve"
        );
        self.fetcher.fetch(request)
    }
}

impl<R: SourceRegistry> LightCurveClient<RetryingFetcher<HttpFetcher>, R> {
    /// HTTP client built from `config`, retrying as `config.retry` says.
    pub fn http(config: &ClientConfig, registry: R) -> Result<Self> {
        Ok(Self::new(RetryingFetcher::http(config)?, registry))
    }
}
