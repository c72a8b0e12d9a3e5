// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Shared fixtures for unit tests.

use serde_json::{json, Value};

use crate::catalog::{LightCurveRequest, SourceCatalog};
use crate::light_curve::LightCurve;
use crate::normalize::normalize;
use crate::payload::RawPayload;

pub(crate) const CRAB: &str = "4FGL J0534.5+2200";

/// Four daily bins starting one day after the epoch; bin 1 is an upper limit.
pub(crate) fn sample_payload() -> Value {
    json!({
        "ts": [[86400.0, 52.0], [604800.0, 2.5], [1123200.0, 30.0], [1641600.0, 18.0]],
        "flux": [[86400.0, 2.0e-7], [1123200.0, 3.0e-7], [1641600.0, 4.0e-7]],
        "flux_upper_limits": [[604800.0, 1.2e-7]],
        "flux_error": [
            [86400.0, 1.6e-7, 2.4e-7],
            [1123200.0, 2.5e-7, 3.5e-7],
            [1641600.0, 3.1e-7, 4.9e-7]
        ],
        "photon_index": [[86400.0, 2.1], [1123200.0, 2.2], [1641600.0, 2.4]],
        "photon_index_interval": [[86400.0, 1.9], [1123200.0, 2.0], [1641600.0, 2.1]],
        "fit_tolerance": [[86400.0, 1e-3], [604800.0, 1e-3], [1123200.0, 1e-3], [1641600.0, 1e-3]],
        "fit_convergence": [[86400.0, 0], [604800.0, 0], [1123200.0, 0], [1641600.0, 156]],
        "dlogl": [0.0, 0.0, 0.0, 0.0],
        "EG": [1.0, 1.0, 1.0, 1.0],
        "GAL": [1.0, 1.0, 1.0, 1.0],
        "bin_id": [1, 2, 3, 4]
    })
}

pub(crate) fn sample_curve() -> LightCurve {
    let registry = SourceCatalog::new([CRAB]);
    let request = LightCurveRequest::new(CRAB, "daily", "photon", "fixed", 4.0, &registry).unwrap();
    normalize(&request, &RawPayload::from_value(sample_payload()).unwrap()).unwrap()
}
