// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fetch one light curve and print its summary.
//!
//! ```text
//! cargo run --example fetch_light_curve -- "4FGL J0534.5+2200" [cadence] [flux_type] [index_type] [ts_min]
//! ```
//!
//! Sources are checked against the newline-separated list in `LCR_CATALOG`
//! when set; otherwise the requested source is trusted as is.
//! `LCR_BASE_URL` and `LCR_TIMEOUT_SECS` configure the HTTP client and
//! `RUST_LOG` the log level.

use std::env;
use std::error::Error;
use std::time::Duration;

use fermi_lcr::{
    ClientConfig, LightCurveClient, RenderOptions, RetryPolicy, SourceCatalog, DEFAULT_TS_MIN,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(source) = args.first() else {
        eprintln!("usage: fetch_light_curve <source> [cadence] [flux_type] [index_type] [ts_min]");
        std::process::exit(2);
    };
    let cadence = args.get(1).map_or("daily", String::as_str);
    let flux_type = args.get(2).map_or("photon", String::as_str);
    let index_type = args.get(3).map_or("fixed", String::as_str);
    let ts_min = match args.get(4) {
        Some(raw) => raw.parse()?,
        None => DEFAULT_TS_MIN,
    };

    let registry = match env::var("LCR_CATALOG") {
        Ok(path) => SourceCatalog::load(path)?,
        Err(_) => SourceCatalog::new([source.as_str()]),
    };

    let config =
        ClientConfig::from_env()?.with_retry(RetryPolicy::attempts(3, Duration::from_secs(2)));
    let client = LightCurveClient::http(&config, registry)?;

    let lc = client.get_light_curve(source, cadence, flux_type, index_type, ts_min)?;
    println!("{}", lc.summary());

    if let Some(range) = lc.time_range() {
        if let Some((start, end)) = range.to_mjd() {
            println!("Coverage: MJD {:.3} to {:.3}", start.value(), end.value());
        }
    }
    println!(
        "Plot file name: {}",
        RenderOptions::default().export_file_name(&lc)
    );
    Ok(())
}
