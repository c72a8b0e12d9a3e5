// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Request validation against the source registry and the query options.
//!
//! Every check here is a pure, exact membership test and runs before any
//! network activity. [`LightCurveRequest`] can only be built through these
//! checks, so a request value is always valid.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LcrError, Result};
use crate::options::{Cadence, FluxType, IndexType};

/// TS threshold used by the repository when none is requested.
pub const DEFAULT_TS_MIN: f64 = 4.0;

// ═══════════════════════════════════════════════════════════════════════════
// Source registry
// ═══════════════════════════════════════════════════════════════════════════

/// The set of catalog identifiers the repository tracks.
///
/// Maintained outside this crate; implementations only answer exact
/// membership queries.
pub trait SourceRegistry {
    fn contains(&self, name: &str) -> bool;
}

impl SourceRegistry for HashSet<String> {
    fn contains(&self, name: &str) -> bool {
        HashSet::contains(self, name)
    }
}

impl SourceRegistry for BTreeSet<String> {
    fn contains(&self, name: &str) -> bool {
        BTreeSet::contains(self, name)
    }
}

impl SourceRegistry for [&str] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|s| *s == name)
    }
}

impl<R: SourceRegistry + ?Sized> SourceRegistry for &R {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}

/// Set-backed registry, typically loaded from a list of 4FGL names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceCatalog {
    names: HashSet<String>,
}

impl SourceCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// One name per line; blank lines and `#` comments are skipped and
    /// surrounding whitespace is trimmed.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Read a newline-separated catalog file.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_lines(&text);
        tracing::debug!(
            path = %path.as_ref().display(),
            sources = catalog.len(),
            "loaded source catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SourceRegistry for SourceCatalog {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Validators
// ═══════════════════════════════════════════════════════════════════════════

/// Fails with [`LcrError::UnknownSource`] unless `name` is in `registry`.
pub fn validate_source<R: SourceRegistry + ?Sized>(name: &str, registry: &R) -> Result<()> {
    if registry.contains(name) {
        Ok(())
    } else {
        Err(LcrError::UnknownSource {
            name: name.to_string(),
        })
    }
}

/// Exactly one of `daily`, `weekly`, `monthly`.
pub fn validate_cadence(value: &str) -> Result<Cadence> {
    value.parse()
}

/// Exactly one of `photon`, `energy`.
pub fn validate_flux_type(value: &str) -> Result<FluxType> {
    value.parse()
}

/// Exactly one of `fixed`, `free`.
pub fn validate_index_type(value: &str) -> Result<IndexType> {
    value.parse()
}

// ═══════════════════════════════════════════════════════════════════════════
// LightCurveRequest
// ═══════════════════════════════════════════════════════════════════════════

/// A validated light-curve query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightCurveRequest {
    source: String,
    cadence: Cadence,
    flux_type: FluxType,
    index_type: IndexType,
    ts_min: f64,
}

impl LightCurveRequest {
    /// Validate raw option strings, short-circuiting on the first failure
    /// in the order source, cadence, flux type, index type.
    ///
    /// ```rust
    /// use fermi_lcr::{LightCurveRequest, LcrError};
    ///
    /// let registry = ["4FGL J2253.9+1609"];
    /// let req = LightCurveRequest::new("4FGL J2253.9+1609", "weekly", "photon", "free", 4.0, &registry[..]);
    /// assert!(req.is_ok());
    ///
    /// let err = LightCurveRequest::new("4FGL J2253.9+1609", "dailyX", "photon", "free", 4.0, &registry[..]);
    /// assert!(matches!(err, Err(LcrError::InvalidCadence { .. })));
    /// ```
    pub fn new<R: SourceRegistry + ?Sized>(
        source: &str,
        cadence: &str,
        flux_type: &str,
        index_type: &str,
        ts_min: f64,
        registry: &R,
    ) -> Result<Self> {
        validate_source(source, registry)?;
        let cadence = validate_cadence(cadence)?;
        let flux_type = validate_flux_type(flux_type)?;
        let index_type = validate_index_type(index_type)?;
        Ok(Self {
            source: source.to_string(),
            cadence,
            flux_type,
            index_type,
            ts_min,
        })
    }

    /// Build from already typed options; only the source needs checking.
    pub fn with_options<R: SourceRegistry + ?Sized>(
        source: &str,
        cadence: Cadence,
        flux_type: FluxType,
        index_type: IndexType,
        ts_min: f64,
        registry: &R,
    ) -> Result<Self> {
        validate_source(source, registry)?;
        Ok(Self {
            source: source.to_string(),
            cadence,
            flux_type,
            index_type,
            ts_min,
        })
    }

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

    pub fn ts_min(&self) -> f64 {
        self.ts_min
    }

    /// Query parameters in the order the catalog service documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("source_name", self.source.clone()),
            ("cadence", self.cadence.to_string()),
            ("flux_type", self.flux_type.to_string()),
            ("index_type", self.index_type.to_string()),
            ("ts_min", self.ts_min.to_string()),
        ]
    }

    /// File name under which a downloaded payload is conventionally cached:
    /// `<quoted source>_<cadence>_<flux>_<index>_tsmin<ts_min>.json`.
    pub fn cache_file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_tsmin{}.json",
            quote(&self.source),
            self.cadence,
            self.flux_type,
            self.index_type,
            self.ts_min
        )
    }
}

/// Percent-encode everything except ASCII alphanumerics and `_.-~/`.
fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
