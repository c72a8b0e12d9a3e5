// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Hand-off to plotting backends.
//!
//! No backend ships with this crate. [`Renderer`] is the seam, and
//! [`LightCurve::axis_data`] performs the time-axis work every backend
//! needs: MET or MJD bin positions, horizontal error bars, the default
//! x- and y-ranges, and the trigger marker.

use std::path::PathBuf;

use crate::error::{LcrError, Result};
use crate::light_curve::LightCurve;
use crate::met::Met;
use crate::mjd::seconds_to_days;
use qtty::Seconds;

/// Unit of the horizontal axis.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimeAxis {
    /// Mission elapsed time in seconds, optionally relative to a reference.
    #[default]
    Met,
    /// Modified Julian Date with day fraction.
    Mjd,
}

impl TimeAxis {
    pub const fn label(self) -> &'static str {
        match self {
            TimeAxis::Met => "Time (sec)",
            TimeAxis::Mjd => "Time (MJD)",
        }
    }
}

/// Options handed to a [`Renderer`] together with the light curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub time_axis: TimeAxis,
    /// MET subtracted from every position on a [`TimeAxis::Met`] axis.
    pub reference: Option<Met>,
    /// Instant marked with a vertical line.
    pub trigger: Option<Met>,
    pub x_log: bool,
    pub y_log: bool,
    /// Explicit x-range, in axis units.
    pub x_range: Option<(f64, f64)>,
    /// Explicit y-range of the flux panel.
    pub y_range: Option<(f64, f64)>,
    /// Add a TS panel below the flux panel.
    pub plot_ts: bool,
    /// Add a photon-index panel.
    pub plot_index: bool,
    /// Directory to export into; `None` disables export.
    pub export_dir: Option<PathBuf>,
    pub extension: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            time_axis: TimeAxis::Met,
            reference: None,
            trigger: None,
            x_log: false,
            y_log: false,
            x_range: None,
            y_range: None,
            plot_ts: false,
            plot_index: false,
            export_dir: None,
            extension: ".png".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_time_axis(mut self, axis: TimeAxis) -> Self {
        self.time_axis = axis;
        self
    }

    pub fn with_reference(mut self, reference: Met) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_trigger(mut self, trigger: Met) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// `photon_flux_<source>_<cadence><extension>`, spaces in the source
    /// name replaced by underscores.
    pub fn export_file_name(&self, curve: &LightCurve) -> String {
        format!(
            "photon_flux_{}_{}{}",
            curve.source().replace(' ', "_"),
            curve.cadence(),
            self.extension
        )
    }

    /// Full export path, `None` when export is disabled.
    pub fn export_path(&self, curve: &LightCurve) -> Option<PathBuf> {
        self.export_dir
            .as_ref()
            .map(|dir| dir.join(self.export_file_name(curve)))
    }
}

/// Positions and ranges of a light curve on the chosen time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisData {
    pub axis: TimeAxis,
    /// Every bin, aligned to [`LightCurve::met`].
    pub bins: Vec<f64>,
    pub detections: Vec<f64>,
    pub upper_limits: Vec<f64>,
    /// Horizontal error-bar half-length, in axis units.
    pub x_error: f64,
    /// `None` for an empty light curve without an explicit range.
    pub x_range: Option<(f64, f64)>,
    /// `None` when there are no detections and no explicit range.
    pub y_range: Option<(f64, f64)>,
    pub trigger: Option<f64>,
}

impl LightCurve {
    /// Axis data with the x-range ending now.
    pub fn axis_data(&self, options: &RenderOptions) -> Result<AxisData> {
        self.axis_data_at(options, Met::now())
    }

    /// Axis data with the x-range ending at `now`.
    ///
    /// The default x-range runs from the start of the first bin to `now`.
    /// The default y-range is `[0, 10·median]` of the detected fluxes, or
    /// `[median/100, 100·median]` on a log axis.
    pub fn axis_data_at(&self, options: &RenderOptions, now: Met) -> Result<AxisData> {
        let axis = options.time_axis;
        let project = |met: Met| -> Result<f64> {
            match axis {
                TimeAxis::Met => {
                    Ok(met.value() - options.reference.map_or(0.0, |r| r.value()))
                }
                TimeAxis::Mjd => met.to_mjd(true).map(|mjd| mjd.value()).ok_or_else(|| {
                    LcrError::shape("met", format!("{met} is outside the calendar range"))
                }),
            }
        };
        let project_all = |mets: &[f64]| -> Result<Vec<f64>> {
            mets.iter().map(|&m| project(Met::new(m))).collect()
        };

        let half = Seconds::new(self.duration().value() / 2.0);
        let x_error = match axis {
            TimeAxis::Met => half.value(),
            TimeAxis::Mjd => seconds_to_days(half).value(),
        };

        let x_range = match options.x_range {
            Some(range) => Some(range),
            None => match self.time_range() {
                Some(range) => Some((project(range.start)?, project(now)?)),
                None => None,
            },
        };

        Ok(AxisData {
            axis,
            bins: project_all(self.met())?,
            detections: project_all(self.met_detections())?,
            upper_limits: project_all(self.met_upperlimits())?,
            x_error,
            x_range,
            y_range: options.y_range.or_else(|| self.default_flux_range(options.y_log)),
            trigger: options.trigger.map(project).transpose()?,
        })
    }

    fn default_flux_range(&self, log: bool) -> Option<(f64, f64)> {
        let median = median(self.flux())?;
        Some(if log {
            (median / 100.0, median * 100.0)
        } else {
            (0.0, median * 10.0)
        })
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// A plotting backend.
pub trait Renderer {
    type Output;
    type Error: std::error::Error;

    fn render(
        &self,
        curve: &LightCurve,
        options: &RenderOptions,
    ) -> std::result::Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_curve;
    use std::cell::RefCell;

    const NOW: Met = Met::new(800_000_000.0);

    #[test]
    fn met_axis() {
        let lc = sample_curve();
        let axis = lc.axis_data_at(&RenderOptions::default(), NOW).unwrap();
        assert_eq!(axis.bins, lc.met());
        assert_eq!(axis.detections, lc.met_detections());
        assert_eq!(axis.x_error, 129_600.0);
        assert_eq!(axis.x_range, Some((lc.met()[0] - 259_200.0, NOW.value())));
        assert_eq!(axis.trigger, None);
    }

    #[test]
    fn reference_shifts_everything() {
        let lc = sample_curve();
        let reference = Met::new(lc.met()[0]);
        let options = RenderOptions::default()
            .with_reference(reference)
            .with_trigger(Met::new(lc.met()[1]));
        let axis = lc.axis_data_at(&options, NOW).unwrap();
        assert_eq!(axis.bins[0], 0.0);
        assert_eq!(axis.upper_limits[0], lc.met_upperlimits()[0] - reference.value());
        assert_eq!(axis.trigger, Some(lc.met()[1] - reference.value()));
        assert_eq!(axis.x_range.unwrap().0, -259_200.0);
    }

    #[test]
    fn mjd_axis() {
        let lc = sample_curve();
        let options = RenderOptions::default().with_time_axis(TimeAxis::Mjd);
        let axis = lc.axis_data_at(&options, NOW).unwrap();
        assert!((axis.x_error - 1.5).abs() < 1e-12);
        // Bin at MET 86400 is 2001-01-02, MJD 51911.
        assert_eq!(axis.bins[0], 51_911.0);
        assert!(axis.bins.windows(2).all(|w| w[0] < w[1]));
        let (x_min, x_max) = axis.x_range.unwrap();
        assert_eq!(x_min, 51_908.0);
        assert!(x_max > 60_000.0);
    }

    #[test]
    fn default_flux_ranges() {
        let lc = sample_curve();
        let linear = lc.axis_data_at(&RenderOptions::default(), NOW).unwrap();
        let (lo, hi) = linear.y_range.unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 3.0e-6).abs() < 1e-18);

        let options = RenderOptions {
            y_log: true,
            ..RenderOptions::default()
        };
        let (lo, hi) = lc.axis_data_at(&options, NOW).unwrap().y_range.unwrap();
        assert!((lo - 3.0e-9).abs() < 1e-20);
        assert!((hi - 3.0e-5).abs() < 1e-16);
    }

    #[test]
    fn explicit_ranges_win() {
        let options = RenderOptions {
            x_range: Some((1.0, 2.0)),
            y_range: Some((0.0, 1.0)),
            ..RenderOptions::default()
        };
        let axis = sample_curve().axis_data_at(&options, NOW).unwrap();
        assert_eq!(axis.x_range, Some((1.0, 2.0)));
        assert_eq!(axis.y_range, Some((0.0, 1.0)));
    }

    #[test]
    fn export_names() {
        let lc = sample_curve();
        let options = RenderOptions {
            extension: ".pdf".into(),
            ..RenderOptions::default()
        };
        assert_eq!(
            options.export_file_name(&lc),
            "photon_flux_4FGL_J0534.5+2200_daily.pdf"
        );
        assert_eq!(options.export_path(&lc), None);
        let path = options.with_export_dir("/tmp/plots").export_path(&lc).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/tmp/plots/photon_flux_4FGL_J0534.5+2200_daily.pdf")
        );
    }

    #[test]
    fn median_of_even_and_odd() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recording failed")]
    struct Never;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(String, AxisData)>>,
    }

    impl Renderer for Recorder {
        type Output = PathBuf;
        type Error = Never;

        fn render(
            &self,
            curve: &LightCurve,
            options: &RenderOptions,
        ) -> std::result::Result<PathBuf, Never> {
            let axis = curve.axis_data_at(options, NOW).map_err(|_| Never)?;
            self.seen
                .borrow_mut()
                .push((curve.source().to_string(), axis));
            Ok(options
                .export_path(curve)
                .unwrap_or_else(|| PathBuf::from(options.export_file_name(curve))))
        }
    }

    #[test]
    fn renderer_receives_curve_and_options() {
        let recorder = Recorder::default();
        let lc = sample_curve();
        let out = recorder
            .render(&lc, &RenderOptions::default().with_export_dir("out"))
            .unwrap();
        assert_eq!(
            out,
            PathBuf::from("out/photon_flux_4FGL_J0534.5+2200_daily.png")
        );
        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, lc.source());
        assert_eq!(seen[0].1.bins.len(), lc.len());
    }
}
