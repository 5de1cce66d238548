// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Windowed Fast Fourier Transform (FFT) spectral analysis
//!
//! This module converts time-domain vibration signals into windowed
//! frequency-domain magnitude data. It includes:
//!
//! - [`WindowedFftAnalyzer`], which slides an overlapping Hann-tapered window
//!   across a signal and computes a normalized magnitude spectrum per window
//! - [`Spectrogram`], the resulting per-window magnitude matrix with its
//!   frequency bins and window center timestamps
//! - [`WindowFunction`], the supported window tapers
//! - [`frequency_bins`], the real-FFT bin layout helper
//!
//! # Example
//!
//! ```
//! use rust_vibromon::simulation::Motor;
//! use rust_vibromon::spectral::WindowedFftAnalyzer;
//!
//! // A clean 25 Hz vibration, 5 s at 1 kHz
//! let signal = Motor::new(vec![25.0]).create_vibration(5.0, 1000, 0.0, None, 0.0, None);
//!
//! // 0.5 s windows with 50% overlap: 19 windows of 251 bins
//! let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
//! let spectrogram = analyzer.analyze(&signal).unwrap();
//! assert_eq!(spectrogram.n_windows(), 19);
//! assert_eq!(spectrogram.frequencies.len(), 251);
//! ```
//!
//! # Spectral Analysis Process
//!
//! 1. Cut the signal into windows of `window_size` samples advancing by
//!    `window_size * (1 - overlap)` samples
//! 2. Taper each window with a Hann function to reduce spectral leakage
//! 3. Compute the real FFT of the tapered window (`window_size / 2 + 1` bins)
//! 4. Normalize the magnitude as `(2 / window_size) * |X(k)|`
//! 5. Optionally zero FFT coefficients whose normalized magnitude falls below
//!    a threshold and re-derive the magnitudes from the filtered coefficients

use crate::config::AnalysisConfig;
use crate::simulation::VibrationSignal;
use log::debug;
use ndarray::{Array2, Axis};
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during spectral analysis
#[derive(Error, Debug)]
pub enum SpectralError {
    /// The window/overlap combination produces a non-positive step size.
    /// Raised before any computation takes place.
    #[error(
        "Overlap too high; resulting step size <= 0 (window {window_size} samples, overlap {overlap})"
    )]
    WindowConfig {
        /// Window size in samples
        window_size: usize,
        /// Requested fractional overlap
        overlap: f32,
    },
}

/// Available window functions for spectral analysis
///
/// Window functions taper a time-domain frame before FFT analysis to reduce
/// spectral leakage.
///
/// - **Rectangular**: no tapering, best frequency resolution but worst
///   leakage. Useful when the frame contains an integer number of cycles.
/// - **Hann**: cosine-based taper with a good balance between resolution and
///   leakage suppression. The default for all windowed analysis here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFunction {
    /// Rectangular window (no tapering)
    Rectangular,
    /// Hann window (cosine-based)
    Hann,
}

impl WindowFunction {
    /// Compute the window coefficients for a frame of `size` samples.
    ///
    /// The Hann coefficients follow the symmetric definition
    /// `0.5 * (1 - cos(2πi / (size - 1)))`, which is zero at both frame
    /// edges. A one-sample frame degenerates to a single 1.0 coefficient.
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        match self {
            WindowFunction::Rectangular => vec![1.0; size],
            WindowFunction::Hann => {
                if size <= 1 {
                    return vec![1.0; size];
                }
                (0..size)
                    .map(|i| {
                        0.5 * (1.0
                            - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
                    })
                    .collect()
            }
        }
    }
}

/// Frequency bin values in Hz for a real FFT over `window_size` samples.
///
/// The layout matches the real FFT output: `window_size / 2 + 1` non-negative
/// frequencies from 0 Hz (DC) up to the Nyquist frequency in steps of
/// `sample_rate / window_size`.
pub fn frequency_bins(window_size: usize, sample_rate: u32) -> Vec<f32> {
    let df = sample_rate as f32 / window_size as f32;
    (0..=window_size / 2).map(|i| i as f32 * df).collect()
}

/// Data resulting from windowed spectral analysis
///
/// One row of `magnitudes` per analysis window, one column per frequency bin.
/// `times` holds the center timestamp of each window and has `n_windows()`
/// entries; `frequencies` has one entry per column.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Center timestamps of each window in seconds
    pub times: Vec<f32>,

    /// Frequency bin values in Hz
    pub frequencies: Vec<f32>,

    /// Normalized magnitudes indexed by `[window][frequency bin]`
    pub magnitudes: Array2<f32>,
}

impl Spectrogram {
    /// Number of analysis windows (matrix rows).
    pub fn n_windows(&self) -> usize {
        self.magnitudes.len_of(Axis(0))
    }

    /// Number of frequency bins (matrix columns).
    pub fn n_bins(&self) -> usize {
        self.magnitudes.len_of(Axis(1))
    }
}

/// Windowed, overlapping FFT analyzer
///
/// The analyzer slides a Hann-tapered window across a vibration signal and
/// produces a [`Spectrogram`]. The FFT plan and window coefficients are
/// cached per window size, so repeated analyses and per-frame monitor calls
/// do not replan.
///
/// ### Configuration
///
/// - `window_size_s`: window length in seconds; the sample count is derived
///   from the analyzed signal's sampling rate
/// - `overlap`: fractional overlap between consecutive windows; an overlap
///   that truncates to a zero-sample step is rejected with
///   [`SpectralError::WindowConfig`]
/// - `magnitude_threshold`: optional minimum normalized magnitude; FFT
///   coefficients below it are zeroed and the returned magnitudes are
///   re-derived from the filtered spectrum
pub struct WindowedFftAnalyzer {
    /// Window size in seconds
    window_size_s: f32,

    /// Fractional overlap between consecutive windows
    overlap: f32,

    /// Optional magnitude threshold applied inside each window
    magnitude_threshold: Option<f32>,

    /// FFT planner for efficient computation
    planner: RealFftPlanner<f32>,

    /// Cached FFT plan and Hann coefficients, keyed by window size
    plan: Option<CachedPlan>,
}

struct CachedPlan {
    window_size: usize,
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
}

impl WindowedFftAnalyzer {
    /// Create an analyzer with the given window size and overlap.
    pub fn new(window_size_s: f32, overlap: f32) -> Self {
        Self {
            window_size_s,
            overlap,
            magnitude_threshold: None,
            planner: RealFftPlanner::new(),
            plan: None,
        }
    }

    /// Create an analyzer from the analysis configuration.
    ///
    /// A configured magnitude threshold of 0.0 (the default) filters nothing
    /// and is treated as disabled.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let analyzer = Self::new(config.window_size_s, config.overlap);
        if config.magnitude_threshold > 0.0 {
            analyzer.with_magnitude_threshold(config.magnitude_threshold)
        } else {
            analyzer
        }
    }

    /// Set the minimum normalized magnitude to keep.
    ///
    /// FFT coefficients whose normalized magnitude falls below the threshold
    /// are zeroed, and the magnitudes returned for the window reflect the
    /// filtered spectrum rather than the original one.
    pub fn with_magnitude_threshold(mut self, threshold: f32) -> Self {
        self.magnitude_threshold = Some(threshold);
        self
    }

    /// Perform the windowed FFT over a full signal.
    ///
    /// For each window start offset from 0 to `len - window_size` in steps of
    /// `window_size * (1 - overlap)`, the window is Hann-tapered, transformed
    /// and normalized. The center timestamp of each window is
    /// `time[start + window_size / 2]`.
    ///
    /// A signal shorter than one window yields an empty spectrogram (zero
    /// windows) rather than an error, matching insufficient-data semantics.
    ///
    /// ### Errors
    ///
    /// [`SpectralError::WindowConfig`] if the derived step size is zero.
    pub fn analyze(&mut self, signal: &VibrationSignal) -> Result<Spectrogram, SpectralError> {
        let window_size = (self.window_size_s * signal.sample_rate as f32) as usize;
        let step = (window_size as f32 * (1.0 - self.overlap)) as usize;
        if step == 0 {
            return Err(SpectralError::WindowConfig {
                window_size,
                overlap: self.overlap,
            });
        }

        let frequencies = frequency_bins(window_size, signal.sample_rate);
        let n_bins = frequencies.len();

        if signal.len() < window_size {
            debug!(
                "Signal of {} samples shorter than window of {}; empty spectrogram",
                signal.len(),
                window_size
            );
            return Ok(Spectrogram {
                times: Vec::new(),
                frequencies,
                magnitudes: Array2::zeros((0, n_bins)),
            });
        }

        let mut times = Vec::new();
        let mut rows: Vec<Vec<f32>> = Vec::new();
        let mut start = 0;
        while start + window_size <= signal.len() {
            times.push(signal.time[start + window_size / 2]);
            rows.push(self.transform_window(&signal.samples[start..start + window_size]));
            start += step;
        }

        let mut magnitudes = Array2::zeros((rows.len(), n_bins));
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                magnitudes[[i, j]] = value;
            }
        }

        debug!(
            "Windowed FFT: {} windows of {} samples, {} bins",
            times.len(),
            window_size,
            n_bins
        );

        Ok(Spectrogram {
            times,
            frequencies,
            magnitudes,
        })
    }

    /// Compute the normalized magnitude spectrum of a single window slice.
    ///
    /// This is the per-window primitive behind [`WindowedFftAnalyzer::analyze`],
    /// exposed for the sliding-window monitor which transforms one window per
    /// frame. The slice is Hann-tapered, transformed with a real FFT and
    /// normalized as `(2 / window_size) * |X(k)|`; the configured magnitude
    /// threshold is applied the same way as in the full analysis.
    pub fn transform_window(&mut self, samples: &[f32]) -> Vec<f32> {
        let window_size = samples.len();
        self.ensure_plan(window_size);
        let Some(plan) = self.plan.as_ref() else {
            return Vec::new();
        };

        let mut input: Vec<f32> = samples
            .iter()
            .zip(&plan.window)
            .map(|(&s, &w)| s * w)
            .collect();
        let mut spectrum = plan.fft.make_output_vec();
        if plan.fft.process(&mut input, &mut spectrum).is_err() {
            // Buffer lengths are fixed by the plan
            return vec![0.0; window_size / 2 + 1];
        }

        let scale = 2.0 / window_size as f32;
        let mut magnitude: Vec<f32> = spectrum.iter().map(|c| scale * c.norm()).collect();

        if let Some(threshold) = self.magnitude_threshold {
            // Zero weak coefficients, then re-derive the normalized
            // magnitudes so they describe the filtered spectrum
            for (c, &m) in spectrum.iter_mut().zip(&magnitude) {
                if m < threshold {
                    *c = num_complex::Complex::new(0.0, 0.0);
                }
            }
            magnitude = spectrum.iter().map(|c| scale * c.norm()).collect();
        }

        magnitude
    }

    fn ensure_plan(&mut self, window_size: usize) {
        if window_size == 0 {
            self.plan = None;
            return;
        }
        let stale = match &self.plan {
            Some(plan) => plan.window_size != window_size,
            None => true,
        };
        if stale {
            self.plan = Some(CachedPlan {
                window_size,
                fft: self.planner.plan_fft_forward(window_size),
                window: WindowFunction::Hann.coefficients(window_size),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Motor;

    fn create_sine(freq: f32, sample_rate: u32, duration_s: f32) -> VibrationSignal {
        Motor::new(vec![freq]).create_vibration(duration_s, sample_rate, 0.0, None, 0.0, None)
    }

    #[test]
    fn test_hann_coefficients_taper_edges() {
        let window = WindowFunction::Hann.coefficients(512);
        assert_eq!(window.len(), 512);
        assert!(window[0].abs() < 1e-6);
        assert!(window[511].abs() < 1e-6);
        assert!((window[255] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_hann_degenerate_sizes() {
        assert_eq!(WindowFunction::Hann.coefficients(0).len(), 0);
        assert_eq!(WindowFunction::Hann.coefficients(1), vec![1.0]);
    }

    #[test]
    fn test_frequency_bins_layout() {
        let bins = frequency_bins(500, 1000);
        assert_eq!(bins.len(), 251);
        assert_eq!(bins[0], 0.0);
        assert!((bins[1] - 2.0).abs() < 1e-6);
        assert!((bins[250] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_window_count_property() {
        // floor((len - window_size) / step) + 1 windows for len >= window_size
        let signal = create_sine(25.0, 1000, 5.0);
        for &(window_size_s, overlap, expected) in &[
            (0.5f32, 0.5f32, 19usize), // step 250: (5000 - 500) / 250 + 1
            (0.5, 0.0, 10),            // step 500
            (1.0, 0.5, 9),             // step 500: (5000 - 1000) / 500 + 1
        ] {
            let mut analyzer = WindowedFftAnalyzer::new(window_size_s, overlap);
            let spectrogram = analyzer.analyze(&signal).unwrap();
            assert_eq!(
                spectrogram.n_windows(),
                expected,
                "window_size_s={} overlap={}",
                window_size_s,
                overlap
            );
            assert_eq!(spectrogram.times.len(), expected);
        }
    }

    #[test]
    fn test_step_zero_rejected_before_computation() {
        let signal = create_sine(25.0, 1000, 1.0);
        let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.999);
        match analyzer.analyze(&signal) {
            Err(SpectralError::WindowConfig { window_size, .. }) => {
                assert_eq!(window_size, 500);
            }
            other => panic!("expected WindowConfig error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_short_signal_yields_empty_spectrogram() {
        let signal = create_sine(25.0, 1000, 0.25);
        let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
        let spectrogram = analyzer.analyze(&signal).unwrap();
        assert_eq!(spectrogram.n_windows(), 0);
        assert!(spectrogram.times.is_empty());
        // Frequency bins are still derived from the window size
        assert_eq!(spectrogram.frequencies.len(), 251);
    }

    #[test]
    fn test_sine_peak_lands_on_expected_bin() {
        // 40 Hz sine, 0.5 s windows at 1 kHz: bins are 2 Hz apart, so the
        // peak must land exactly on the 40 Hz bin
        let signal = create_sine(40.0, 1000, 5.0);
        let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
        let spectrogram = analyzer.analyze(&signal).unwrap();

        let peak_bin = spectrogram
            .magnitudes
            .row(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(j, _)| j)
            .unwrap();
        assert!((spectrogram.frequencies[peak_bin] - 40.0).abs() < 1e-3);

        // Hann window coherent gain halves the normalized unit amplitude
        let peak = spectrogram.magnitudes[[0, peak_bin]];
        assert!((peak - 0.5).abs() < 0.05, "peak magnitude {}", peak);
    }

    #[test]
    fn test_window_center_times() {
        let signal = create_sine(25.0, 1000, 5.0);
        let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
        let spectrogram = analyzer.analyze(&signal).unwrap();
        // First window covers samples [0, 500), center sample 250
        assert!((spectrogram.times[0] - 0.25).abs() < 1e-6);
        // Second window starts at 250, center sample 500
        assert!((spectrogram.times[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_magnitude_threshold_zeroes_weak_bins() {
        // Strong 30 Hz tone plus weak 80 Hz tone
        let strong = create_sine(30.0, 1000, 2.0);
        let weak = create_sine(80.0, 1000, 2.0);
        let mixed: Vec<f32> = strong
            .samples
            .iter()
            .zip(&weak.samples)
            .map(|(&a, &b)| a + 0.1 * b)
            .collect();
        let signal = VibrationSignal::new(mixed, 1000);

        let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5).with_magnitude_threshold(0.2);
        let spectrogram = analyzer.analyze(&signal).unwrap();

        let bin_80 = spectrogram
            .frequencies
            .iter()
            .position(|&f| (f - 80.0).abs() < 1e-3)
            .unwrap();
        let bin_30 = spectrogram
            .frequencies
            .iter()
            .position(|&f| (f - 30.0).abs() < 1e-3)
            .unwrap();
        for row in spectrogram.magnitudes.rows() {
            assert_eq!(row[bin_80], 0.0);
            assert!(row[bin_30] > 0.2);
        }
    }
}
