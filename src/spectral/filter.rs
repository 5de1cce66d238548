// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency-domain signal filtering
//!
//! This module provides a standalone denoising pass over full signals,
//! independent of the windowed analysis path: all frequency components whose
//! normalized magnitude falls below a threshold are removed and the signal is
//! transformed back to the time domain.
//!
//! # Example
//!
//! ```
//! use rust_vibromon::spectral::filter::{Filter, FrequencyThresholdFilter};
//! use std::f32::consts::PI;
//!
//! // 30 Hz tone with a weak 80 Hz component
//! let signal: Vec<f32> = (0..1000)
//!     .map(|i| {
//!         let t = i as f32 / 1000.0;
//!         (2.0 * PI * 30.0 * t).sin() + 0.05 * (2.0 * PI * 80.0 * t).sin()
//!     })
//!     .collect();
//!
//! // Suppress everything below 10% normalized magnitude
//! let filter = FrequencyThresholdFilter::new(0.1);
//! let filtered = filter.apply(&signal);
//! assert_eq!(filtered.len(), signal.len());
//! ```

use super::fft::WindowFunction;
use log::warn;
use realfft::RealFftPlanner;

/// Trait for implementing digital filters
///
/// This trait provides a common interface for whole-signal filters. All
/// filters are thread-safe and can be used in multi-threaded environments.
pub trait Filter: Send + Sync {
    /// Apply the filter to an input signal, returning the filtered signal.
    ///
    /// The output always has the same length as the input.
    fn apply(&self, signal: &[f32]) -> Vec<f32>;
}

/// Removes all frequency components with normalized magnitude below a
/// threshold.
///
/// The signal is transformed with a full-length real FFT, coefficients whose
/// normalized magnitude `(2 / N) * |X(k)|` falls below `threshold` are
/// zeroed, and the spectrum is transformed back to the time domain. A
/// threshold of 0.0 suppresses nothing and round-trips the signal (up to
/// floating point error).
///
/// An optional window taper can be applied before the forward transform;
/// the window effect is not removed afterwards, matching the approximate
/// denoising semantics of the windowed analysis chain.
pub struct FrequencyThresholdFilter {
    /// Minimum normalized magnitude to keep
    pub threshold: f32,

    /// Optional taper applied before the forward transform
    window: Option<WindowFunction>,
}

impl FrequencyThresholdFilter {
    /// Create a filter with the given magnitude threshold and no window.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            window: None,
        }
    }

    /// Apply a window taper before the forward transform.
    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = Some(window);
        self
    }
}

impl Filter for FrequencyThresholdFilter {
    fn apply(&self, signal: &[f32]) -> Vec<f32> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(n);
        let c2r = planner.plan_fft_inverse(n);

        // Optional window
        let mut input: Vec<f32> = match self.window {
            Some(window) => signal
                .iter()
                .zip(window.coefficients(n))
                .map(|(&s, w)| s * w)
                .collect(),
            None => signal.to_vec(),
        };

        let mut spectrum = r2c.make_output_vec();
        if r2c.process(&mut input, &mut spectrum).is_err() {
            warn!("Forward FFT failed for {} samples; signal unchanged", n);
            return signal.to_vec();
        }

        // Zero weak components
        let scale = 2.0 / n as f32;
        for c in spectrum.iter_mut() {
            if scale * c.norm() < self.threshold {
                *c = num_complex::Complex::new(0.0, 0.0);
            }
        }

        // Inverse FFT back to the time domain; realfft's inverse is
        // unnormalized so the result is scaled by 1/N
        let mut output = c2r.make_output_vec();
        if c2r.process(&mut spectrum, &mut output).is_err() {
            warn!("Inverse FFT failed for {} samples; signal unchanged", n);
            return signal.to_vec();
        }
        for value in output.iter_mut() {
            *value /= n as f32;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn two_tone_signal(n: usize, sample_rate: f32) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (2.0 * PI * 30.0 * t).sin() + 0.05 * (2.0 * PI * 80.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_zero_threshold_round_trips() {
        let signal = two_tone_signal(1000, 1000.0);
        let filter = FrequencyThresholdFilter::new(0.0);
        let filtered = filter.apply(&signal);
        assert_eq!(filtered.len(), signal.len());
        for (a, b) in signal.iter().zip(&filtered) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_weak_component_suppressed() {
        let sample_rate = 1000.0;
        let signal = two_tone_signal(1000, sample_rate);
        let filter = FrequencyThresholdFilter::new(0.1);
        let filtered = filter.apply(&signal);

        // Correlate the output against both tones: the strong one survives,
        // the weak one is gone
        let correlate = |freq: f32, data: &[f32]| -> f32 {
            data.iter()
                .enumerate()
                .map(|(i, &s)| s * (2.0 * PI * freq * i as f32 / sample_rate).sin())
                .sum::<f32>()
                .abs()
                / data.len() as f32
        };
        assert!(correlate(30.0, &filtered) > 0.4);
        assert!(correlate(80.0, &filtered) < 0.01);
    }

    #[test]
    fn test_empty_signal() {
        let filter = FrequencyThresholdFilter::new(0.5);
        assert!(filter.apply(&[]).is_empty());
    }

    #[test]
    fn test_hann_window_still_suppresses_weak_tone() {
        let sample_rate = 1000.0;
        let signal = two_tone_signal(1000, sample_rate);
        // Hann tapering halves the normalized magnitudes, so the threshold
        // is halved as well
        let filter = FrequencyThresholdFilter::new(0.05).with_window(WindowFunction::Hann);
        let filtered = filter.apply(&signal);

        let correlate = |freq: f32, data: &[f32]| -> f32 {
            data.iter()
                .enumerate()
                .map(|(i, &s)| s * (2.0 * PI * freq * i as f32 / sample_rate).sin())
                .sum::<f32>()
                .abs()
                / data.len() as f32
        };
        // The window taper shrinks the surviving tone but does not remove it
        assert!(correlate(30.0, &filtered) > 0.1);
        assert!(correlate(80.0, &filtered) < 0.01);
    }

    #[test]
    fn test_odd_length_round_trips() {
        let signal = two_tone_signal(999, 1000.0);
        let filter = FrequencyThresholdFilter::new(0.0);
        let filtered = filter.apply(&signal);
        assert_eq!(filtered.len(), 999);
        for (a, b) in signal.iter().zip(&filtered) {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
