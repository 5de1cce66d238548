// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Windowed FFT analysis configuration

use serde::{Deserialize, Serialize};

/// Configuration for the windowed FFT spectral analysis.
///
/// The signal is cut into windows of `window_size_s` seconds advancing by
/// `window_size * (1 - overlap)` samples. An `overlap` close to 1.0 produces a
/// step of zero samples and is rejected by [`crate::config::Config::validate`]
/// and by the analyzer itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Window size in seconds
    #[serde(default = "default_window_size_s")]
    pub window_size_s: f32,

    /// Fractional overlap between consecutive windows (e.g. 0.5 for 50%)
    #[serde(default = "default_overlap")]
    pub overlap: f32,

    /// Minimum normalized magnitude to keep; FFT coefficients below this are
    /// zeroed before the magnitudes are derived. 0.0 keeps everything.
    #[serde(default = "default_magnitude_threshold")]
    pub magnitude_threshold: f32,
}

fn default_window_size_s() -> f32 {
    0.5
}

fn default_overlap() -> f32 {
    0.5 // 50% overlap
}

fn default_magnitude_threshold() -> f32 {
    0.0 // 0.2 eliminates noise
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size_s: default_window_size_s(),
            overlap: default_overlap(),
            magnitude_threshold: default_magnitude_threshold(),
        }
    }
}
