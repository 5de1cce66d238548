// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Anomaly detection configuration

use serde::{Deserialize, Serialize};

/// Configuration for the frequency-domain anomaly detector.
///
/// `threshold_ratio`, `tolerance_hz` and `group_distance_hz` drive the
/// grouped peak classification over a full magnitude matrix. The band
/// parameters (`freq_min`, `freq_max`, `band_magnitude_threshold`) drive the
/// simpler single-window check used by the real-time monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Relative threshold: a frequency bin is strong when its peak magnitude
    /// across all windows exceeds `threshold_ratio` times the global maximum
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f32,

    /// Distance in Hz below which a detected frequency is considered one of
    /// the known normal frequencies and discarded
    #[serde(default = "default_tolerance_hz")]
    pub tolerance_hz: f32,

    /// Distance in Hz for merging nearby strong bins into one group
    #[serde(default = "default_group_distance_hz")]
    pub group_distance_hz: f32,

    /// Lower bound of the monitored frequency band in Hz
    #[serde(default = "default_freq_min")]
    pub freq_min: f32,

    /// Upper bound of the monitored frequency band in Hz
    #[serde(default = "default_freq_max")]
    pub freq_max: f32,

    /// Absolute magnitude threshold for the band check
    #[serde(default = "default_band_magnitude_threshold")]
    pub band_magnitude_threshold: f32,
}

fn default_threshold_ratio() -> f32 {
    0.5
}

fn default_tolerance_hz() -> f32 {
    3.0
}

fn default_group_distance_hz() -> f32 {
    3.0
}

fn default_freq_min() -> f32 {
    70.0
}

fn default_freq_max() -> f32 {
    90.0
}

fn default_band_magnitude_threshold() -> f32 {
    5.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: default_threshold_ratio(),
            tolerance_hz: default_tolerance_hz(),
            group_distance_hz: default_group_distance_hz(),
            freq_min: default_freq_min(),
            freq_max: default_freq_max(),
            band_magnitude_threshold: default_band_magnitude_threshold(),
        }
    }
}
