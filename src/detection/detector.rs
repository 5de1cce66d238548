// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency-domain anomaly detection
//!
//! This module classifies the output of the windowed FFT analysis: frequency
//! components that are statistically significant across the analyzed windows
//! and do not belong to the motor's known operating frequencies are reported
//! as anomalies. Nearby strong bins are merged into one detection and known
//! frequencies are excluded with a configurable tolerance, so wideband noise
//! and spectral leakage around legitimate tones do not produce false
//! positives.

use crate::config::DetectionConfig;
use log::debug;
use ndarray::{Array2, Axis};

/// Detects anomalies in motor vibrations using FFT analysis.
///
/// All tunable parameters are plain public fields; the detection methods are
/// pure functions of their inputs and these fields, with no hidden state.
/// The monitor exposes `magnitude_threshold` for interactive tuning.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use rust_vibromon::detection::AnomalyDetector;
///
/// let detector = AnomalyDetector::default();
/// let frequencies = [0.0, 10.0, 20.0, 30.0, 40.0];
/// // One window; only the 30 Hz bin is strong
/// let magnitudes = array![[0.0, 0.1, 0.05, 1.0, 0.1]];
/// let anomalies = detector.detect_anomalies(&frequencies, &[10.0], &magnitudes);
/// assert_eq!(anomalies, vec![30.0]);
/// ```
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    /// Relative threshold: a bin is strong when its peak magnitude across
    /// all windows exceeds `threshold_ratio` times the global maximum
    pub threshold_ratio: f32,

    /// Distance in Hz below which a detection matches a normal frequency
    /// and is discarded
    pub tolerance: f32,

    /// Distance in Hz for merging nearby strong bins into one group
    pub group_distance: f32,

    /// Lower bound of the monitored frequency band in Hz
    pub freq_min: f32,

    /// Upper bound of the monitored frequency band in Hz
    pub freq_max: f32,

    /// Absolute magnitude threshold for the single-window band check
    pub magnitude_threshold: f32,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            threshold_ratio: 0.5,
            tolerance: 3.0,
            group_distance: 3.0,
            freq_min: 70.0,
            freq_max: 90.0,
            magnitude_threshold: 5.0,
        }
    }
}

impl AnomalyDetector {
    /// Create a detector from the detection configuration.
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            threshold_ratio: config.threshold_ratio,
            tolerance: config.tolerance_hz,
            group_distance: config.group_distance_hz,
            freq_min: config.freq_min,
            freq_max: config.freq_max,
            magnitude_threshold: config.band_magnitude_threshold,
        }
    }

    /// Detect anomalous frequencies in a windowed magnitude matrix.
    ///
    /// The classification proceeds in three steps:
    ///
    /// 1. A frequency bin is *strong* when its peak magnitude across all
    ///    windows exceeds `threshold_ratio` times the global maximum of the
    ///    matrix.
    /// 2. Strong frequencies are sorted ascending and chained into groups: a
    ///    frequency joins the current group when it lies within
    ///    `group_distance` Hz of the group's previous member, so a chain of
    ///    near frequencies can span more than `group_distance` end-to-end.
    ///    Each group collapses to its mean, rounded to one decimal place.
    /// 3. Group means within `tolerance` Hz of any normal frequency are
    ///    discarded.
    ///
    /// The result keeps the ascending group order from step 2; it is not
    /// re-sorted after collapsing. An empty or all-zero matrix yields an
    /// empty result rather than an error, and an empty `normal_freqs` list
    /// excludes nothing.
    ///
    /// ### Parameters
    ///
    /// * `frequencies` - FFT bin values, one per matrix column
    /// * `normal_freqs` - Known/expected operating frequencies
    /// * `magnitudes` - Magnitude matrix indexed by `[window][bin]`
    ///
    /// ### Returns
    ///
    /// Grouped and filtered anomaly frequencies in Hz.
    pub fn detect_anomalies(
        &self,
        frequencies: &[f32],
        normal_freqs: &[f32],
        magnitudes: &Array2<f32>,
    ) -> Vec<f32> {
        if magnitudes.is_empty() {
            return Vec::new();
        }
        let max_magnitude = magnitudes.iter().fold(0.0f32, |acc, &v| acc.max(v));
        if max_magnitude <= 0.0 {
            // Degenerate all-zero matrix: the strong predicate is vacuously
            // false, not a division hazard
            return Vec::new();
        }

        // Per-bin peak across all windows
        let mut strong_freqs: Vec<f32> = frequencies
            .iter()
            .zip(magnitudes.axis_iter(Axis(1)))
            .filter(|(_, column)| {
                let peak = column.iter().fold(0.0f32, |acc, &v| acc.max(v));
                peak > self.threshold_ratio * max_magnitude
            })
            .map(|(&freq, _)| freq)
            .collect();

        if strong_freqs.is_empty() {
            return Vec::new();
        }
        strong_freqs.sort_by(f32::total_cmp);

        // Step 1: chain close peaks into frequency groups
        let mut groups: Vec<Vec<f32>> = Vec::new();
        let mut current_group = vec![strong_freqs[0]];
        for &f in &strong_freqs[1..] {
            // Greedy chaining against the previous member, not the group start
            if (f - current_group[current_group.len() - 1]).abs() <= self.group_distance {
                current_group.push(f);
            } else {
                groups.push(current_group);
                current_group = vec![f];
            }
        }
        groups.push(current_group);

        // Step 2: reduce each group to its mean, rounded to 0.1 Hz
        let detected: Vec<f32> = groups
            .iter()
            .map(|group| {
                let mean = group.iter().sum::<f32>() / group.len() as f32;
                (mean * 10.0).round() / 10.0
            })
            .collect();

        // Step 3: exclude anything close to normal frequencies
        let filtered: Vec<f32> = detected
            .into_iter()
            .filter(|&f| normal_freqs.iter().all(|&nf| (f - nf).abs() > self.tolerance))
            .collect();

        debug!(
            "{} strong bins -> {} groups -> {} anomalies",
            strong_freqs.len(),
            groups.len(),
            filtered.len()
        );
        filtered
    }

    /// Band-limited single-window check used by the real-time monitor.
    ///
    /// Returns true when any bin within `[freq_min, freq_max]` has a
    /// magnitude above `magnitude_threshold`. This is a much simpler
    /// predicate than [`AnomalyDetector::detect_anomalies`] and operates on
    /// one window's magnitude row at a time.
    pub fn band_exceeds(&self, frequencies: &[f32], magnitudes: &[f32]) -> bool {
        frequencies
            .iter()
            .zip(magnitudes)
            .any(|(&f, &m)| f >= self.freq_min && f <= self.freq_max && m > self.magnitude_threshold)
    }
}

/// Snap each target frequency to the nearest available FFT bin.
///
/// A target is kept only when the nearest bin lies within `tolerance` Hz;
/// snapped values are rounded to two decimal places, de-duplicated and
/// returned in ascending order.
pub fn snap_to_nearest(frequencies: &[f32], target_freqs: &[f32], tolerance: f32) -> Vec<f32> {
    let mut snapped: Vec<f32> = target_freqs
        .iter()
        .filter_map(|&target| {
            let nearest = frequencies
                .iter()
                .copied()
                .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))?;
            if (nearest - target).abs() <= tolerance {
                Some((nearest * 100.0).round() / 100.0)
            } else {
                None
            }
        })
        .collect();
    snapped.sort_by(f32::total_cmp);
    snapped.dedup();
    snapped
}
