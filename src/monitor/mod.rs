// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Sliding-Window Vibration Monitor
//!
//! Drives the spectral analyzer and the anomaly detector over a continuously
//! advancing window for interactive use. Each step transforms the current
//! window, runs the detector's band check and emits a [`MonitorFrame`]; a
//! rolling count of consecutive anomalous frames decides the sustained-fault
//! alert state.
//!
//! The monitor owns the injected detector and exposes its magnitude
//! threshold for live tuning (the original front end binds this to a
//! slider). Rendering is the caller's concern; the monitor only produces
//! frames.
//!
//! # Example
//!
//! ```
//! use rust_vibromon::config::MonitorConfig;
//! use rust_vibromon::detection::AnomalyDetector;
//! use rust_vibromon::monitor::VibrationMonitor;
//! use rust_vibromon::simulation::Motor;
//!
//! let signal = Motor::new(vec![25.0]).create_vibration(5.0, 1000, 0.0, None, 0.0, None);
//! let mut detector = AnomalyDetector::default();
//! detector.magnitude_threshold = 0.2;
//!
//! let mut monitor =
//!     VibrationMonitor::new(signal, detector, &MonitorConfig::default()).unwrap();
//! monitor.run(|frame| {
//!     if frame.alert {
//!         println!("sustained fault at t = {:.2} s", frame.t_center);
//!     }
//! });
//! ```

use crate::config::MonitorConfig;
use crate::detection::AnomalyDetector;
use crate::simulation::VibrationSignal;
use crate::spectral::{frequency_bins, SpectralError, WindowedFftAnalyzer};
use log::{debug, info};

/// One analysis step of the sliding-window monitor.
#[derive(Debug, Clone)]
pub struct MonitorFrame {
    /// Frame number, starting at 0
    pub index: usize,

    /// First sample of the analyzed window
    pub start: usize,

    /// Center timestamp of the analyzed window in seconds
    pub t_center: f32,

    /// Normalized magnitude spectrum of the window
    pub magnitudes: Vec<f32>,

    /// Result of the detector's band check for this window
    pub anomaly: bool,

    /// Sustained-fault state: asserted only after the configured number of
    /// consecutive anomalous frames, cleared by one clean frame
    pub alert: bool,
}

/// Monitors motor vibration using FFT over a sliding window.
///
/// The monitor advances `step_samples` per frame across the signal and uses
/// the injected [`AnomalyDetector`]'s band check on each window's spectrum.
/// A fault must persist for `alert_frames` consecutive frames before the
/// alert state asserts; a single clean frame clears it, so short noise
/// bursts do not latch an alarm.
pub struct VibrationMonitor {
    signal: VibrationSignal,
    detector: AnomalyDetector,
    analyzer: WindowedFftAnalyzer,
    frequencies: Vec<f32>,
    window_size: usize,
    step_samples: usize,
    alert_frames: u32,
    n_frames: usize,
    frame_index: usize,
    fault_frame_counter: u32,
}

impl VibrationMonitor {
    /// Create a monitor over a signal with an injected detector.
    ///
    /// ### Errors
    ///
    /// [`SpectralError::WindowConfig`] if the configured window truncates to
    /// zero samples.
    pub fn new(
        signal: VibrationSignal,
        detector: AnomalyDetector,
        config: &MonitorConfig,
    ) -> Result<Self, SpectralError> {
        let window_size = (config.window_size_s * signal.sample_rate as f32) as usize;
        if window_size == 0 {
            return Err(SpectralError::WindowConfig {
                window_size,
                overlap: 0.0,
            });
        }

        let n_frames = if signal.len() >= window_size {
            (signal.len() - window_size) / config.step_samples
        } else {
            0
        };
        let frequencies = frequency_bins(window_size, signal.sample_rate);

        debug!(
            "Monitor over {} samples: {} frames of {} samples, step {}",
            signal.len(),
            n_frames,
            window_size,
            config.step_samples
        );

        Ok(Self {
            signal,
            detector,
            analyzer: WindowedFftAnalyzer::new(config.window_size_s, 0.0),
            frequencies,
            window_size,
            step_samples: config.step_samples,
            alert_frames: config.alert_frames,
            n_frames,
            frame_index: 0,
            fault_frame_counter: 0,
        })
    }

    /// The FFT bin values used for every frame.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// The injected detector.
    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// Update the detector's band magnitude threshold.
    ///
    /// This is the live tuning hook the interactive front end binds to a
    /// threshold slider; it takes effect on the next frame.
    pub fn set_threshold(&mut self, threshold: f32) {
        debug!("Monitor threshold set to {}", threshold);
        self.detector.magnitude_threshold = threshold;
    }

    /// Whether the sustained-fault alert is currently asserted.
    pub fn alert_active(&self) -> bool {
        self.fault_frame_counter >= self.alert_frames
    }

    /// Restart the sweep from the beginning and clear the fault counter.
    pub fn reset(&mut self) {
        info!("Monitor reset");
        self.frame_index = 0;
        self.fault_frame_counter = 0;
    }

    /// Advance the window by one step and analyze it.
    ///
    /// Returns `None` once the sweep has consumed the signal (use
    /// [`VibrationMonitor::reset`] to run again) or when the signal is
    /// shorter than one window.
    pub fn step(&mut self) -> Option<MonitorFrame> {
        if self.frame_index >= self.n_frames {
            return None;
        }

        let mut start = self.frame_index * self.step_samples;
        // Clamp the final window to the end of the signal
        if start + self.window_size > self.signal.len() {
            start = self.signal.len() - self.window_size;
        }
        let end = start + self.window_size;

        let magnitudes = self
            .analyzer
            .transform_window(&self.signal.samples[start..end]);
        let anomaly = self.detector.band_exceeds(&self.frequencies, &magnitudes);

        if anomaly {
            self.fault_frame_counter += 1;
        } else {
            self.fault_frame_counter = 0;
        }
        let alert = self.alert_active();

        let frame = MonitorFrame {
            index: self.frame_index,
            start,
            t_center: self.signal.time[start + self.window_size / 2],
            magnitudes,
            anomaly,
            alert,
        };
        self.frame_index += 1;
        Some(frame)
    }

    /// Drive the monitor to the end of the signal, invoking the callback for
    /// every frame.
    pub fn run<F: FnMut(&MonitorFrame)>(&mut self, mut on_frame: F) {
        while let Some(frame) = self.step() {
            on_frame(&frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Motor;

    /// Signal with an 80 Hz fault (inside the default 70-90 Hz band) from
    /// `fault_time_s` on.
    fn fault_signal(fault_time_s: f32) -> VibrationSignal {
        Motor::new(vec![25.0]).create_vibration(5.0, 1000, 0.0, Some(&[80.0]), fault_time_s, None)
    }

    fn test_detector() -> AnomalyDetector {
        // The fault tone at amplitude 0.7 shows up near 0.35 after Hann
        // normalization, so 0.2 is a reliable band threshold
        AnomalyDetector {
            magnitude_threshold: 0.2,
            ..Default::default()
        }
    }

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            window_size_s: 0.5,
            step_samples: 100,
            alert_frames: 3,
        }
    }

    #[test]
    fn test_frame_count_and_exhaustion() {
        let signal = fault_signal(2.5);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();
        let mut frames = 0;
        while monitor.step().is_some() {
            frames += 1;
        }
        // (5000 - 500) / 100 frames
        assert_eq!(frames, 45);
        assert!(monitor.step().is_none());
    }

    #[test]
    fn test_alert_requires_consecutive_frames() {
        let signal = fault_signal(2.5);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();

        let mut first_anomaly_index = None;
        let mut first_alert_index = None;
        monitor.run(|frame| {
            if frame.anomaly && first_anomaly_index.is_none() {
                first_anomaly_index = Some(frame.index);
            }
            if frame.alert && first_alert_index.is_none() {
                first_alert_index = Some(frame.index);
            }
        });

        let first_anomaly = first_anomaly_index.expect("fault never seen");
        let first_alert = first_alert_index.expect("alert never asserted");
        // The alert lags the first anomalous frame by alert_frames - 1
        assert_eq!(first_alert, first_anomaly + 2);
    }

    #[test]
    fn test_clean_signal_never_alerts() {
        let signal = Motor::new(vec![25.0]).create_vibration(5.0, 1000, 0.0, None, 0.0, None);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();
        monitor.run(|frame| {
            assert!(!frame.anomaly);
            assert!(!frame.alert);
        });
    }

    #[test]
    fn test_one_clean_frame_clears_alert() {
        // Fault present only in the middle of the signal
        let motor = Motor::new(vec![]);
        let mut samples =
            motor
                .create_vibration(5.0, 1000, 0.0, Some(&[80.0]), 1.0, None)
                .samples;
        // Remove the tone again after t = 3 s
        let clean_tail = motor.create_vibration(5.0, 1000, 0.0, None, 0.0, None);
        samples[3000..].copy_from_slice(&clean_tail.samples[3000..]);
        let signal = VibrationSignal::new(samples, 1000);

        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();
        let mut saw_alert = false;
        let mut cleared_after_alert = false;
        monitor.run(|frame| {
            if frame.alert {
                saw_alert = true;
            } else if saw_alert && !frame.anomaly {
                cleared_after_alert = true;
            }
        });
        assert!(saw_alert);
        assert!(cleared_after_alert);
    }

    #[test]
    fn test_set_threshold_takes_effect() {
        let signal = fault_signal(0.0);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();

        // With an absurdly high threshold nothing is anomalous
        monitor.set_threshold(100.0);
        let frame = monitor.step().unwrap();
        assert!(!frame.anomaly);

        // Lowering the threshold makes the 80 Hz tone visible again
        monitor.set_threshold(0.2);
        let frame = monitor.step().unwrap();
        assert!(frame.anomaly);
    }

    #[test]
    fn test_reset_restarts_sweep() {
        let signal = fault_signal(2.5);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();
        while monitor.step().is_some() {}
        monitor.reset();
        let frame = monitor.step().expect("reset must restart the sweep");
        assert_eq!(frame.index, 0);
        assert_eq!(frame.start, 0);
    }

    #[test]
    fn test_signal_shorter_than_window() {
        let signal = Motor::new(vec![25.0]).create_vibration(0.2, 1000, 0.0, None, 0.0, None);
        let mut monitor = VibrationMonitor::new(signal, test_detector(), &test_config()).unwrap();
        assert!(monitor.step().is_none());
    }
}
