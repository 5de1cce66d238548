// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Motor Vibration Anomaly Detection
//!
//! This crate analyzes motor vibration signals in the frequency domain to flag
//! unexpected frequency components. It provides:
//!
//! - A vibration signal simulator with configurable normal and fault tones
//!   ([`simulation`])
//! - Windowed, overlapping FFT spectral analysis with Hann tapering
//!   ([`spectral`])
//! - Anomaly classification with peak grouping and known-frequency exclusion
//!   ([`detection`])
//! - A sliding-window monitor for interactive threshold tuning ([`monitor`])
//!
//! The processing chain is batch-oriented and synchronous: a signal buffer is
//! generated (or loaded from a WAV file), transformed into a per-window
//! magnitude matrix, and classified against a set of known operating
//! frequencies. All operations are deterministic given their inputs; the
//! simulator's noise generator is explicitly seedable for reproducible runs.
//!
//! # Example
//!
//! ```
//! use rust_vibromon::detection::AnomalyDetector;
//! use rust_vibromon::simulation::Motor;
//! use rust_vibromon::spectral::WindowedFftAnalyzer;
//!
//! // Simulate a motor running at 25 Hz and 67 Hz with a 45 Hz fault
//! // appearing at t = 2.5 s, without noise.
//! let motor = Motor::new(vec![25.0, 67.0]);
//! let signal = motor
//!     .create_vibration(5.0, 1000, 0.0, Some(&[45.0]), 2.5, None);
//!
//! // Windowed FFT: 0.5 s windows with 50% overlap
//! let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
//! let spectrogram = analyzer.analyze(&signal).unwrap();
//!
//! // Classify against the known operating frequencies
//! let detector = AnomalyDetector::default();
//! let anomalies = detector.detect_anomalies(
//!     &spectrogram.frequencies,
//!     &[25.0, 67.0],
//!     &spectrogram.magnitudes,
//! );
//! assert!(anomalies.iter().any(|f| (f - 45.0).abs() <= 3.0));
//! ```

pub mod config;
pub mod detection;
pub mod monitor;
pub mod simulation;
pub mod spectral;
pub mod utility;
