// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Spectral Analysis Module
//!
//! This module provides tools for analyzing vibration signals in the
//! frequency domain using Fast Fourier Transform (FFT) processing:
//!
//! - [`fft::WindowedFftAnalyzer`] slides an overlapping Hann-tapered window
//!   across a signal and yields a per-window magnitude matrix
//! - [`filter::FrequencyThresholdFilter`] removes weak frequency components
//!   from a full signal as a standalone denoising pass
//!
//! ## Usage
//!
//! ```
//! use rust_vibromon::simulation::Motor;
//! use rust_vibromon::spectral::WindowedFftAnalyzer;
//!
//! let signal = Motor::new(vec![25.0, 67.0]).create_vibration(5.0, 1000, 0.0, None, 0.0, None);
//! let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
//! let spectrogram = analyzer.analyze(&signal).unwrap();
//! println!(
//!     "Frequency resolution: {:.2} Hz",
//!     spectrogram.frequencies[1] - spectrogram.frequencies[0]
//! );
//! ```

pub mod fft;
pub mod filter;

// Re-export key types for public use at the top level
pub use fft::{frequency_bins, SpectralError, Spectrogram, WindowFunction, WindowedFftAnalyzer};
pub use filter::{Filter, FrequencyThresholdFilter};
