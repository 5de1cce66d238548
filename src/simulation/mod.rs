// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Vibration Signal Simulation
//!
//! This module generates synthetic motor vibration signals for testing and
//! demonstration. A [`Motor`] is described by its normal operating
//! frequencies; [`Motor::create_vibration`] produces a time-domain signal
//! composed of:
//!
//! - unit-amplitude sine waves at each normal frequency,
//! - optional fault tones appearing at a configurable time with a hard step
//!   onset,
//! - optional additive Gaussian noise.
//!
//! The produced [`VibrationSignal`] pairs the sample buffer with its sampling
//! rate and time axis and is immutable once generated.

mod motor;

pub use motor::{Motor, VibrationSignal, FAULT_AMPLITUDE};
