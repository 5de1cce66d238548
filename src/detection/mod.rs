// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Anomaly Detection Module
//!
//! Classifies windowed FFT magnitude data against a motor's known operating
//! frequencies. See [`AnomalyDetector`] for the grouped classification
//! algorithm and [`snap_to_nearest`] for aligning detections with the FFT
//! bin grid.

mod detector;

pub use detector::{snap_to_nearest, AnomalyDetector};
