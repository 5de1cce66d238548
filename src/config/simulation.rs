// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Motor vibration simulation configuration
//!
//! This module defines the structure for configuring the synthetic vibration
//! signal generator.

use serde::{Deserialize, Serialize};

/// Configuration for the motor vibration simulator.
///
/// The simulated signal is a sum of unit-amplitude sine waves at each normal
/// operating frequency. When fault injection is enabled, additional tones at
/// `fault_freqs` are added from `fault_time_s` onward with a hard step onset.
/// Gaussian noise with standard deviation `noise_level` covers the whole
/// duration.
///
/// # Example
///
/// ```
/// use rust_vibromon::config::SimulationConfig;
///
/// let sim = SimulationConfig {
///     duration_s: 5.0,
///     sampling_rate: 1000,
///     noise_level: 0.65,
///     normal_freqs: vec![25.0, 67.0],
///     fault_freqs: vec![13.0, 45.0, 89.0],
///     fault_time_s: 2.5,
///     inject_fault: true,
///     seed: None,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Signal duration in seconds
    #[serde(default = "default_duration_s")]
    pub duration_s: f32,

    /// Samples per second
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,

    /// Standard deviation of the additive Gaussian noise (0.0 disables noise)
    #[serde(default = "default_noise_level")]
    pub noise_level: f32,

    /// Normal operating frequencies of the motor in Hz
    #[serde(default = "default_normal_freqs")]
    pub normal_freqs: Vec<f32>,

    /// Fault tone frequencies in Hz, added when `inject_fault` is set
    #[serde(default = "default_fault_freqs")]
    pub fault_freqs: Vec<f32>,

    /// Time at which the fault tones appear, in seconds
    #[serde(default = "default_fault_time_s")]
    pub fault_time_s: f32,

    /// Whether to add the fault tones to the generated signal
    #[serde(default = "default_inject_fault")]
    pub inject_fault: bool,

    /// Noise generator seed; `None` seeds from the system time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

fn default_duration_s() -> f32 {
    5.0
}

fn default_sampling_rate() -> u32 {
    1000 // 1000 samples per second
}

fn default_noise_level() -> f32 {
    0.65
}

fn default_normal_freqs() -> Vec<f32> {
    vec![25.0, 67.0] // Normal operation (motor vibration frequencies)
}

fn default_fault_freqs() -> Vec<f32> {
    vec![13.0, 45.0, 89.0] // Abnormal motor vibration frequencies
}

fn default_fault_time_s() -> f32 {
    2.5
}

fn default_inject_fault() -> bool {
    true
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_s: default_duration_s(),
            sampling_rate: default_sampling_rate(),
            noise_level: default_noise_level(),
            normal_freqs: default_normal_freqs(),
            fault_freqs: default_fault_freqs(),
            fault_time_s: default_fault_time_s(),
            inject_fault: default_inject_fault(),
            seed: None,
        }
    }
}
