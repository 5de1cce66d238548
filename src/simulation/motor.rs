// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Motor vibration signal generator

use crate::config::SimulationConfig;
use crate::utility::NoiseGenerator;
use log::debug;
use std::f32::consts::PI;

/// Amplitude of injected fault tones relative to the unit-amplitude normal
/// tones.
pub const FAULT_AMPLITUDE: f32 = 0.7;

/// A time-domain vibration signal paired with its sampling parameters.
///
/// The time axis starts at 0 and satisfies `time[i] = i / sample_rate`. The
/// structure is treated as immutable once generated; analysis operations
/// borrow it and never modify it.
#[derive(Debug, Clone)]
pub struct VibrationSignal {
    /// Time axis in seconds, same length as `samples`
    pub time: Vec<f32>,

    /// Amplitude samples
    pub samples: Vec<f32>,

    /// Samples per second
    pub sample_rate: u32,
}

impl VibrationSignal {
    /// Build a signal from raw samples, deriving the time axis from the
    /// sampling rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let time = (0..samples.len())
            .map(|i| i as f32 / sample_rate as f32)
            .collect();
        Self {
            time,
            samples,
            sample_rate,
        }
    }

    /// Number of samples in the signal.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the signal contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the signal in seconds.
    pub fn duration_s(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Simulates motor vibrations with normal and faulty components.
///
/// A motor is described by the set of frequencies it vibrates at during
/// normal operation. Fault tones can be injected partway through a simulated
/// signal to exercise the anomaly detection chain.
///
/// # Example
///
/// ```
/// use rust_vibromon::simulation::Motor;
///
/// let motor = Motor::new(vec![25.0, 67.0]);
/// assert_eq!(motor.min_freq(), Some(25.0));
///
/// // 5 s at 1 kHz, no noise, 45 Hz fault from 2.5 s on
/// let signal = motor.create_vibration(5.0, 1000, 0.0, Some(&[45.0]), 2.5, None);
/// assert_eq!(signal.len(), 5000);
/// ```
#[derive(Debug, Clone)]
pub struct Motor {
    /// Normal operating frequencies in Hz
    freqs: Vec<f32>,
}

impl Motor {
    /// Create a motor with the given normal operating frequencies.
    pub fn new(freqs: Vec<f32>) -> Self {
        Self { freqs }
    }

    /// Create a motor from the simulation configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.normal_freqs.clone())
    }

    /// The normal operating frequencies.
    pub fn freqs(&self) -> &[f32] {
        &self.freqs
    }

    /// Lowest normal operating frequency, `None` for a motor with no tones.
    pub fn min_freq(&self) -> Option<f32> {
        self.freqs.iter().copied().min_by(f32::total_cmp)
    }

    /// Highest normal operating frequency, `None` for a motor with no tones.
    pub fn max_freq(&self) -> Option<f32> {
        self.freqs.iter().copied().max_by(f32::total_cmp)
    }

    /// Simulate a motor vibration signal with normal and faulty components
    /// and added noise.
    ///
    /// The output has exactly `floor(duration_s * sampling_rate)` samples on
    /// a time axis starting at 0 (endpoint excluded).
    ///
    /// ### Parameters
    ///
    /// * `duration_s` - Signal duration in seconds
    /// * `sampling_rate` - Samples per second
    /// * `noise_level` - Standard deviation of the additive Gaussian noise;
    ///   0.0 adds no noise term at all
    /// * `fault_freqs` - Fault tones to inject, or `None` for a healthy motor
    /// * `fault_time_s` - Time at which the fault tones appear. Before this
    ///   time their contribution is exactly zero (hard step onset, no ramp)
    /// * `seed` - Noise generator seed; `None` seeds from the system time
    pub fn create_vibration(
        &self,
        duration_s: f32,
        sampling_rate: u32,
        noise_level: f32,
        fault_freqs: Option<&[f32]>,
        fault_time_s: f32,
        seed: Option<u32>,
    ) -> VibrationSignal {
        let num_samples = (duration_s * sampling_rate as f32) as usize;
        let time: Vec<f32> = (0..num_samples)
            .map(|i| i as f32 / sampling_rate as f32)
            .collect();

        // Normal vibrations: sum of unit-amplitude sines
        let mut samples: Vec<f32> = time
            .iter()
            .map(|&t| self.freqs.iter().map(|&f| (2.0 * PI * f * t).sin()).sum())
            .collect();

        // Fault tones, gated by a binary time mask: zero before fault_time_s,
        // full amplitude from fault_time_s on
        if let Some(fault_freqs) = fault_freqs {
            debug!(
                "Injecting fault tones {:?} Hz at t = {} s",
                fault_freqs, fault_time_s
            );
            for (i, &t) in time.iter().enumerate() {
                if t >= fault_time_s {
                    for &ff in fault_freqs {
                        samples[i] += FAULT_AMPLITUDE * (2.0 * PI * ff * t).sin();
                    }
                }
            }
        }

        // Noise covers the whole duration; a zero level must not inject a
        // spurious near-zero noise term
        if noise_level > 0.0 {
            let mut generator = match seed {
                Some(seed) => NoiseGenerator::new(seed),
                None => NoiseGenerator::new_from_system_time(),
            };
            let noise = generator.generate_gaussian(num_samples, noise_level);
            for (sample, n) in samples.iter_mut().zip(noise) {
                *sample += n;
            }
        }

        VibrationSignal {
            time,
            samples,
            sample_rate: sampling_rate,
        }
    }

    /// Simulate a vibration signal with the parameters of a
    /// [`SimulationConfig`].
    ///
    /// Fault tones are injected only when `config.inject_fault` is set.
    pub fn simulate(&self, config: &SimulationConfig) -> VibrationSignal {
        let fault_freqs = if config.inject_fault {
            Some(config.fault_freqs.as_slice())
        } else {
            None
        };
        self.create_vibration(
            config.duration_s,
            config.sampling_rate,
            config.noise_level,
            fault_freqs,
            config.fault_time_s,
            config.seed,
        )
    }
}
