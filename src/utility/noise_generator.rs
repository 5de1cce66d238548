// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Gaussian Noise Generator
//!
//! This module provides the pseudo-random noise source used by the vibration
//! simulator. It is commonly used for:
//!
//! - Simulating measurement noise on synthetic vibration signals
//! - Testing and calibration of the spectral analysis algorithms
//! - Evaluating detector thresholds against controlled noise levels
//!
//! ## Features
//!
//! * Fast XORShift pseudo-random number generation
//! * Box-Muller transform for Gaussian distribution
//! * Deterministic sequences from an explicit seed
//! * Buffer generation with configurable standard deviation
//!
//! ## Examples
//!
//! ```rust
//! use rust_vibromon::utility::noise_generator::NoiseGenerator;
//!
//! // Create a noise generator with a fixed seed for a reproducible sequence
//! let mut generator = NoiseGenerator::new(12345);
//!
//! // Generate 1 second of noise at 1 kHz with standard deviation 0.65
//! let noise = generator.generate_gaussian(1000, 0.65);
//! assert_eq!(noise.len(), 1000);
//! ```

use std::time::SystemTime;

/// Random number generator using the XORShift algorithm for noise samples.
///
/// This struct implements a fast and lightweight pseudo-random number
/// generator based on the XORShift algorithm. It's suitable for generating
/// noise samples but should not be used for cryptographic purposes.
///
/// The generator maintains an internal state that evolves with each random
/// number generated, producing a sequence of pseudo-random values.
///
/// # Examples
///
/// ```
/// use rust_vibromon::utility::noise_generator::NoiseGenerator;
///
/// // Create a generator with a specific seed
/// let mut generator = NoiseGenerator::new(12345);
///
/// // Generate a random float between -1.0 and 1.0
/// let random_value = generator.random_float();
///
/// // Generate a random value from a Gaussian distribution
/// let gaussian_value = generator.random_gaussian();
/// ```
pub struct NoiseGenerator {
    /// Internal state of the XORShift random number generator.
    /// This value evolves with each random number generation.
    rng_state: u32,
}

impl NoiseGenerator {
    /// Creates a new noise generator with a given seed.
    ///
    /// The seed determines the initial state of the random number generator,
    /// and thus the entire sequence of random numbers that will be generated.
    /// Using the same seed will produce the same sequence of random numbers.
    ///
    /// # Arguments
    ///
    /// * `seed` - A 32-bit unsigned integer used to initialize the generator state
    pub fn new(seed: u32) -> Self {
        // XORShift must not start from an all-zero state
        let seed = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { rng_state: seed }
    }

    /// Creates a new noise generator with a seed derived from the system time.
    ///
    /// This constructor uses the current system time in milliseconds since the
    /// Unix epoch as the seed value, so each run produces a different noise
    /// pattern.
    ///
    /// # Panics
    ///
    /// Panics if the system time is before the Unix epoch (extremely unlikely)
    pub fn new_from_system_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as u32;
        Self::new(seed)
    }

    /// Generates a random floating-point number between -1.0 and 1.0.
    ///
    /// This method uses the XORShift algorithm to update the internal state
    /// and produce a pseudo-random number. The resulting 32-bit value is
    /// normalized to the range [-1.0, 1.0].
    pub fn random_float(&mut self) -> f32 {
        // XOR Shift algorithm for pseudo-random numbers
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;

        // Convert to float between -1.0 and 1.0
        (self.rng_state as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    /// Generates a random value from a standard Gaussian (normal) distribution.
    ///
    /// This method uses the Box-Muller transform to convert uniformly
    /// distributed random numbers into normally distributed random numbers.
    /// The resulting distribution has a mean of 0 and a standard deviation
    /// of 1.
    ///
    /// # Mathematical Background
    ///
    /// The Box-Muller transform converts uniform random variables to normally
    /// distributed random variables using the formula:
    /// ```text
    /// z = sqrt(-2 * ln(u1)) * cos(2 * π * u2)
    /// ```
    /// where u1 and u2 are uniform random variables in the range (0,1).
    pub fn random_gaussian(&mut self) -> f32 {
        // Use Box-Muller transform to generate gaussian distributed values
        let u1 = (self.random_float() + 1.0) / 2.0; // remap to (0,1)
        let u2 = (self.random_float() + 1.0) / 2.0;

        // Avoid ln(0)
        let u1 = if u1 < 0.0001 { 0.0001 } else { u1 };

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
    }

    /// Generates a buffer of Gaussian white noise samples.
    ///
    /// Each sample is drawn from a normal distribution with mean 0 and the
    /// given standard deviation. This is the noise term added to simulated
    /// vibration signals.
    ///
    /// # Arguments
    ///
    /// * `num_samples` - The number of samples to generate
    /// * `std_dev` - Standard deviation of the distribution
    ///
    /// # Returns
    ///
    /// A vector of f32 samples containing the generated noise
    pub fn generate_gaussian(&mut self, num_samples: usize, std_dev: f32) -> Vec<f32> {
        (0..num_samples)
            .map(|_| std_dev * self.random_gaussian())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = NoiseGenerator::new(12345);
        let mut b = NoiseGenerator::new(12345);
        for _ in 0..100 {
            assert_eq!(a.random_float(), b.random_float());
        }
    }

    #[test]
    fn test_random_float_in_range() {
        let mut generator = NoiseGenerator::new(42);
        for _ in 0..1000 {
            let v = generator.random_float();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_gaussian_buffer_statistics() {
        let mut generator = NoiseGenerator::new(7);
        let noise = generator.generate_gaussian(20000, 0.65);
        assert_eq!(noise.len(), 20000);

        let mean: f32 = noise.iter().sum::<f32>() / noise.len() as f32;
        let var: f32 =
            noise.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / noise.len() as f32;

        // Mean near 0 and standard deviation near 0.65 for a large buffer
        assert!(mean.abs() < 0.02, "mean too far from 0: {}", mean);
        assert!(
            (var.sqrt() - 0.65).abs() < 0.05,
            "std dev mismatch: {}",
            var.sqrt()
        );
    }

    #[test]
    fn test_zero_seed_does_not_stick() {
        let mut generator = NoiseGenerator::new(0);
        // An all-zero XORShift state would only ever produce the same value
        let first = generator.random_float();
        let second = generator.random_float();
        assert_ne!(first, second);
    }
}
