// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Application configuration
//!
//! This module defines the configuration structures for the vibration
//! monitoring application. The configuration is split by concern:
//!
//! - [`SimulationConfig`]: motor vibration simulation parameters
//! - [`AnalysisConfig`]: windowed FFT parameters
//! - [`DetectionConfig`]: anomaly classification thresholds
//! - [`MonitorConfig`]: sliding-window monitor parameters
//!
//! The top-level [`Config`] is loaded from a YAML file; every field carries a
//! default so a partial (or missing) file still yields a usable
//! configuration.

mod analysis;
mod detection;
mod monitor;
mod simulation;

pub use analysis::AnalysisConfig;
pub use detection::DetectionConfig;
pub use monitor::MonitorConfig;
pub use simulation::SimulationConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the vibration monitoring application.
///
/// # Example YAML
///
/// ```yaml
/// simulation:
///   duration_s: 5.0
///   sampling_rate: 1000
///   noise_level: 0.65
///   normal_freqs: [25.0, 67.0]
///   fault_freqs: [13.0, 45.0, 89.0]
///   fault_time_s: 2.5
/// analysis:
///   window_size_s: 0.5
///   overlap: 0.5
/// detection:
///   threshold_ratio: 0.5
///   tolerance_hz: 3.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Motor vibration simulation parameters
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Windowed FFT analysis parameters
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Anomaly detection thresholds
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Sliding-window monitor parameters
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load a configuration from a YAML file.
    ///
    /// Returns the default configuration when the file does not exist, so the
    /// application can run without a config file on disk.
    ///
    /// ### Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Self = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.simulation.sampling_rate == 0 {
            anyhow::bail!("simulation.sampling_rate must be greater than 0");
        }
        if self.simulation.duration_s <= 0.0 {
            anyhow::bail!("simulation.duration_s must be greater than 0");
        }
        if !(0.0..1.0).contains(&self.analysis.overlap) {
            anyhow::bail!(
                "analysis.overlap must be in [0.0, 1.0), got {}",
                self.analysis.overlap
            );
        }
        if self.analysis.window_size_s <= 0.0 {
            anyhow::bail!("analysis.window_size_s must be greater than 0");
        }
        if self.monitor.step_samples == 0 {
            anyhow::bail!("monitor.step_samples must be greater than 0");
        }
        Ok(())
    }

    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply_args(
        &mut self,
        duration_s: Option<f32>,
        noise_level: Option<f32>,
        seed: Option<u32>,
        inject_fault: Option<bool>,
    ) {
        if let Some(duration_s) = duration_s {
            self.simulation.duration_s = duration_s;
        }
        if let Some(noise_level) = noise_level {
            self.simulation.noise_level = noise_level;
        }
        if let Some(seed) = seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(inject_fault) = inject_fault {
            self.simulation.inject_fault = inject_fault;
        }
    }
}
