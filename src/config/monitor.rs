// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sliding-window monitor configuration

use serde::{Deserialize, Serialize};

/// Configuration for the real-time vibration monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Analysis window size in seconds
    #[serde(default = "default_window_size_s")]
    pub window_size_s: f32,

    /// Samples the window advances per frame
    #[serde(default = "default_step_samples")]
    pub step_samples: usize,

    /// Consecutive anomalous frames required before the alert state asserts
    #[serde(default = "default_alert_frames")]
    pub alert_frames: u32,
}

fn default_window_size_s() -> f32 {
    0.5
}

fn default_step_samples() -> usize {
    20
}

fn default_alert_frames() -> u32 {
    3
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_size_s: default_window_size_s(),
            step_samples: default_step_samples(),
            alert_frames: default_alert_frames(),
        }
    }
}
