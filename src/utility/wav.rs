// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! WAV file import/export for vibration signals
//!
//! Simulated vibration signals can be archived as mono 16-bit PCM WAV files
//! and analyzed later with the `analyze_wav` tool. Samples are scaled by the
//! signal's peak amplitude on write so the full i16 range is used; the scale
//! is not stored, so absolute amplitudes are not preserved across a
//! round-trip, only the spectral content.

use crate::simulation::VibrationSignal;
use anyhow::{anyhow, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::path::Path;

/// Write a vibration signal to a mono 16-bit PCM WAV file.
///
/// The signal is normalized by its peak absolute amplitude before conversion
/// to i16. An all-zero signal is written as-is.
///
/// ### Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_signal<P: AsRef<Path>>(path: P, signal: &VibrationSignal) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let peak = signal
        .samples
        .iter()
        .fold(0.0f32, |acc, s| acc.max(s.abs()));
    let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    for &sample in &signal.samples {
        let value = (sample * scale * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    info!(
        "Wrote {} samples at {} Hz to {}",
        signal.samples.len(),
        signal.sample_rate,
        path.display()
    );
    Ok(())
}

/// Read a mono WAV file back into a [`VibrationSignal`].
///
/// Multi-channel files are reduced to their first channel, matching the
/// behavior of the `analyze_wav` tool. Samples are rescaled to [-1.0, 1.0].
///
/// ### Errors
///
/// Returns an error if the file does not exist, cannot be parsed, or is not
/// 16-bit integer PCM.
pub fn read_signal<P: AsRef<Path>>(path: P) -> Result<VibrationSignal> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow!("WAV file does not exist: {}", path.display()));
    }

    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(anyhow!(
            "WAV file must be 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        ));
    }

    debug!(
        "Reading {} ({} Hz, {} channels)",
        path.display(),
        spec.sample_rate,
        spec.channels
    );

    let channels = spec.channels as usize;
    let mut samples = Vec::new();
    for (i, sample) in reader.samples::<i16>().enumerate() {
        // Take only the first channel of interleaved data
        if i % channels == 0 {
            samples.push(sample? as f32 / 32768.0);
        }
    }

    Ok(VibrationSignal::new(samples, spec.sample_rate))
}
