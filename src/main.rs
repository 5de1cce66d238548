// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the motor vibration anomaly detector

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use rust_vibromon::config::Config;
use rust_vibromon::detection::{snap_to_nearest, AnomalyDetector};
use rust_vibromon::monitor::VibrationMonitor;
use rust_vibromon::simulation::Motor;
use rust_vibromon::spectral::WindowedFftAnalyzer;
use rust_vibromon::utility::wav;

/// Motor vibration anomaly detector using FFT spectral analysis
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Signal duration in seconds
    #[arg(long)]
    duration: Option<f32>,

    /// Standard deviation of the simulated measurement noise
    #[arg(long)]
    noise_level: Option<f32>,

    /// Noise generator seed for reproducible runs
    #[arg(long)]
    seed: Option<u32>,

    /// Whether to inject the configured fault tones
    #[arg(long)]
    inject_fault: Option<bool>,

    /// Output file for detection results (JSON)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save the simulated signal to a WAV file
    #[arg(long)]
    save_wav: Option<PathBuf>,

    /// Run the sliding-window monitor sweep after the batch analysis
    #[arg(long, default_value_t = false)]
    monitor: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Detection results written by `--output`.
#[derive(Debug, serde::Serialize)]
struct DetectionReport {
    /// Normal operating frequencies the detection was run against
    normal_freqs: Vec<f32>,

    /// Grouped anomaly frequencies in Hz
    anomaly_freqs: Vec<f32>,

    /// Anomaly frequencies snapped to the FFT bin grid
    snapped_freqs: Vec<f32>,

    /// Center timestamps of the analysis windows in seconds
    window_times: Vec<f32>,

    /// Frequency resolution of the analysis in Hz
    frequency_resolution: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // Validate configuration file if --validate-config is set
    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }
        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    // Load configuration and apply command line overrides
    let mut config = Config::from_file(&args.config)?;
    config.apply_args(args.duration, args.noise_level, args.seed, args.inject_fault);
    config.validate()?;

    // Simulate the motor vibration signal
    let motor = Motor::from_config(&config.simulation);
    if let (Some(lo), Some(hi)) = (motor.min_freq(), motor.max_freq()) {
        info!("Motor operating band: {:.1} - {:.1} Hz", lo, hi);
    }
    let signal = motor.simulate(&config.simulation);
    info!(
        "Simulated {:.1} s of vibration at {} Hz ({} samples, fault injection {})",
        signal.duration_s(),
        signal.sample_rate,
        signal.len(),
        if config.simulation.inject_fault {
            "on"
        } else {
            "off"
        }
    );

    if let Some(wav_path) = &args.save_wav {
        wav::write_signal(wav_path, &signal)?;
    }

    // Windowed FFT over the full signal
    let mut analyzer = WindowedFftAnalyzer::from_config(&config.analysis);
    let spectrogram = analyzer.analyze(&signal)?;
    if spectrogram.n_windows() == 0 {
        warn!("Signal shorter than one analysis window; nothing to detect");
        return Ok(());
    }

    // Anomaly detection against the known operating frequencies
    let detector = AnomalyDetector::from_config(&config.detection);
    let anomaly_freqs = detector.detect_anomalies(
        &spectrogram.frequencies,
        &config.simulation.normal_freqs,
        &spectrogram.magnitudes,
    );
    let snapped_freqs = snap_to_nearest(
        &spectrogram.frequencies,
        &anomaly_freqs,
        config.detection.tolerance_hz,
    );

    if anomaly_freqs.is_empty() {
        println!("No anomalous frequencies detected.");
    } else {
        println!("Detected anomalous frequencies (Hz): {:?}", anomaly_freqs);
    }

    // Per-window report: which snapped anomaly bins are active in each window
    println!("Detected frequencies (Hz) at times (s):");
    for (i, t_center) in spectrogram.times.iter().enumerate() {
        print!("Time {:.2} s:", t_center);
        let mut any = false;
        for &freq in &snapped_freqs {
            if let Some(j) = spectrogram
                .frequencies
                .iter()
                .position(|&f| (f - freq).abs() < 1e-2)
            {
                if spectrogram.magnitudes[[i, j]] > config.analysis.magnitude_threshold {
                    print!(" **Anomaly at {} Hz**", freq);
                    any = true;
                }
            }
        }
        if !any {
            print!(" -");
        }
        println!();
    }

    if let Some(output_path) = &args.output {
        let report = DetectionReport {
            normal_freqs: config.simulation.normal_freqs.clone(),
            anomaly_freqs: anomaly_freqs.clone(),
            snapped_freqs,
            window_times: spectrogram.times.clone(),
            frequency_resolution: spectrogram.frequencies.get(1).copied().unwrap_or(0.0),
        };
        let file = std::fs::File::create(output_path)?;
        serde_json::to_writer_pretty(file, &report)?;
        info!("Wrote detection report to {}", output_path.display());
    }

    // Optional sliding-window monitor sweep
    if args.monitor {
        let mut monitor = VibrationMonitor::new(signal, detector, &config.monitor)?;
        let mut was_alert = false;
        monitor.run(|frame| {
            if frame.alert && !was_alert {
                warn!("FAULT DETECTED at t = {:.2} s", frame.t_center);
            } else if !frame.alert && was_alert {
                info!("Fault cleared at t = {:.2} s", frame.t_center);
            }
            was_alert = frame.alert;
        });
    }

    Ok(())
}
