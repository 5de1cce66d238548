// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # WAV Vibration Analyzer
//!
//! A command-line tool to run the windowed FFT anomaly detection over a
//! recorded vibration signal stored as a WAV file. Useful for analyzing
//! signals archived with `vibromon --save-wav` or captured from real
//! sensors.

use clap::Parser;
use std::path::{Path, PathBuf};

use rust_vibromon::detection::AnomalyDetector;
use rust_vibromon::simulation::VibrationSignal;
use rust_vibromon::spectral::{Filter, FrequencyThresholdFilter, WindowedFftAnalyzer};
use rust_vibromon::utility::wav;

#[derive(Parser)]
#[command(name = "analyze_wav")]
#[command(about = "Detect anomalous frequencies in a WAV vibration recording")]
struct Args {
    /// Input WAV file to analyze
    #[arg(value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Known normal operating frequencies in Hz
    #[arg(short, long, value_delimiter = ',', default_values_t = vec![25.0, 67.0])]
    normal_freqs: Vec<f32>,

    /// Window size in seconds
    #[arg(long, default_value_t = 0.5)]
    window_size_s: f32,

    /// Fractional overlap between windows
    #[arg(long, default_value_t = 0.5)]
    overlap: f32,

    /// Minimum normalized magnitude to keep inside each window
    #[arg(long, default_value_t = 0.0)]
    magnitude_threshold: f32,

    /// Denoise the whole signal before analysis: suppress frequency
    /// components below this normalized magnitude
    #[arg(long)]
    denoise: Option<f32>,

    /// Relative strong-bin threshold for the detection
    #[arg(long, default_value_t = 0.5)]
    threshold_ratio: f32,

    /// Hz distance to normal frequencies to ignore
    #[arg(long, default_value_t = 3.0)]
    tolerance: f32,

    /// Hz distance for merging nearby strong bins
    #[arg(long, default_value_t = 3.0)]
    group_distance: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Check if input file exists
    if !Path::new(&args.input).exists() {
        eprintln!("Error: Input file '{}' does not exist", args.input.display());
        std::process::exit(1);
    }

    println!("Analyzing vibration recording: {}", args.input.display());
    println!("Normal frequencies: {:?} Hz", args.normal_freqs);
    println!("Window size: {} s, overlap: {}", args.window_size_s, args.overlap);
    println!();

    let mut signal = wav::read_signal(&args.input)?;
    println!("WAV file information:");
    println!("  Sample rate: {} Hz", signal.sample_rate);
    println!("  Duration: {:.2} seconds", signal.duration_s());
    println!("  Total samples: {}", signal.len());
    println!();

    if let Some(threshold) = args.denoise {
        let filter = FrequencyThresholdFilter::new(threshold);
        let sample_rate = signal.sample_rate;
        signal = VibrationSignal::new(filter.apply(&signal.samples), sample_rate);
        println!("Denoised signal with magnitude threshold {}", threshold);
        println!();
    }

    let mut analyzer = WindowedFftAnalyzer::new(args.window_size_s, args.overlap);
    if args.magnitude_threshold > 0.0 {
        analyzer = analyzer.with_magnitude_threshold(args.magnitude_threshold);
    }
    let spectrogram = analyzer.analyze(&signal)?;

    if spectrogram.n_windows() == 0 {
        println!("Signal is shorter than one analysis window; nothing to analyze.");
        return Ok(());
    }

    let freq_resolution = spectrogram.frequencies[1] - spectrogram.frequencies[0];
    println!("Analysis:");
    println!("  Windows: {}", spectrogram.n_windows());
    println!("  Frequency bins: {}", spectrogram.n_bins());
    println!("  Frequency resolution: {:.2} Hz", freq_resolution);

    let detector = AnomalyDetector {
        threshold_ratio: args.threshold_ratio,
        tolerance: args.tolerance,
        group_distance: args.group_distance,
        ..Default::default()
    };
    let anomalies = detector.detect_anomalies(
        &spectrogram.frequencies,
        &args.normal_freqs,
        &spectrogram.magnitudes,
    );

    println!();
    if anomalies.is_empty() {
        println!("No anomalous frequencies detected.");
    } else {
        println!("Anomalous frequencies detected:");
        for freq in &anomalies {
            println!("  {:.1} Hz", freq);
        }
    }

    Ok(())
}
