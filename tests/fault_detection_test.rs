// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibromon project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End-to-end fault detection scenarios: simulate a motor vibration signal,
//! run the windowed FFT and classify the magnitude matrix against the known
//! operating frequencies.

use rust_vibromon::detection::AnomalyDetector;
use rust_vibromon::simulation::{Motor, VibrationSignal};
use rust_vibromon::spectral::WindowedFftAnalyzer;

const NORMAL_FREQS: [f32; 2] = [25.0, 67.0];
const FAULT_FREQS: [f32; 3] = [13.0, 45.0, 89.0];

fn detect(signal: &VibrationSignal, normal_freqs: &[f32]) -> Vec<f32> {
    let mut analyzer = WindowedFftAnalyzer::new(0.5, 0.5);
    let spectrogram = analyzer.analyze(signal).unwrap();
    AnomalyDetector::default().detect_anomalies(
        &spectrogram.frequencies,
        normal_freqs,
        &spectrogram.magnitudes,
    )
}

fn contains_near(freqs: &[f32], target: f32, tolerance: f32) -> bool {
    freqs.iter().any(|&f| (f - target).abs() <= tolerance)
}

#[test]
fn test_full_scenario_reports_fault_tones_only() {
    // 5 s at 1 kHz, no noise, three fault tones appearing at 2.5 s
    let motor = Motor::new(NORMAL_FREQS.to_vec());
    let signal = motor.create_vibration(5.0, 1000, 0.0, Some(&FAULT_FREQS), 2.5, None);
    let anomalies = detect(&signal, &NORMAL_FREQS);

    for fault in FAULT_FREQS {
        assert!(
            contains_near(&anomalies, fault, 3.0),
            "fault tone {} Hz missing from {:?}",
            fault,
            anomalies
        );
    }
    for normal in NORMAL_FREQS {
        assert!(
            !contains_near(&anomalies, normal, 3.0),
            "normal tone {} Hz reported in {:?}",
            normal,
            anomalies
        );
    }
}

#[test]
fn test_windows_before_fault_onset_are_clean() {
    let motor = Motor::new(NORMAL_FREQS.to_vec());
    let signal = motor.create_vibration(5.0, 1000, 0.0, Some(&[45.0]), 2.5, None);

    // Analyze only the first 2.5 s, entirely before the fault onset
    let pre_fault = VibrationSignal::new(signal.samples[..2500].to_vec(), 1000);
    let anomalies = detect(&pre_fault, &NORMAL_FREQS);
    assert!(
        !contains_near(&anomalies, 45.0, 3.0),
        "45 Hz reported before fault onset: {:?}",
        anomalies
    );

    // The post-onset half must report it
    let post_fault = VibrationSignal::new(signal.samples[2500..].to_vec(), 1000);
    let anomalies = detect(&post_fault, &NORMAL_FREQS);
    assert!(
        contains_near(&anomalies, 45.0, 3.0),
        "45 Hz missing after fault onset: {:?}",
        anomalies
    );
}

#[test]
fn test_normal_frequency_never_reported_regardless_of_amplitude() {
    // A very loud tone at a known operating frequency stays excluded
    let samples: Vec<f32> = (0..5000)
        .map(|i| {
            let t = i as f32 / 1000.0;
            10.0 * (2.0 * std::f32::consts::PI * 25.0 * t).sin()
        })
        .collect();
    let signal = VibrationSignal::new(samples, 1000);
    let anomalies = detect(&signal, &[25.0]);
    assert!(
        !contains_near(&anomalies, 25.0, 3.0),
        "known frequency reported: {:?}",
        anomalies
    );
}

#[test]
fn test_healthy_motor_with_noise_stays_clean() {
    // Moderate noise on a healthy motor must not produce grouped detections
    // away from the operating tones
    let motor = Motor::new(NORMAL_FREQS.to_vec());
    let signal = motor.create_vibration(5.0, 1000, 0.2, None, 0.0, Some(12345));
    let anomalies = detect(&signal, &NORMAL_FREQS);
    assert!(
        anomalies.is_empty(),
        "healthy motor flagged: {:?}",
        anomalies
    );
}

#[test]
fn test_noisy_fault_still_detected() {
    // The documented demo parameters: noise 0.65, three fault tones
    let motor = Motor::new(NORMAL_FREQS.to_vec());
    let signal = motor.create_vibration(5.0, 1000, 0.65, Some(&FAULT_FREQS), 2.5, Some(7));
    let anomalies = detect(&signal, &NORMAL_FREQS);
    assert!(
        contains_near(&anomalies, 45.0, 3.0),
        "45 Hz fault lost in noise: {:?}",
        anomalies
    );
}
