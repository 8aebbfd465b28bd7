// Host-side tests for the bass signal and the visual parameters derived from it.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod engine {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod signal {
        include!("../src/core/signal.rs");
    }
}

use engine::constants::*;
use engine::signal::*;

fn snapshot_with_bass(value: u8) -> AmplitudeSnapshot {
    let mut s = AmplitudeSnapshot::for_fft_size(FFT_SIZE);
    s.bins_mut()[BASS_BIN] = value;
    s
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn snapshot_has_half_fft_size_bins() {
    let s = AmplitudeSnapshot::for_fft_size(FFT_SIZE);
    assert_eq!(s.len(), 128);
    assert!(s.bins().iter().all(|&b| b == 0));
}

#[test]
fn bass_reads_only_the_bass_bin() {
    let mut s = AmplitudeSnapshot::for_fft_size(FFT_SIZE);
    s.bins_mut()[0] = 255;
    s.bins_mut()[2] = 255;
    assert_eq!(bass_signal(&s), 0.0);

    s.bins_mut()[BASS_BIN] = 128;
    assert_eq!(bass_signal(&s), 0.5);
}

#[test]
fn bass_stays_below_one() {
    for value in 0..=255u8 {
        let bass = bass_signal(&snapshot_with_bass(value));
        assert!((0.0..1.0).contains(&bass), "bass {} out of range", bass);
    }
    assert_eq!(bass_signal(&snapshot_with_bass(255)), 255.0 / 256.0);
}

#[test]
fn missing_bass_bin_reads_as_silence() {
    let s = AmplitudeSnapshot::with_bins(1);
    assert_eq!(bass_signal(&s), 0.0);
    assert!(AmplitudeSnapshot::with_bins(0).is_empty());
    assert_eq!(bass_signal(&AmplitudeSnapshot::with_bins(0)), 0.0);
}

#[test]
fn silence_gives_resting_params() {
    let params = VisualParams::from_snapshot(&snapshot_with_bass(0));
    assert_eq!(params.particle_scale, 1.0);
    assert!(approx(params.light_intensity, 0.8));
    assert_eq!(params, VisualParams::default());
}

#[test]
fn half_bass_maps_to_documented_values() {
    let params = VisualParams::from_snapshot(&snapshot_with_bass(128));
    assert!(approx(params.particle_scale, 1.4));
    assert!(approx(params.light_intensity, 1.4));
}

#[test]
fn full_bass_peaks_below_the_gain_ceiling() {
    let params = VisualParams::from_snapshot(&snapshot_with_bass(255));
    assert!(approx(params.particle_scale, 1.0 + 0.8 * 255.0 / 256.0));
    assert!(approx(params.light_intensity, 0.8 + 1.2 * 255.0 / 256.0));
    assert!(params.particle_scale < 1.8);
    assert!(params.light_intensity < 2.0);
}

#[test]
fn params_are_monotonic_in_bass() {
    let mut prev = VisualParams::from_bass(0.0);
    for value in 1..=255u8 {
        let next = VisualParams::from_snapshot(&snapshot_with_bass(value));
        assert!(next.particle_scale > prev.particle_scale);
        assert!(next.light_intensity > prev.light_intensity);
        prev = next;
    }
}

#[test]
fn same_snapshot_gives_same_params() {
    let s = snapshot_with_bass(77);
    assert_eq!(VisualParams::from_snapshot(&s), VisualParams::from_snapshot(&s));
}

#[test]
fn silence_source_clears_previous_values() {
    let mut s = snapshot_with_bass(200);
    Silence.fill(&mut s);
    assert_eq!(s.len(), 128);
    assert!(s.bins().iter().all(|&b| b == 0));
}
