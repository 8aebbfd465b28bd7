// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn analyser_window_has_a_bass_bin() {
    assert!(FFT_SIZE.is_power_of_two());
    assert!(BASS_BIN < (FFT_SIZE / 2) as usize);
    assert_eq!(BYTE_NORMALIZER, 256.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn mapping_ranges_stay_bounded() {
    let max_bass = 255.0 / BYTE_NORMALIZER;
    let max_scale = PARTICLE_SCALE_BASE + PARTICLE_SCALE_GAIN * max_bass;
    let max_light = LIGHT_INTENSITY_BASE + LIGHT_INTENSITY_GAIN * max_bass;
    assert!(max_scale > PARTICLE_SCALE_BASE && max_scale < 1.8);
    assert!(max_light > LIGHT_INTENSITY_BASE && max_light < 2.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_and_orbit_limits_are_consistent() {
    assert!(CAMERA_NEAR > 0.0 && CAMERA_NEAR < CAMERA_FAR);
    assert!(ORBIT_MIN_DISTANCE < ORBIT_MAX_DISTANCE);
    let start = glam::Vec3::from(CAMERA_POSITION) - glam::Vec3::from(CAMERA_TARGET);
    assert!(start.length() > ORBIT_MIN_DISTANCE && start.length() < ORBIT_MAX_DISTANCE);
    assert!(ORBIT_DAMPING_FACTOR > 0.0 && ORBIT_DAMPING_FACTOR < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn particles_spawn_above_the_ground() {
    assert!(PARTICLE_HEIGHT_MIN > 0.0);
    assert!(PARTICLE_SPREAD_XZ > 0.0 && PARTICLE_HEIGHT_SPAN > 0.0);
    assert!(PARTICLE_OPACITY > 0.0 && PARTICLE_OPACITY <= 1.0);
}

#[test]
fn hex_colors_unpack_per_channel() {
    assert_eq!(rgb_to_f32(0x000000), [0.0, 0.0, 0.0]);
    assert_eq!(rgb_to_f32(0xffffff), [1.0, 1.0, 1.0]);
    let warm = rgb_to_f32(POINT_LIGHT_RGB);
    assert_eq!(warm[0], 1.0);
    assert!((warm[1] - 238.0 / 255.0).abs() < 1e-6);
    assert!((warm[2] - 204.0 / 255.0).abs() < 1e-6);
}
