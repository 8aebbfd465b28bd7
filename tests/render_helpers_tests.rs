// Host-side tests for renderer helpers that need no GPU device.

#![allow(dead_code)]
mod helpers {
    include!("../src/render/helpers.rs");
}

use helpers::*;

#[test]
fn scene_pass_is_multisampled() {
    // WebGPU only guarantees sample counts of 1 and 4.
    assert_eq!(MSAA_SAMPLES, 4);
}

#[test]
fn srgb_conversion_hits_the_endpoints() {
    assert_eq!(srgb_to_linear(0.0), 0.0);
    assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    assert_eq!(srgb3_to_linear([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
}

#[test]
fn srgb_midtones_darken_in_linear_space() {
    let mid = srgb_to_linear(0.5);
    assert!(mid > 0.2 && mid < 0.22, "{}", mid);
    let warm = srgb3_to_linear([1.0, 238.0 / 255.0, 204.0 / 255.0]);
    assert!(warm[0] > warm[1] && warm[1] > warm[2]);
}
