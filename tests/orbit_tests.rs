// Host-side tests for the damped orbit camera.

#![allow(dead_code)]
mod engine {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod orbit {
        include!("../src/core/orbit.rs");
    }
}

use engine::constants::*;
use engine::orbit::*;
use glam::Vec3;

fn default_controls() -> OrbitControls {
    OrbitControls::new(Vec3::from(CAMERA_POSITION), Vec3::from(CAMERA_TARGET))
}

#[test]
fn starts_at_the_given_eye() {
    let c = default_controls();
    assert!((c.eye() - Vec3::new(0.0, 5.0, 10.0)).length() < 1e-4);
    assert!((c.distance() - 125f32.sqrt()).abs() < 1e-4);
    assert!(c.is_settled());
}

#[test]
fn update_without_input_does_not_move() {
    let mut c = default_controls();
    let before = c.eye();
    assert!(!c.update(1.0 / 60.0));
    assert_eq!(c.eye(), before);
}

#[test]
fn wheel_up_moves_closer_and_down_moves_away() {
    let mut c = default_controls();
    let start = c.distance();
    c.dolly(-100.0);
    assert!(c.update(1.0 / 60.0));
    assert!((c.distance() - start * 0.95).abs() < 1e-4);

    c.dolly(100.0);
    c.update(1.0 / 60.0);
    assert!((c.distance() - start).abs() < 1e-3);
}

#[test]
fn distance_is_clamped() {
    let mut c = default_controls();
    for _ in 0..500 {
        c.dolly(-1000.0);
        c.update(1.0 / 60.0);
    }
    assert!((c.distance() - c.min_distance).abs() < 1e-5);

    for _ in 0..500 {
        c.dolly(1000.0);
        c.update(1.0 / 60.0);
    }
    assert!((c.distance() - c.max_distance).abs() < 1e-3);
}

#[test]
fn polar_angle_never_flips_over_the_pole() {
    let mut c = default_controls();
    c.enable_damping = false;
    c.rotate(0.0, 100_000.0, 600.0);
    c.update(1.0 / 60.0);
    assert!(c.polar_angle() >= ORBIT_POLAR_EPSILON);
    assert!(c.eye().y > 0.0);

    c.rotate(0.0, -100_000.0, 600.0);
    c.update(1.0 / 60.0);
    assert!(c.polar_angle() <= std::f32::consts::PI - ORBIT_POLAR_EPSILON);
    assert!(c.eye().y < 0.0);
}

#[test]
fn damping_spreads_a_drag_over_frames_and_settles() {
    let mut c = default_controls();
    let start = c.azimuth_angle();
    c.rotate(100.0, 0.0, 800.0);
    let expected = -std::f32::consts::TAU * 100.0 / 800.0;

    c.update(1.0 / 60.0);
    let first = c.azimuth_angle() - start;
    assert!((first - expected * ORBIT_DAMPING_FACTOR).abs() < 1e-4);
    assert!(!c.is_settled());

    for _ in 0..1200 {
        c.update(1.0 / 60.0);
    }
    assert!(c.is_settled());
    assert!((c.azimuth_angle() - start - expected).abs() < 1e-4);
}

#[test]
fn damping_is_frame_rate_independent() {
    let mut fast = default_controls();
    let mut slow = default_controls();
    fast.rotate(50.0, 20.0, 800.0);
    slow.rotate(50.0, 20.0, 800.0);
    for _ in 0..4 {
        fast.update(1.0 / 120.0);
    }
    for _ in 0..2 {
        slow.update(1.0 / 60.0);
    }
    assert!((fast.azimuth_angle() - slow.azimuth_angle()).abs() < 1e-5);
    assert!((fast.polar_angle() - slow.polar_angle()).abs() < 1e-5);
}

#[test]
fn disabled_damping_applies_input_at_once() {
    let mut c = default_controls();
    c.enable_damping = false;
    c.rotate(-200.0, 0.0, 800.0);
    c.update(0.0);
    assert!(c.is_settled());
    assert!((c.azimuth_angle() - std::f32::consts::TAU * 0.25).abs() < 1e-5);
}

#[test]
fn target_stays_fixed_while_orbiting() {
    let mut c = default_controls();
    c.rotate(300.0, 40.0, 800.0);
    for _ in 0..120 {
        c.update(1.0 / 60.0);
        assert!((c.eye() - c.target).length() - c.distance() < 1e-3);
    }
    assert_eq!(c.target, Vec3::ZERO);
}

#[test]
fn non_finite_wheel_is_ignored() {
    let mut c = default_controls();
    c.dolly(f32::NAN);
    c.dolly(f32::INFINITY);
    assert!(c.is_settled());
}
