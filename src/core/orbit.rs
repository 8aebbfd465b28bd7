// Damped orbit camera controls.
//
// Pointer drags and wheel steps accumulate pending spherical deltas; `update`
// folds a damped fraction of them into the camera each frame so motion
// carries on briefly after the pointer stops.

use glam::Vec3;

use super::constants::{
    ORBIT_DAMPING_FACTOR, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_POLAR_EPSILON,
    ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP, REFERENCE_FRAME_RATE,
};

const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    radius: f32,
    theta: f32, // azimuth around +Y, 0 looks down -Z from +Z
    phi: f32,   // polar angle from +Y
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let mut controls = Self {
            target,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: ORBIT_ROTATE_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            radius: 1.0,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        };
        controls.look_from(eye);
        controls
    }

    /// Reset the spherical position so that the camera sits at `eye`.
    pub fn look_from(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        self.radius = radius.clamp(self.min_distance, self.max_distance);
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        self.clamp_phi();
    }

    /// Queue a rotation from a pointer drag measured in pixels.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_height_px: f32) {
        let h = viewport_height_px.max(1.0);
        let tau = std::f32::consts::TAU;
        self.pending_theta -= tau * dx_px / h * self.rotate_speed;
        self.pending_phi -= tau * dy_px / h * self.rotate_speed;
    }

    /// Queue a zoom from a wheel delta; negative moves closer.
    pub fn dolly(&mut self, wheel_delta_y: f32) {
        if wheel_delta_y == 0.0 || !wheel_delta_y.is_finite() {
            return;
        }
        let step = ORBIT_ZOOM_STEP.powf(wheel_delta_y.abs() / 100.0);
        if wheel_delta_y < 0.0 {
            self.pending_scale *= step;
        } else {
            self.pending_scale /= step;
        }
    }

    /// Fold pending input into the camera. Returns true if the camera moved.
    pub fn update(&mut self, dt_sec: f32) -> bool {
        let frames = (dt_sec.max(0.0) * REFERENCE_FRAME_RATE).min(REFERENCE_FRAME_RATE);
        let applied = if self.enable_damping {
            1.0 - (1.0 - self.damping_factor.clamp(0.0, 1.0)).powf(frames)
        } else {
            1.0
        };

        let d_theta = self.pending_theta * applied;
        let d_phi = self.pending_phi * applied;
        self.theta += d_theta;
        self.phi += d_phi;
        self.pending_theta -= d_theta;
        self.pending_phi -= d_phi;
        if self.pending_theta.abs() < SETTLE_EPSILON {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_EPSILON {
            self.pending_phi = 0.0;
        }
        self.clamp_phi();

        let old_radius = self.radius;
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        d_theta.abs() > SETTLE_EPSILON
            || d_phi.abs() > SETTLE_EPSILON
            || (self.radius - old_radius).abs() > SETTLE_EPSILON
    }

    pub fn is_settled(&self) -> bool {
        self.pending_theta == 0.0 && self.pending_phi == 0.0 && self.pending_scale == 1.0
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + Vec3::new(
                self.radius * sin_phi * sin_theta,
                self.radius * cos_phi,
                self.radius * sin_phi * cos_theta,
            )
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    #[inline]
    pub fn azimuth_angle(&self) -> f32 {
        self.theta
    }

    fn clamp_phi(&mut self) {
        let eps = ORBIT_POLAR_EPSILON;
        self.phi = self.phi.clamp(eps, std::f32::consts::PI - eps);
    }
}
