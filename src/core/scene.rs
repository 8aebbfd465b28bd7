// Scene graph context: camera, lights, particle cloud and the model slot.
//
// Everything lives in one [`Scene`] value that the frame loop owns; there are
// no global singletons. The model slot is the only piece shared with an
// asynchronous task (the asset load) and is a plain `Rc<RefCell<_>>` since a
// single thread touches it.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use rand::prelude::*;

use super::config::SceneConfig;
use super::constants::{
    rgb_to_f32, AMBIENT_INTENSITY, AMBIENT_RGB, BACKGROUND_RGB, CAMERA_FAR, CAMERA_FOV_DEG,
    CAMERA_NEAR, CAMERA_POSITION, CAMERA_TARGET, MODEL_SCALE, PARTICLE_HEIGHT_MIN,
    PARTICLE_HEIGHT_SPAN, PARTICLE_OPACITY, PARTICLE_RGB, PARTICLE_SIZE, PARTICLE_SPREAD_XZ,
    POINT_LIGHT_INTENSITY, POINT_LIGHT_POSITION, POINT_LIGHT_RGB,
};
use super::model::Model;
use super::signal::VisualParams;

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from(CAMERA_POSITION),
            target: Vec3::from(CAMERA_TARGET),
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = sanitize_aspect(width as f32 / height.max(1) as f32);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

/// Point cloud with a single uniform scale about the origin.
#[derive(Clone, Debug)]
pub struct ParticleCloud {
    pub positions: Vec<Vec3>,
    pub scale: Vec3,
    pub size: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}

impl ParticleCloud {
    /// Scatter `count` points over the ground area above the tree.
    pub fn scatter(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD_XZ,
                    rng.gen::<f32>() * PARTICLE_HEIGHT_SPAN + PARTICLE_HEIGHT_MIN,
                    (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD_XZ,
                )
            })
            .collect();
        Self {
            positions,
            scale: Vec3::ONE,
            size: PARTICLE_SIZE,
            color: rgb_to_f32(PARTICLE_RGB),
            opacity: PARTICLE_OPACITY,
        }
    }

    #[inline]
    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Default)]
struct SlotState {
    model: Option<Rc<Model>>,
    generation: u64,
}

/// Optional model filled at most once by the asynchronous asset load.
///
/// Cloning yields another handle to the same slot.
#[derive(Clone, Default)]
pub struct ModelSlot {
    inner: Rc<RefCell<SlotState>>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the model. Returns false (and keeps the first model) if the
    /// slot was already filled.
    pub fn fill(&self, model: Model) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.model.is_some() {
            log::warn!("model slot already filled; ignoring second model");
            return false;
        }
        state.model = Some(Rc::new(model));
        state.generation += 1;
        true
    }

    pub fn is_filled(&self) -> bool {
        self.inner.borrow().model.is_some()
    }

    pub fn get(&self) -> Option<Rc<Model>> {
        self.inner.borrow().model.clone()
    }

    /// Bumped once when the slot is filled; renderers compare it against the
    /// generation they last uploaded.
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }
}

impl std::fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("ModelSlot")
            .field("filled", &state.model.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub background: [f32; 3],
    pub camera: PerspectiveCamera,
    pub ambient: AmbientLight,
    pub point_light: PointLight,
    pub particles: ParticleCloud,
    pub model: ModelSlot,
    pub model_scale: f32,
}

impl Scene {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        Self {
            background: rgb_to_f32(BACKGROUND_RGB),
            camera: PerspectiveCamera::new(aspect),
            ambient: AmbientLight {
                color: rgb_to_f32(AMBIENT_RGB),
                intensity: AMBIENT_INTENSITY,
            },
            point_light: PointLight {
                color: rgb_to_f32(POINT_LIGHT_RGB),
                intensity: POINT_LIGHT_INTENSITY,
                position: Vec3::from(POINT_LIGHT_POSITION),
            },
            particles: ParticleCloud::scatter(config.particle_count, config.particle_seed),
            model: ModelSlot::new(),
            model_scale: MODEL_SCALE,
        }
    }

    /// Push one frame's visual parameters onto the scene objects.
    pub fn apply(&mut self, params: &VisualParams) {
        self.particles.set_uniform_scale(params.particle_scale);
        self.point_light.intensity = params.light_intensity;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.model_scale))
    }
}
