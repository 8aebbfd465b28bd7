// Shared tuning constants for the audio-reactive scene.

// Frequency analysis
pub const FFT_SIZE: u32 = 256; // analyser window; yields FFT_SIZE / 2 bins
pub const BASS_BIN: usize = 1; // low-frequency bin that drives the visuals
pub const BYTE_NORMALIZER: f32 = 256.0; // byte magnitudes map to [0, 255/256]

// Bass -> visual parameter mapping
pub const PARTICLE_SCALE_BASE: f32 = 1.0;
pub const PARTICLE_SCALE_GAIN: f32 = 0.8;
pub const LIGHT_INTENSITY_BASE: f32 = 0.8;
pub const LIGHT_INTENSITY_GAIN: f32 = 1.2;

// Scene
pub const BACKGROUND_RGB: u32 = 0x000000;
pub const MODEL_SCALE: f32 = 1.3;

// Particle cloud
pub const PARTICLE_COUNT: usize = 2000;
pub const PARTICLE_SPREAD_XZ: f32 = 30.0; // x and z span centred on the origin
pub const PARTICLE_HEIGHT_MIN: f32 = 2.0;
pub const PARTICLE_HEIGHT_SPAN: f32 = 10.0;
pub const PARTICLE_SIZE: f32 = 0.15;
pub const PARTICLE_RGB: u32 = 0xffffff;
pub const PARTICLE_OPACITY: f32 = 0.75;
pub const PARTICLE_SEED: u64 = 0x7EE5_EED5;

// Lights
pub const AMBIENT_RGB: u32 = 0xffffff;
pub const AMBIENT_INTENSITY: f32 = 0.4;
pub const POINT_LIGHT_RGB: u32 = 0xffeecc;
pub const POINT_LIGHT_INTENSITY: f32 = 1.0; // until the first frame overrides it
pub const POINT_LIGHT_POSITION: [f32; 3] = [5.0, 8.0, 5.0];

// Camera
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_POSITION: [f32; 3] = [0.0, 5.0, 10.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

// Orbit controls
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05; // fraction applied per 60 Hz frame
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // per 100 wheel units
pub const ORBIT_MIN_DISTANCE: f32 = 0.5;
pub const ORBIT_MAX_DISTANCE: f32 = 500.0;
pub const ORBIT_POLAR_EPSILON: f32 = 1e-3;
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

// Audio playback
pub const AUDIO_VOLUME: f64 = 0.5;
pub const MODEL_URL: &str = "./assets/tree.glb";
pub const AUDIO_URL: &str = "./assets/music.mp3";

// Diagnostics
pub const LOG_EVERY_FRAMES: u64 = 600;

#[inline]
pub fn rgb_to_f32(rgb: u32) -> [f32; 3] {
    let c = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [c(16), c(8), c(0)]
}
