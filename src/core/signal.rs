// Amplitude snapshot and the bass-driven visual parameters derived from it.
//
// Everything here is a pure function of the latest snapshot: nothing is
// smoothed or carried over between frames.

use super::constants::{
    BASS_BIN, BYTE_NORMALIZER, LIGHT_INTENSITY_BASE, LIGHT_INTENSITY_GAIN, PARTICLE_SCALE_BASE,
    PARTICLE_SCALE_GAIN,
};

/// Per-bin byte magnitudes from a frequency analyser.
///
/// The length is fixed at construction (`fft_size / 2` bins) and the backing
/// storage is never reallocated; sources overwrite it in place every frame.
#[derive(Clone, Debug)]
pub struct AmplitudeSnapshot {
    bins: Box<[u8]>,
}

impl AmplitudeSnapshot {
    pub fn with_bins(bin_count: usize) -> Self {
        Self {
            bins: vec![0u8; bin_count].into_boxed_slice(),
        }
    }

    /// Snapshot sized for an analyser with the given FFT window.
    pub fn for_fft_size(fft_size: u32) -> Self {
        Self::with_bins((fft_size / 2) as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Mutable view for sources to write into. Length cannot change.
    #[inline]
    pub fn bins_mut(&mut self) -> &mut [u8] {
        &mut self.bins
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bins.get(index).copied()
    }
}

/// Anything that can refresh an [`AmplitudeSnapshot`] in place.
pub trait AmplitudeSource {
    fn fill(&mut self, snapshot: &mut AmplitudeSnapshot);
}

/// Source that always reports silence, e.g. before audio is unlocked.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl AmplitudeSource for Silence {
    fn fill(&mut self, snapshot: &mut AmplitudeSnapshot) {
        snapshot.bins_mut().fill(0);
    }
}

#[inline]
pub fn normalize_byte(magnitude: u8) -> f32 {
    magnitude as f32 / BYTE_NORMALIZER
}

/// Bass signal in `[0, 255/256]` read from the fixed bass bin.
#[inline]
pub fn bass_signal(snapshot: &AmplitudeSnapshot) -> f32 {
    snapshot.get(BASS_BIN).map(normalize_byte).unwrap_or(0.0)
}

#[inline]
pub fn particle_scale(bass: f32) -> f32 {
    PARTICLE_SCALE_BASE + bass * PARTICLE_SCALE_GAIN
}

#[inline]
pub fn light_intensity(bass: f32) -> f32 {
    LIGHT_INTENSITY_BASE + bass * LIGHT_INTENSITY_GAIN
}

/// Visual outputs of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    /// Uniform scale applied to x, y and z of the particle cloud.
    pub particle_scale: f32,
    pub light_intensity: f32,
}

impl VisualParams {
    pub fn from_bass(bass: f32) -> Self {
        Self {
            particle_scale: particle_scale(bass),
            light_intensity: light_intensity(bass),
        }
    }

    pub fn from_snapshot(snapshot: &AmplitudeSnapshot) -> Self {
        Self::from_bass(bass_signal(snapshot))
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        Self::from_bass(0.0)
    }
}
