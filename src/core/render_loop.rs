// The audio-reactive frame loop.
//
// [`ReactiveLoop`] is the single context object a frame needs: scene, orbit
// controls, amplitude source and the snapshot buffer. Scheduling is left to
// the caller: the browser drives [`ReactiveLoop::frame`] from
// `requestAnimationFrame`, while [`ReactiveLoop::run`] is an explicit loop
// with an injectable stop condition for headless use.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::constants::LOG_EVERY_FRAMES;
use super::orbit::OrbitControls;
use super::scene::Scene;
use super::signal::{bass_signal, AmplitudeSnapshot, AmplitudeSource, VisualParams};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("timed out acquiring the next surface texture")]
    Timeout,
    #[error("render failed: {0}")]
    Other(String),
}

/// Consumes a fully updated scene and produces one frame of output.
pub trait FrameSink {
    fn submit(&mut self, scene: &Scene) -> Result<(), FrameError>;
}

/// Sink that drops every frame. Used when no GPU is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl FrameSink for Discard {
    fn submit(&mut self, _scene: &Scene) -> Result<(), FrameError> {
        Ok(())
    }
}

/// Shared stop flag; clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// When [`ReactiveLoop::run`] should stop.
#[derive(Clone, Debug)]
pub enum LoopControl {
    Forever,
    Frames(u64),
    Until(CancelToken),
}

impl LoopControl {
    pub fn should_continue(&self, frames_this_run: u64) -> bool {
        match self {
            LoopControl::Forever => true,
            LoopControl::Frames(n) => frames_this_run < *n,
            LoopControl::Until(token) => !token.is_cancelled(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub index: u64,
    pub bass: f32,
    pub params: VisualParams,
    pub camera_moved: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub failed_frames: u64,
}

pub struct ReactiveLoop<A: AmplitudeSource> {
    pub scene: Scene,
    pub orbit: Rc<RefCell<OrbitControls>>,
    source: A,
    snapshot: AmplitudeSnapshot,
    frames: u64,
}

impl<A: AmplitudeSource> ReactiveLoop<A> {
    pub fn new(scene: Scene, source: A, bin_count: usize) -> Self {
        let orbit = OrbitControls::new(scene.camera.eye, scene.camera.target);
        Self {
            scene,
            orbit: Rc::new(RefCell::new(orbit)),
            source,
            snapshot: AmplitudeSnapshot::with_bins(bin_count),
            frames: 0,
        }
    }

    pub fn snapshot(&self) -> &AmplitudeSnapshot {
        &self.snapshot
    }

    pub fn source(&self) -> &A {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut A {
        &mut self.source
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Run one frame: sample, derive, apply, move the camera, render.
    ///
    /// The visual parameters are applied before rendering, so a failed
    /// submit still leaves the scene up to date.
    pub fn frame<S: FrameSink>(
        &mut self,
        dt_sec: f32,
        sink: &mut S,
    ) -> Result<FrameReport, FrameError> {
        self.source.fill(&mut self.snapshot);
        let bass = bass_signal(&self.snapshot);
        let params = VisualParams::from_bass(bass);
        self.scene.apply(&params);

        let camera_moved = {
            let mut orbit = self.orbit.borrow_mut();
            let moved = orbit.update(dt_sec);
            self.scene.camera.eye = orbit.eye();
            self.scene.camera.target = orbit.target;
            moved
        };

        let index = self.frames;
        self.frames += 1;
        if index % LOG_EVERY_FRAMES == 0 {
            log::debug!(
                "frame {}: bass={:.3} scale={:.3} light={:.3}",
                index,
                bass,
                params.particle_scale,
                params.light_intensity
            );
        }

        sink.submit(&self.scene)?;
        Ok(FrameReport {
            index,
            bass,
            params,
            camera_moved,
        })
    }

    /// Drive frames back to back with a fixed time step until `control`
    /// says stop. Render failures are logged and counted, not fatal.
    pub fn run<S: FrameSink>(
        &mut self,
        sink: &mut S,
        control: &LoopControl,
        dt_sec: f32,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        while control.should_continue(summary.frames) {
            if let Err(e) = self.frame(dt_sec, sink) {
                log::error!("render error: {}", e);
                summary.failed_frames += 1;
            }
            summary.frames += 1;
        }
        summary
    }
}
