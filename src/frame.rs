use crate::audio::WebAudioSource;
use crate::core::{CancelToken, Discard, ReactiveLoop};
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub reactive: ReactiveLoop<WebAudioSource>,
    pub gpu: Option<render::GpuState>,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.reactive
            .scene
            .camera
            .set_viewport(self.canvas.width(), self.canvas.height());

        let result = match &mut self.gpu {
            Some(g) => self.reactive.frame(dt_sec, g),
            None => self.reactive.frame(dt_sec, &mut Discard),
        };
        if let Err(e) = result {
            log::error!("render error: {}", e);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    scene: &crate::core::Scene,
) -> Option<render::GpuState> {
    match render::GpuState::new(canvas, scene).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drive `frame_ctx` from `requestAnimationFrame` until `cancel` fires.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>, cancel: CancelToken) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if cancel.is_cancelled() {
            let frames = frame_ctx.borrow().reactive.frames_rendered();
            log::info!("render loop stopped after {} frames", frames);
            // Dropping the closure ends the self-scheduling chain.
            tick_clone.borrow_mut().take();
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
