#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod audio;
mod core;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use crate::core::{CancelToken, ReactiveLoop, Scene, SceneConfig};

thread_local! {
    static LOOP_CANCEL: RefCell<Option<CancelToken>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("canopy starting");

    // Created up front so a stop() that lands before init finishes still
    // takes effect.
    let cancel = CancelToken::new();
    LOOP_CANCEL.with(|c| *c.borrow_mut() = Some(cancel.clone()));

    spawn_local(async move {
        if let Err(e) = init(cancel).await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop the render loop after the current frame. Audio keeps playing.
#[wasm_bindgen]
pub fn stop() {
    LOOP_CANCEL.with(|c| match c.borrow().as_ref() {
        Some(token) => token.cancel(),
        None => log::warn!("stop() ignored: canopy has not started"),
    });
}

async fn init(cancel: CancelToken) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let mut config = SceneConfig::default();
    dom::apply_query_overrides(&mut config);
    log::info!("config: {:?}", config);

    let canvas = dom::ensure_canvas(&document)?;
    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::wire_canvas_resize(&canvas);

    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
    let scene = Scene::new(&config, aspect);

    // The model pops in whenever the fetch completes; frames before that
    // render without it.
    assets::spawn_load_model(config.model_url.clone(), scene.model.clone());

    let graph = Rc::new(audio::build_audio_graph(&config)?);
    {
        let graph = graph.clone();
        let doc = document.clone();
        dom::on_body_click(&document, move || {
            let doc = doc.clone();
            graph.unlock(move || overlay::hide(&doc));
        });
    }

    let gpu = frame::init_gpu(&canvas, &scene).await;

    let reactive = ReactiveLoop::new(scene, graph.source(), config.bin_count());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        orbit: reactive.orbit.clone(),
        drag_state: Rc::new(RefCell::new(input::DragState::default())),
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        reactive,
        gpu,
        canvas,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx, cancel);
    Ok(())
}
