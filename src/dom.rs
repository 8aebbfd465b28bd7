use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::core::SceneConfig;

pub const CANVAS_ID: &str = "app-canvas";

/// Find `#app-canvas`, or create a full-viewport one on `<body>`.
pub fn ensure_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", CANVAS_ID, e));
    }
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("document has no body"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_id(CANVAS_ID);
    _ = canvas.set_attribute(
        "style",
        "position:fixed;inset:0;width:100vw;height:100vh;display:block;touch-action:none",
    );
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Run `handler` on every click anywhere on the page.
pub fn on_body_click(document: &web::Document, mut handler: impl FnMut() + 'static) {
    let Some(body) = document.body() else {
        log::warn!("no <body>; audio cannot be unlocked by click");
        return;
    };
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = body.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Read query-string overrides from the page URL into `config`.
pub fn apply_query_overrides(config: &mut SceneConfig) {
    let Some(window) = web::window() else {
        return;
    };
    let search = match window.location().search() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("cannot read location.search: {:?}", e);
            return;
        }
    };
    if search.len() <= 1 {
        return;
    }
    let params = match web::UrlSearchParams::new_with_str(&search) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("cannot parse query string: {:?}", e);
            return;
        }
    };
    let pairs: Vec<(&str, String)> = crate::core::QUERY_KEYS
        .iter()
        .filter_map(|k| params.get(k).map(|v| (*k, v)))
        .collect();
    for err in config.apply_overrides(pairs.iter().map(|(k, v)| (*k, v.as_str()))) {
        log::warn!("ignoring config override: {}", err);
    }
}
