use crate::core::OrbitControls;
use crate::input::{self, DragState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub orbit: Rc<RefCell<OrbitControls>>,
    pub drag_state: Rc<RefCell<DragState>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w, "pointerup");
    wire_pointerup(&w, "pointercancel");
    wire_wheel(&w);
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let began = w.drag_state.borrow_mut().begin(
            ev.pointer_id(),
            ev.client_x() as f32,
            ev.client_y() as f32,
        );
        if began {
            _ = w.canvas.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let delta = w.drag_state.borrow_mut().move_to(
            ev.pointer_id(),
            ev.client_x() as f32,
            ev.client_y() as f32,
        );
        if let Some((dx, dy)) = delta {
            let height = w.canvas.client_height() as f32;
            w.orbit.borrow_mut().rotate(dx, dy, height);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring, event_name: &str) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if w.drag_state.borrow_mut().end(ev.pointer_id()) {
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let page = w.canvas.client_height() as f32;
        let dy = input::wheel_delta_px(ev.delta_y(), ev.delta_mode(), page);
        w.orbit.borrow_mut().dolly(dy);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
