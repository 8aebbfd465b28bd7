/// Pointer drag tracking for the orbit camera.
///
/// Only the pointer that started the drag moves the camera; other pointers
/// (a second finger, a pen hovering) are ignored until it is released.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last_x: f32,
    pub last_y: f32,
}

impl DragState {
    pub fn begin(&mut self, pointer_id: i32, x: f32, y: f32) -> bool {
        if self.active {
            return false;
        }
        *self = Self {
            active: true,
            pointer_id,
            last_x: x,
            last_y: y,
        };
        true
    }

    /// Returns the movement since the previous event for the dragging pointer.
    pub fn move_to(&mut self, pointer_id: i32, x: f32, y: f32) -> Option<(f32, f32)> {
        if !self.active || pointer_id != self.pointer_id {
            return None;
        }
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let delta = (x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        Some(delta)
    }

    pub fn end(&mut self, pointer_id: i32) -> bool {
        if self.active && pointer_id == self.pointer_id {
            self.active = false;
            true
        } else {
            false
        }
    }
}

/// Normalise a wheel delta to pixels. `delta_mode` follows the DOM
/// constants: 0 pixels, 1 lines, 2 pages.
#[inline]
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, page_height_px: f32) -> f32 {
    let dy = delta_y as f32;
    match delta_mode {
        1 => dy * 16.0,
        2 => dy * page_height_px.max(1.0),
        _ => dy,
    }
}
