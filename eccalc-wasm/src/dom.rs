use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "no global window".to_owned())
}

pub fn canvas(id: &str) -> Result<HtmlCanvasElement, String> {
    window()?
        .document()
        .ok_or("no document")?
        .get_element_by_id(id)
        .ok_or_else(|| format!("no #{}", id))?
        .dyn_into()
        .map_err(|_| format!("#{} is not a canvas", id))
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| dpr.is_finite() && *dpr > 0.0)
        .unwrap_or(1.0)
}

/// Milliseconds on the clock `requestAnimationFrame` stamps its callbacks
/// with.
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32, String> {
    window()?
        .request_animation_frame(f.as_ref().unchecked_ref())
        .map_err(|e| format!("requestAnimationFrame failed: {:?}", e))
}

pub fn cancel_animation_frame(handle: i32) {
    if let Some(w) = web_sys::window() {
        w.cancel_animation_frame(handle).ok();
    }
}
