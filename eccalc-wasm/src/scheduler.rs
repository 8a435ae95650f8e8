use crate::dom;
use crate::shell::Shell;
use eccalc_canvas::{CanvasId, FrameScheduler, Generation};
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::prelude::*;

#[derive(Clone, Copy, Debug)]
struct Pending {
    handle: i32,
    generation: Generation,
}

/// `requestAnimationFrame` per canvas. Each canvas owns one callback for the
/// lifetime of the shell; the generation a request was made for is held
/// here until the browser fires it.
#[derive(Default)]
pub struct RafScheduler {
    callbacks: Vec<Closure<dyn FnMut(f64)>>,
    pending: [Option<Pending>; CanvasId::COUNT],
}

impl RafScheduler {
    pub fn install(&mut self, shell: Weak<RefCell<Shell>>) {
        self.callbacks = CanvasId::ALL
            .into_iter()
            .map(|canvas| {
                let shell = shell.clone();
                Closure::wrap(Box::new(move |now: f64| {
                    if let Some(shell) = shell.upgrade() {
                        shell.borrow_mut().on_frame(canvas, now);
                    }
                }) as Box<dyn FnMut(f64)>)
            })
            .collect();
    }

    /// The generation of the request that just fired for `canvas`.
    pub fn fired(&mut self, canvas: CanvasId) -> Option<Generation> {
        self.pending[canvas.index()].take().map(|p| p.generation)
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self, canvas: CanvasId, generation: Generation) {
        self.cancel_frame(canvas);
        let callback = match self.callbacks.get(canvas.index()) {
            Some(callback) => callback,
            None => return,
        };
        match dom::request_animation_frame(callback) {
            Ok(handle) => self.pending[canvas.index()] = Some(Pending { handle, generation }),
            Err(e) => web_sys::console::warn_1(&e.into()),
        }
    }

    fn cancel_frame(&mut self, canvas: CanvasId) {
        if let Some(pending) = self.pending[canvas.index()].take() {
            dom::cancel_animation_frame(pending.handle);
        }
    }
}
