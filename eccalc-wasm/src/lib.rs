#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

mod dom;
mod scheduler;
mod shell;
mod surface;

use eccalc_canvas::payload::{AdditionResponse, PointsResponse, RealInitResponse, ScalarResponse};
use eccalc_canvas::scene::PickSlot;
use eccalc_canvas::{
    CanvasId, ClickOutcome, Family, FieldCurve, RealCurve, RealPoint, RenderConfig, RenderError,
    ScreenPoint, Session, Theme,
};
use serde::de::DeserializeOwned;
use shell::Shell;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    std::panic::set_hook(Box::new(|info| {
        web_sys::console::error_1(&info.to_string().into());
    }));
    web_sys::console::log_1(&"eccalc canvas core ready".into());
}

fn rejected(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from(message)
}

fn reject(error: RenderError) -> JsValue {
    rejected(error.to_string())
}

fn required<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| rejected(e.to_string()))
}

/// `undefined` and `null` stand for the default.
fn optional<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    required(value)
}

fn canvas_id(canvas: &str) -> Result<CanvasId, JsValue> {
    canvas.parse::<CanvasId>().map_err(reject)
}

fn parse_slot(slot: &str) -> Result<PickSlot, String> {
    match slot {
        "P" | "p" => Ok(PickSlot::P),
        "Q" | "q" => Ok(PickSlot::Q),
        other => Err(format!("unknown operand `{}`", other)),
    }
}

/// The calculator's five canvases, driven from the page script. Canvases are
/// addressed by element id.
#[wasm_bindgen]
pub struct Calculator {
    shell: Rc<RefCell<Shell>>,
}

#[wasm_bindgen]
impl Calculator {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Calculator, JsValue> {
        let config: RenderConfig = optional(config)?;
        let session = Session::new(config).map_err(|e| e.to_string())?;
        let shell = Rc::new(RefCell::new(Shell::new(session)));
        shell.borrow_mut().scheduler.install(Rc::downgrade(&shell));
        Ok(Self { shell })
    }

    #[wasm_bindgen(js_name = "setTheme")]
    pub fn set_theme(&self, dark: bool) {
        let mut shell = self.shell.borrow_mut();
        shell.session.set_theme(Theme::from_dark(dark));
        shell.redraw_all();
    }

    #[wasm_bindgen(js_name = "setShowLabels")]
    pub fn set_show_labels(&self, canvas: &str, on: bool) -> Result<(), JsValue> {
        let canvas = canvas_id(canvas)?;
        let mut shell = self.shell.borrow_mut();
        shell.session.set_show_labels(canvas, on);
        shell.redraw(canvas);
        Ok(())
    }

    #[wasm_bindgen(js_name = "loadFieldCurve")]
    pub fn load_field_curve(
        &self,
        a: i32,
        b: i32,
        p: u32,
        payload: JsValue,
    ) -> Result<(), JsValue> {
        let payload: PointsResponse = required(payload)?;
        let points = payload.field_points().map_err(reject)?;
        let curve = FieldCurve::new(a.into(), b.into(), p.into());
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell.apply(|session, scheduler| session.load_field_curve(curve, points, now, scheduler));
        shell.redraw_family(Family::Field);
        Ok(())
    }

    #[wasm_bindgen(js_name = "showFieldAddition")]
    pub fn show_field_addition(
        &self,
        p_index: usize,
        q_index: usize,
        payload: JsValue,
    ) -> Result<(), JsValue> {
        let payload: AdditionResponse = required(payload)?;
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell
            .apply(|session, scheduler| {
                session.show_field_addition(p_index, q_index, &payload, now, scheduler)
            })
            .map_err(reject)?;
        shell.redraw(CanvasId::FieldAddition);
        Ok(())
    }

    #[wasm_bindgen(js_name = "showFieldMultiplication")]
    pub fn show_field_multiplication(
        &self,
        point_index: usize,
        payload: JsValue,
    ) -> Result<(), JsValue> {
        let payload: ScalarResponse = required(payload)?;
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell
            .apply(|session, scheduler| {
                session.show_field_multiplication(point_index, &payload, now, scheduler)
            })
            .map_err(reject)?;
        shell.redraw(CanvasId::FieldMultiplication);
        Ok(())
    }

    /// `payload` is the curve initialisation reply; without one the current
    /// window is kept.
    #[wasm_bindgen(js_name = "loadRealCurve")]
    pub fn load_real_curve(&self, a: f64, b: f64, payload: JsValue) -> Result<(), JsValue> {
        let payload: RealInitResponse = optional(payload)?;
        let curve = RealCurve::new(a, b);
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell
            .apply(|session, scheduler| session.load_real_curve(curve, &payload, now, scheduler))
            .map_err(reject)?;
        shell.redraw_family(Family::Real);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setRealOperand")]
    pub fn set_real_operand(&self, slot: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let slot = parse_slot(slot)?;
        let mut shell = self.shell.borrow_mut();
        let point = RealPoint::new(x, y);
        shell.apply(|session, scheduler| session.set_real_operand(slot, point, scheduler));
        shell.redraw(CanvasId::RealAddition);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setRealBase")]
    pub fn set_real_base(&self, x: f64, y: f64) {
        let mut shell = self.shell.borrow_mut();
        let point = RealPoint::new(x, y);
        shell.apply(|session, scheduler| session.set_real_multiplication_base(point, scheduler));
        shell.redraw(CanvasId::RealMultiplication);
    }

    #[wasm_bindgen(js_name = "showRealAddition")]
    pub fn show_real_addition(&self, payload: JsValue) -> Result<(), JsValue> {
        let payload: AdditionResponse = required(payload)?;
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell
            .apply(|session, scheduler| session.show_real_addition(&payload, now, scheduler))
            .map_err(reject)?;
        shell.redraw(CanvasId::RealAddition);
        Ok(())
    }

    #[wasm_bindgen(js_name = "showRealMultiplication")]
    pub fn show_real_multiplication(&self, payload: JsValue) -> Result<(), JsValue> {
        let payload: ScalarResponse = required(payload)?;
        let now = dom::now();
        let mut shell = self.shell.borrow_mut();
        shell
            .apply(|session, scheduler| session.show_real_multiplication(&payload, now, scheduler))
            .map_err(reject)?;
        shell.redraw(CanvasId::RealMultiplication);
        Ok(())
    }

    #[wasm_bindgen(js_name = "redrawAll")]
    pub fn redraw_all(&self) {
        self.shell.borrow_mut().redraw_all();
    }

    pub fn redraw(&self, canvas: &str) -> Result<(), JsValue> {
        let canvas = canvas_id(canvas)?;
        self.shell.borrow_mut().redraw(canvas);
        Ok(())
    }

    /// Index of the hit point on a finite-field canvas, `{x, y}` of the
    /// picked point on a real canvas, `null` otherwise.
    pub fn click(&self, canvas: &str, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let canvas = canvas_id(canvas)?;
        let mut shell = self.shell.borrow_mut();
        let canvas_box = match shell.canvas_box(canvas) {
            Some(canvas_box) => canvas_box,
            None => return Ok(JsValue::NULL),
        };
        let at = ScreenPoint::new(x, y);
        let now = dom::now();
        let outcome = shell
            .apply(|session, scheduler| session.click(canvas, at, canvas_box, now, scheduler))
            .map_err(reject)?;
        if outcome != ClickOutcome::Suppressed {
            shell.redraw(canvas);
        }
        match outcome {
            ClickOutcome::Field(Some(index)) => Ok(JsValue::from_f64(index as f64)),
            ClickOutcome::Real(Some(point)) => {
                serde_wasm_bindgen::to_value(&point).map_err(|e| e.to_string().into())
            }
            _ => Ok(JsValue::NULL),
        }
    }

    /// Returns whether the real window changed.
    pub fn wheel(&self, canvas: &str, x: f64, y: f64, delta_y: f64) -> Result<bool, JsValue> {
        let canvas = canvas_id(canvas)?;
        let mut shell = self.shell.borrow_mut();
        let canvas_box = match shell.canvas_box(canvas) {
            Some(canvas_box) => canvas_box,
            None => return Ok(false),
        };
        let changed = shell
            .session
            .zoom(canvas, ScreenPoint::new(x, y), delta_y, canvas_box)
            .map_err(reject)?;
        if changed {
            shell.redraw_family(Family::Real);
        }
        Ok(changed)
    }

    #[wasm_bindgen(js_name = "panStart")]
    pub fn pan_start(&self, canvas: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let canvas = canvas_id(canvas)?;
        self.shell.borrow_mut().session.pan_start(canvas, ScreenPoint::new(x, y));
        Ok(())
    }

    #[wasm_bindgen(js_name = "panMove")]
    pub fn pan_move(&self, x: f64, y: f64) -> Result<bool, JsValue> {
        let mut shell = self.shell.borrow_mut();
        let canvas = match shell.session.panning() {
            Some(canvas) => canvas,
            None => return Ok(false),
        };
        let canvas_box = match shell.canvas_box(canvas) {
            Some(canvas_box) => canvas_box,
            None => return Ok(false),
        };
        let moved = shell
            .session
            .pan_move(ScreenPoint::new(x, y), canvas_box)
            .map_err(reject)?;
        if moved {
            shell.redraw_family(Family::Real);
        }
        Ok(moved)
    }

    #[wasm_bindgen(js_name = "panEnd")]
    pub fn pan_end(&self) {
        self.shell.borrow_mut().session.pan_end();
    }

    pub fn cancel(&self, canvas: &str) -> Result<(), JsValue> {
        let canvas = canvas_id(canvas)?;
        let mut shell = self.shell.borrow_mut();
        shell.apply(|session, scheduler| session.cancel(canvas, scheduler));
        shell.redraw(canvas);
        Ok(())
    }
}
