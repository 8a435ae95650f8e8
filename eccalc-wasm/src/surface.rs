use crate::dom;
use eccalc_canvas::surface::{Paint, Stroke, TextStyle};
use eccalc_canvas::theme::Color;
use eccalc_canvas::{CanvasBox, CanvasId, ScreenPoint, Surface};
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A calculator canvas and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn attach(canvas: CanvasId) -> Result<Self, String> {
        let canvas = dom::canvas(canvas.element_id())?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("{:?}", e))?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "not a 2d context")?;
        Ok(Self { canvas, ctx })
    }

    /// Current CSS size and pixel ratio; the backing store is resized to
    /// match when either changed.
    pub fn fit(&mut self) -> CanvasBox {
        let rect = CanvasBox::new(
            f64::from(self.canvas.client_width()),
            f64::from(self.canvas.client_height()),
        )
        .with_dpr(dom::device_pixel_ratio());
        let (width, height) = rect.device_size();
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        rect
    }

    fn set_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width);
        let dash = js_sys::Array::new();
        if let Some([on, off]) = stroke.dash {
            dash.push(&JsValue::from_f64(on));
            dash.push(&JsValue::from_f64(off));
        }
        self.ctx.set_line_dash(&dash).ok();
    }

    fn fill_style(&self, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
    }
}

impl Surface for CanvasSurface {
    fn set_transform(&mut self, scale: f64) {
        self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0).ok();
    }

    fn clear(&mut self, width: f64, height: f64, color: Color) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.fill_style(color);
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke) {
        self.set_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn draw_arc(&mut self, center: ScreenPoint, radius: f64, paint: &Paint) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        match paint {
            Paint::Fill(color) => {
                self.fill_style(*color);
                self.ctx.fill();
            }
            Paint::Stroke(stroke) => {
                self.set_stroke(stroke);
                self.ctx.stroke();
            }
        }
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: &TextStyle) {
        self.ctx.set_font(style.font);
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.set_text_baseline(style.baseline.as_str());
        self.fill_style(style.color);
        if style.angle == 0.0 {
            self.ctx.fill_text(text, at.x, at.y).ok();
            return;
        }
        self.ctx.save();
        self.ctx.translate(at.x, at.y).ok();
        self.ctx.rotate(style.angle).ok();
        self.ctx.fill_text(text, 0.0, 0.0).ok();
        self.ctx.restore();
    }
}
