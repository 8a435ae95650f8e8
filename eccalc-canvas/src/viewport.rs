//! The pan/zoom window shared by the real-curve canvases.
use crate::mapper::{PlotRect, Projection, ScreenPoint, Window};
use crate::RenderError;

/// Allowed extent of either axis of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for SpanLimits {
    fn default() -> Self {
        Self { min: 1e-3, max: 1e6 }
    }
}

impl SpanLimits {
    pub fn new(min: f64, max: f64) -> Result<Self, RenderError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(RenderError::InvalidConfig("span limits must satisfy 0 < min <= max"));
        }
        Ok(Self { min, max })
    }

    pub fn clamp(&self, span: f64) -> f64 {
        span.max(self.min).min(self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    window: Window,
    limits: SpanLimits,
}

impl Viewport {
    pub fn new(range: Window, limits: SpanLimits) -> Result<Self, RenderError> {
        Ok(Self {
            window: clamp_around_center(&range, &limits)?,
            limits,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn limits(&self) -> &SpanLimits {
        &self.limits
    }

    pub fn projection(&self, plot: PlotRect) -> Projection {
        Projection::new(self.window, plot)
    }

    /// Replaces the window, clamping each span around the range's center.
    pub fn reset(&mut self, range: Window) -> Result<(), RenderError> {
        self.window = clamp_around_center(&range, &self.limits)?;
        Ok(())
    }

    /// Rescales both axes by `scale` keeping the domain point under `anchor`
    /// fixed. Returns whether the window changed; a non-positive or
    /// non-finite scale is ignored.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, scale: f64, plot: &PlotRect) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            return false;
        }
        let pinned = self.projection(*plot).to_domain(anchor);
        let w = &self.window;
        let x_ratio = self.limits.clamp(w.x_span() * scale) / w.x_span();
        let y_ratio = self.limits.clamp(w.y_span() * scale) / w.y_span();

        let x_min = pinned.x - (pinned.x - w.x_min()) * x_ratio;
        let x_max = pinned.x + (w.x_max() - pinned.x) * x_ratio;
        let y_min = pinned.y - (pinned.y - w.y_min()) * y_ratio;
        let y_max = pinned.y + (w.y_max() - pinned.y) * y_ratio;
        self.commit(x_min, x_max, y_min, y_max)
    }

    /// Drags the window by a pixel delta: content follows the pointer.
    pub fn pan_by(&mut self, dx: f64, dy: f64, plot: &PlotRect) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            return false;
        }
        let (ux, uy) = self.projection(*plot).units_per_pixel();
        let (shift_x, shift_y) = (-dx * ux, dy * uy);
        let w = &self.window;
        self.commit(
            w.x_min() + shift_x,
            w.x_max() + shift_x,
            w.y_min() + shift_y,
            w.y_max() + shift_y,
        )
    }

    fn commit(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> bool {
        match Window::new(x_min, x_max, y_min, y_max) {
            Ok(window) if window != self.window => {
                self.window = window;
                true
            }
            _ => false,
        }
    }
}

fn clamp_around_center(range: &Window, limits: &SpanLimits) -> Result<Window, RenderError> {
    let center = range.center();
    let half_x = limits.clamp(range.x_span()) / 2.0;
    let half_y = limits.clamp(range.y_span()) / 2.0;
    Window::new(
        center.x - half_x,
        center.x + half_x,
        center.y - half_y,
        center.y + half_y,
    )
}
