//! Linear maps between domain coordinates and canvas pixels.
//!
//! Both curve families share one model: a domain [`Window`] is stretched over
//! the padded [`PlotRect`] of a canvas, with the y axis flipped so that larger
//! domain values are drawn higher up. The finite-field window is fixed to
//! `[0, p - 1]` on both axes, the real window comes from the mutable viewport.
use crate::point::RealPoint;
use crate::RenderError;

/// A position in CSS pixels relative to the canvas' top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Logical (CSS) size of a canvas together with its device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasBox {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl CanvasBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    pub fn with_dpr(mut self, dpr: f64) -> Self {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self
    }

    /// Backing store size in physical pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width.max(0.0) * self.dpr).round() as u32,
            (self.height.max(0.0) * self.dpr).round() as u32,
        )
    }
}

/// The padded drawing area of a canvas, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotRect {
    pub fn new(canvas: CanvasBox, padding: f64) -> Result<Self, RenderError> {
        let width = canvas.width - 2.0 * padding;
        let height = canvas.height - 2.0 * padding;
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderError::DegenerateCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        Ok(Self {
            left: padding,
            top: padding,
            width,
            height,
        })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.left && x <= self.right()
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        self.contains_x(point.x) && self.contains_y(point.y)
    }
}

/// A non-empty rectangle of domain space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Window {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, RenderError> {
        let finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !finite || x_min >= x_max || y_min >= y_max {
            return Err(RenderError::InvalidRange {
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// `[-half_x, half_x] x [-half_y, half_y]`
    pub fn symmetric(half_x: f64, half_y: f64) -> Result<Self, RenderError> {
        Self::new(-half_x, half_x, -half_y, half_y)
    }

    /// The fixed `[0, p - 1]` square of a finite-field canvas.
    pub fn field(modulus: u64) -> Self {
        let extent = field_extent(modulus) as f64;
        Self {
            x_min: 0.0,
            x_max: extent,
            y_min: 0.0,
            y_max: extent,
        }
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> RealPoint {
        RealPoint::new(
            self.x_min + self.x_span() / 2.0,
            self.y_min + self.y_span() / 2.0,
        )
    }

    pub fn contains(&self, point: &RealPoint) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }
}

/// Largest coordinate drawn on a finite-field canvas, never below 1.
pub fn field_extent(modulus: u64) -> u64 {
    modulus.saturating_sub(1).max(1)
}

/// A window bound to the plot rectangle of one canvas for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    window: Window,
    plot: PlotRect,
}

impl Projection {
    pub fn new(window: Window, plot: PlotRect) -> Self {
        Self { window, plot }
    }

    pub fn for_canvas(
        window: Window,
        canvas: CanvasBox,
        padding: f64,
    ) -> Result<Self, RenderError> {
        Ok(Self::new(window, PlotRect::new(canvas, padding)?))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn plot(&self) -> &PlotRect {
        &self.plot
    }

    pub fn to_screen(&self, point: &RealPoint) -> ScreenPoint {
        let (sx, sy) = self.pixels_per_unit();
        ScreenPoint::new(
            self.plot.left + (point.x - self.window.x_min) * sx,
            self.plot.bottom() - (point.y - self.window.y_min) * sy,
        )
    }

    pub fn to_domain(&self, pixel: ScreenPoint) -> RealPoint {
        RealPoint::new(
            self.window.x_min + (pixel.x - self.plot.left) / self.plot.width * self.window.x_span(),
            self.window.y_min
                + (self.plot.bottom() - pixel.y) / self.plot.height * self.window.y_span(),
        )
    }

    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (
            self.plot.width / self.window.x_span(),
            self.plot.height / self.window.y_span(),
        )
    }

    pub fn units_per_pixel(&self) -> (f64, f64) {
        (
            self.window.x_span() / self.plot.width,
            self.window.y_span() / self.plot.height,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_close(a: f64, b: f64, tolerance: f64) {
        assert!((a - b).abs() <= tolerance, "{} != {}", a, b);
    }

    #[test]
    fn plot_rect_rejects_tiny_canvases() {
        assert!(PlotRect::new(CanvasBox::new(600.0, 400.0), 50.0).is_ok());
        assert_eq!(
            PlotRect::new(CanvasBox::new(100.0, 400.0), 50.0),
            Err(RenderError::DegenerateCanvas {
                width: 100.0,
                height: 400.0
            })
        );
        assert!(PlotRect::new(CanvasBox::new(0.0, 0.0), 50.0).is_err());
        assert!(PlotRect::new(CanvasBox::new(f64::NAN, 300.0), 50.0).is_err());
    }

    #[test]
    fn window_validation() {
        assert!(Window::new(-1.0, 1.0, -1.0, 1.0).is_ok());
        assert!(Window::new(1.0, 1.0, -1.0, 1.0).is_err());
        assert!(Window::new(-1.0, 1.0, 2.0, 1.0).is_err());
        assert!(Window::new(f64::NEG_INFINITY, 1.0, -1.0, 1.0).is_err());
        assert!(Window::symmetric(0.0, 1.0).is_err());
    }

    #[test]
    fn field_window_extent() {
        let window = Window::field(97);
        assert_eq!(window.x_max(), 96.0);
        assert_eq!(window.y_max(), 96.0);
        // degenerate moduli still produce a drawable square
        assert_eq!(Window::field(1).x_max(), 1.0);
        assert_eq!(Window::field(0).x_max(), 1.0);
    }

    #[test]
    fn field_corners_land_on_plot_corners() {
        let canvas = CanvasBox::new(600.0, 500.0);
        let projection = Projection::for_canvas(Window::field(97), canvas, 50.0).unwrap();
        let origin = projection.to_screen(&RealPoint::new(0.0, 0.0));
        assert_eq!(origin, ScreenPoint::new(50.0, 450.0));
        let corner = projection.to_screen(&RealPoint::new(96.0, 96.0));
        assert_close(corner.x, 550.0, 1e-9);
        assert_close(corner.y, 50.0, 1e-9);
    }

    #[test]
    fn real_mapping_flips_y() {
        let canvas = CanvasBox::new(500.0, 500.0);
        let window = Window::symmetric(10.0, 10.0).unwrap();
        let projection = Projection::for_canvas(window, canvas, 50.0).unwrap();
        let center = projection.to_screen(&RealPoint::new(0.0, 0.0));
        assert_eq!(center, ScreenPoint::new(250.0, 250.0));
        let up = projection.to_screen(&RealPoint::new(0.0, 5.0));
        assert!(up.y < center.y);
    }

    #[test]
    fn round_trip_real() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let x_min = rng.gen_range(-1000.0..1000.0);
            let y_min = rng.gen_range(-1000.0..1000.0);
            let window = Window::new(
                x_min,
                x_min + rng.gen_range(0.01..500.0),
                y_min,
                y_min + rng.gen_range(0.01..500.0),
            )
            .unwrap();
            let canvas = CanvasBox::new(rng.gen_range(120.0..1600.0), rng.gen_range(120.0..1200.0));
            let projection = Projection::for_canvas(window, canvas, 50.0).unwrap();
            let point = RealPoint::new(
                rng.gen_range(window.x_min()..window.x_max()),
                rng.gen_range(window.y_min()..window.y_max()),
            );
            let back = projection.to_domain(projection.to_screen(&point));
            assert_close(back.x, point.x, 1e-9 * window.x_span().max(1.0));
            assert_close(back.y, point.y, 1e-9 * window.y_span().max(1.0));
        }
    }

    #[test]
    fn round_trip_field() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = rng.gen_range(2u64..10_000);
            let canvas = CanvasBox::new(640.0, 480.0);
            let projection = Projection::for_canvas(Window::field(p), canvas, 50.0).unwrap();
            let x = rng.gen_range(0..p) as f64;
            let y = rng.gen_range(0..p) as f64;
            let back = projection.to_domain(projection.to_screen(&RealPoint::new(x, y)));
            assert_eq!(back.x.round(), x);
            assert_eq!(back.y.round(), y);
        }
    }
}
