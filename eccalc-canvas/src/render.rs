//! Point, curve and marker drawing on top of a [`Surface`].
use crate::config::Layout;
use crate::curve::{ConstructionLine, RealCurve};
use crate::easing::{ease_out_back, ease_out_cubic};
use crate::grid::format_number;
use crate::mapper::{CanvasBox, Projection, ScreenPoint, Window};
use crate::point::{FieldPoint, RealPoint};
use crate::surface::{Paint, Stroke, Surface, TextAlign, TextBaseline, TextStyle};
use crate::theme::{Color, Palette};
use crate::RenderError;

const POINT_LABEL_FONT: &str = "10px monospace";
const MARKER_FONT: &str = "12px Arial";
const COORD_FONT: &str = "12px monospace";

/// Everything needed to draw one frame of one canvas. Building it derives the
/// plot rectangle from the current logical canvas size, installs the device
/// pixel ratio and clears the canvas.
pub struct Painter<'a, S: Surface> {
    pub(crate) surface: &'a mut S,
    pub(crate) projection: Projection,
    pub(crate) palette: Palette,
    pub(crate) layout: Layout,
}

impl<'a, S: Surface> Painter<'a, S> {
    pub fn begin(
        surface: &'a mut S,
        canvas: CanvasBox,
        window: Window,
        palette: Palette,
        layout: Layout,
    ) -> Result<Self, RenderError> {
        let projection = Projection::for_canvas(window, canvas, layout.padding)?;
        surface.set_transform(canvas.dpr);
        surface.clear(canvas.width, canvas.height, palette.background);
        Ok(Self {
            surface,
            projection,
            palette,
            layout,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn screen(&self, point: &RealPoint) -> ScreenPoint {
        self.projection.to_screen(point)
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) {
        if radius > 0.0 {
            self.surface.draw_arc(center, radius, &Paint::Fill(color));
        }
    }

    /// Text anchored above `at` with a one pixel drop shadow.
    fn shadowed_text(
        &mut self,
        text: &str,
        at: ScreenPoint,
        lift: f64,
        font: &'static str,
        color: Color,
    ) {
        let style = TextStyle::new(font, self.palette.label_shadow.with_alpha(color.a))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Bottom);
        self.surface
            .fill_text(text, ScreenPoint::new(at.x, at.y - lift + 1.0), &style);
        let style = TextStyle { color, ..style };
        self.surface
            .fill_text(text, ScreenPoint::new(at.x, at.y - lift), &style);
    }

    /// Plots every finite point, the identity has no position and is skipped.
    /// Returns how many points were drawn.
    pub fn draw_discrete_points(
        &mut self,
        points: &[FieldPoint],
        color: Color,
        with_labels: bool,
    ) -> usize {
        let radius = self.layout.point_radius;
        let label_style = TextStyle::new(POINT_LABEL_FONT, self.palette.label)
            .align(TextAlign::Left)
            .baseline(TextBaseline::Middle);
        let mut drawn = 0;
        for point in points {
            let domain = match point.to_domain() {
                Some(domain) => domain,
                None => continue,
            };
            let at = self.screen(&domain);
            self.fill_circle(at, radius, color);
            if with_labels {
                self.surface.fill_text(
                    &point.to_string(),
                    ScreenPoint::new(at.x + 12.0, at.y - 12.0),
                    &label_style,
                );
            }
            drawn += 1;
        }
        drawn
    }

    /// The first `shown` points, the latest few growing and fading in.
    pub fn draw_revealing_points(&mut self, points: &[FieldPoint], shown: usize, color: Color) {
        let shown = shown.min(points.len());
        let radius = self.layout.point_radius;
        let glow = self.palette.construction;
        for (index, point) in points.iter().take(shown).enumerate() {
            let domain = match point.to_domain() {
                Some(domain) => domain,
                None => continue,
            };
            let at = self.screen(&domain);
            let age = (shown - index) as f64;
            let alpha = ease_out_cubic(age / 10.0);
            if alpha < 1.0 {
                let fading = 1.0 - alpha;
                self.fill_circle(at, radius + fading * 8.0, glow.with_alpha(fading * 0.3));
            }
            let grow = ease_out_back(age / 8.0).max(0.0);
            self.fill_circle(at, radius * grow, color.with_alpha(alpha));
        }
    }

    /// Samples `y^2 = x^3 + ax + b` across the window and joins consecutive
    /// real samples of each branch. The chain breaks where the curve is not
    /// real; samples past `progress` are not drawn. Returns the number of
    /// segments drawn.
    pub fn draw_continuous_curve(
        &mut self,
        curve: &RealCurve,
        samples: usize,
        progress: f64,
        color: Color,
    ) -> usize {
        let samples = samples.max(1);
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let last = (samples as f64 * progress).floor() as usize;
        let window = *self.projection.window();
        let stroke = Stroke::solid(color, 2.0);

        let mut previous: Option<(ScreenPoint, ScreenPoint)> = None;
        let mut segments = 0;
        for i in 0..=last {
            let x = window.x_min() + (i as f64 / samples as f64) * window.x_span();
            previous = match curve.branches(x) {
                Some((top, bottom)) => {
                    let top = self.screen(&RealPoint::new(x, top));
                    let bottom = self.screen(&RealPoint::new(x, bottom));
                    if let Some((prev_top, prev_bottom)) = previous {
                        self.surface.draw_line(prev_top, top, &stroke);
                        self.surface.draw_line(prev_bottom, bottom, &stroke);
                        segments += 2;
                    }
                    Some((top, bottom))
                }
                None => None,
            };
        }
        segments
    }

    /// Filled marker with an outer ring and an optional name beside it,
    /// `scale` resizes the marker for pop-in effects.
    pub fn draw_marker(
        &mut self,
        point: &RealPoint,
        color: Color,
        radius: f64,
        label: Option<&str>,
        scale: f64,
    ) {
        let at = self.screen(point);
        let radius = radius * scale.max(0.0);
        self.fill_circle(at, radius, color);
        if radius > 0.0 {
            self.surface
                .draw_arc(at, radius + 3.0, &Paint::Stroke(Stroke::solid(color, 2.0)));
        }
        if let Some(label) = label {
            let style = TextStyle::new(MARKER_FONT, color)
                .align(TextAlign::Left)
                .baseline(TextBaseline::Middle);
            self.surface.fill_text(
                label,
                ScreenPoint::new(at.x + radius + 10.0, at.y - radius - 10.0),
                &style,
            );
        }
    }

    /// Emphasised marker with an optional label centred above it.
    pub fn draw_highlighted(&mut self, point: &RealPoint, color: Color, label: Option<&str>) {
        let at = self.screen(point);
        let radius = self.layout.result_radius;
        self.fill_circle(at, radius, color);
        self.surface
            .draw_arc(at, radius + 3.0, &Paint::Stroke(Stroke::solid(color, 2.0)));
        if let Some(label) = label {
            self.shadowed_text(label, at, radius + 5.0, COORD_FONT, color);
        }
    }

    /// Coordinates of a finite-field point written above it.
    pub fn draw_field_coordinates(&mut self, point: &FieldPoint) {
        if let Some(domain) = point.to_domain() {
            let at = self.screen(&domain);
            let color = self.palette.label;
            self.shadowed_text(&point.to_string(), at, 10.0, POINT_LABEL_FONT, color);
        }
    }

    /// Free text above a domain point, `lift` pixels up.
    pub fn draw_caption(&mut self, point: &RealPoint, text: &str, lift: f64, alpha: f64) {
        let at = self.screen(point);
        let color = self.palette.label.with_alpha(alpha);
        self.shadowed_text(text, at, lift, COORD_FONT, color);
    }

    pub fn draw_glow(&mut self, point: &RealPoint, radius: f64, color: Color) {
        let at = self.screen(point);
        self.fill_circle(at, radius, color);
    }

    pub fn draw_ring(&mut self, point: &RealPoint, radius: f64, stroke: &Stroke) {
        let at = self.screen(point);
        if radius > 0.0 {
            self.surface.draw_arc(at, radius, &Paint::Stroke(*stroke));
        }
    }

    /// Expanding halos around a freshly revealed point.
    pub fn draw_burst(&mut self, point: &RealPoint, progress: f64, color: Color) {
        if progress >= 1.0 {
            return;
        }
        for i in 0..3 {
            let delay = f64::from(i) * 0.2;
            let t = ((progress - delay) / (1.0 - delay)).clamp(0.0, 1.0);
            if t > 0.0 {
                self.draw_glow(point, 8.0 + t * 20.0, color.with_alpha((1.0 - t) * 0.35));
            }
        }
    }

    /// Chord or tangent grown from the left edge of the window (or the
    /// bottom edge, for a vertical line) over `progress` of its length.
    pub fn draw_construction_line(
        &mut self,
        line: &ConstructionLine,
        progress: f64,
        stroke: &Stroke,
    ) {
        if progress.is_nan() || progress <= 0.0 {
            return;
        }
        let progress = progress.min(1.0);
        let window = *self.projection.window();
        let (from, to) = match line {
            ConstructionLine::Vertical { x } => (
                RealPoint::new(*x, window.y_min()),
                RealPoint::new(*x, window.y_min() + progress * window.y_span()),
            ),
            ConstructionLine::Slope { .. } => {
                let x0 = window.x_min();
                let x1 = x0 + progress * window.x_span();
                match (line.y_at(x0), line.y_at(x1)) {
                    (Some(y0), Some(y1)) => (RealPoint::new(x0, y0), RealPoint::new(x1, y1)),
                    _ => return,
                }
            }
        };
        let from = self.screen(&from);
        let to = self.screen(&to);
        self.surface.draw_line(from, to, stroke);
    }

    pub fn draw_segment(&mut self, from: &RealPoint, to: &RealPoint, stroke: &Stroke) {
        let from = self.screen(from);
        let to = self.screen(to);
        self.surface.draw_line(from, to, stroke);
    }

    /// Dashed links between consecutive present points.
    pub fn draw_connectors(&mut self, points: &[Option<RealPoint>], stroke: &Stroke) {
        for pair in points.windows(2) {
            if let (Some(from), Some(to)) = (&pair[0], &pair[1]) {
                self.draw_segment(from, to, stroke);
            }
        }
    }

    /// A real point, optionally named with its rounded coordinates.
    pub fn draw_real_point(&mut self, point: &RealPoint, color: Color, label: Option<&str>) {
        let at = self.screen(point);
        self.fill_circle(at, self.layout.real_point_radius, color);
        if let Some(label) = label {
            let text = format!("{}({}, {})", label, format_number(point.x), format_number(point.y));
            self.shadowed_text(&text, at, 12.0, COORD_FONT, color);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};

    fn begin(surface: &mut RecordingSurface, window: Window) -> Painter<'_, RecordingSurface> {
        Painter::begin(
            surface,
            CanvasBox::new(600.0, 600.0).with_dpr(2.0),
            window,
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap()
    }

    #[test]
    fn begin_installs_dpr_and_clears() {
        let mut surface = RecordingSurface::new();
        begin(&mut surface, Window::field(97));
        assert_eq!(surface.commands()[0], DrawCommand::SetTransform(2.0));
        assert!(matches!(
            surface.commands()[1],
            DrawCommand::Clear { width, .. } if width == 600.0
        ));
    }

    #[test]
    fn degenerate_canvas_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let result = Painter::begin(
            &mut surface,
            CanvasBox::new(80.0, 600.0),
            Window::field(97),
            Palette::LIGHT,
            Layout::default(),
        );
        assert!(matches!(result, Err(RenderError::DegenerateCanvas { .. })));
        assert!(surface.is_empty());
    }

    #[test]
    fn discrete_points_skip_infinity() {
        let color = Palette::LIGHT.field_point;
        let mut surface = RecordingSurface::new();
        let points = [FieldPoint::Infinity, FieldPoint::new(3, 6), FieldPoint::new(80, 10)];
        let drawn =
            begin(&mut surface, Window::field(97)).draw_discrete_points(&points, color, true);
        assert_eq!(drawn, 2);
        assert_eq!(surface.filled_arcs(color).len(), 2);
        assert_eq!(surface.texts(), vec!["(3, 6)", "(80, 10)"]);
    }

    #[test]
    fn curve_breaks_where_not_real() {
        let color = Palette::LIGHT.curve;
        let curve = RealCurve::new(-1.0, 1.0);
        let window = Window::symmetric(10.0, 10.0).unwrap();

        let mut surface = RecordingSurface::new();
        let full = begin(&mut surface, window).draw_continuous_curve(&curve, 800, 1.0, color);
        // the curve is real for x >= about -1.32; two branches per segment
        assert!(full > 0 && full % 2 == 0);
        let lines = surface.lines(color);
        assert_eq!(lines.len(), full);
        let leftmost = lines.iter().map(|(a, _)| a.x).fold(f64::INFINITY, f64::min);
        let canvas = CanvasBox::new(600.0, 600.0);
        let projection = Projection::for_canvas(window, canvas, 50.0).unwrap();
        assert!(projection.to_domain(ScreenPoint::new(leftmost, 0.0)).x > -1.4);

        let mut surface = RecordingSurface::new();
        let half = begin(&mut surface, window).draw_continuous_curve(&curve, 800, 0.5, color);
        assert!(half < full);

        let mut surface = RecordingSurface::new();
        assert_eq!(begin(&mut surface, window).draw_continuous_curve(&curve, 800, 0.0, color), 0);
    }

    #[test]
    fn construction_line_progress() {
        let stroke = Stroke::solid(Palette::LIGHT.construction, 2.0);
        let window = Window::symmetric(10.0, 10.0).unwrap();
        let line = ConstructionLine::Vertical { x: 1.0 };

        let mut surface = RecordingSurface::new();
        begin(&mut surface, window).draw_construction_line(&line, 0.5, &stroke);
        let lines = surface.lines(stroke.color);
        assert_eq!(lines.len(), 1);
        let (from, to) = lines[0];
        assert_eq!(from.x, to.x);
        // from the bottom edge up to the middle
        assert!((from.y - 550.0).abs() < 1e-9);
        assert!((to.y - 300.0).abs() < 1e-9);

        let mut surface = RecordingSurface::new();
        begin(&mut surface, window).draw_construction_line(&line, 0.0, &stroke);
        assert!(surface.lines(stroke.color).is_empty());
    }

    #[test]
    fn real_point_label() {
        let color = Palette::LIGHT.p;
        let mut surface = RecordingSurface::new();
        begin(&mut surface, Window::symmetric(10.0, 10.0).unwrap()).draw_real_point(
            &RealPoint::new(2.0, 7f64.sqrt()),
            color,
            Some("P"),
        );
        assert_eq!(surface.texts(), vec!["P(2, 2.65)", "P(2, 2.65)"]);
    }
}
