use crate::animation::{FieldAdditionFrame, FrameState};
use crate::canvas::CanvasId;
use crate::curve::FieldCurve;
use crate::easing::{ease_out_back, ease_out_elastic};
use crate::mapper::Window;
use crate::point::{FieldPoint, RealPoint};
use crate::render::Painter;
use crate::surface::{Stroke, Surface};
use crate::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAddition {
    pub p: FieldPoint,
    pub q: FieldPoint,
    pub r: FieldPoint,
}

/// State of the two finite-field canvases.
#[derive(Clone, Debug, Default)]
pub struct FieldScene {
    curve: Option<FieldCurve>,
    points: Vec<FieldPoint>,
    addition: Option<FieldAddition>,
    multiples: Vec<FieldPoint>,
    base: Option<usize>,
    selected_addition: Option<usize>,
    selected_multiplication: Option<usize>,
    addition_labels: bool,
    multiplication_labels: bool,
}

impl FieldScene {
    /// Installs a freshly enumerated point set, dropping everything derived
    /// from the previous one.
    pub fn load(&mut self, curve: FieldCurve, points: Vec<FieldPoint>) {
        self.curve = Some(curve);
        self.points = points;
        self.addition = None;
        self.multiples.clear();
        self.base = None;
        self.selected_addition = None;
        self.selected_multiplication = None;
    }

    pub fn curve(&self) -> Option<&FieldCurve> {
        self.curve.as_ref()
    }

    pub fn points(&self) -> &[FieldPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Result<FieldPoint, RenderError> {
        self.points
            .get(index)
            .copied()
            .ok_or(RenderError::UnknownPoint(index))
    }

    pub fn window(&self) -> Window {
        Window::field(self.curve.map(|c| c.p).unwrap_or(2))
    }

    pub fn addition(&self) -> Option<&FieldAddition> {
        self.addition.as_ref()
    }

    pub fn set_addition(&mut self, addition: FieldAddition) {
        self.addition = Some(addition);
    }

    pub fn multiples(&self) -> &[FieldPoint] {
        &self.multiples
    }

    pub fn base(&self) -> Option<usize> {
        self.base
    }

    pub fn set_multiples(&mut self, base: usize, multiples: Vec<FieldPoint>) {
        self.base = Some(base);
        self.multiples = multiples;
    }

    pub fn selection(&self, canvas: CanvasId) -> Option<usize> {
        match canvas {
            CanvasId::FieldAddition => self.selected_addition,
            CanvasId::FieldMultiplication => self.selected_multiplication,
            _ => None,
        }
    }

    /// Records a click result. Selecting a point other than the base of the
    /// shown multiples drops them; returns whether that happened.
    pub fn select(&mut self, canvas: CanvasId, index: Option<usize>) -> bool {
        match canvas {
            CanvasId::FieldAddition => {
                self.selected_addition = index;
                false
            }
            CanvasId::FieldMultiplication => {
                self.selected_multiplication = index;
                match index {
                    Some(index) if self.base != Some(index) && !self.multiples.is_empty() => {
                        self.multiples.clear();
                        self.base = None;
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    pub fn set_labels(&mut self, canvas: CanvasId, on: bool) {
        match canvas {
            CanvasId::FieldAddition => self.addition_labels = on,
            CanvasId::FieldMultiplication => self.multiplication_labels = on,
            _ => {}
        }
    }

    pub fn draw_static<S: Surface>(&self, canvas: CanvasId, painter: &mut Painter<'_, S>) {
        painter.draw_field_grid();
        if self.curve.is_none() {
            return;
        }
        let palette = *painter.palette();
        painter.draw_discrete_points(&self.points, palette.field_point, false);
        match canvas {
            CanvasId::FieldAddition => {
                if let Some(addition) = &self.addition {
                    let full = FieldAdditionFrame {
                        operands: 1.0,
                        segment: 0.0,
                        result: 1.0,
                    };
                    self.draw_addition(painter, addition, &full);
                    if self.addition_labels {
                        for point in [addition.p, addition.q, addition.r] {
                            painter.draw_field_coordinates(&point);
                        }
                    }
                }
            }
            CanvasId::FieldMultiplication => {
                let stroke = Stroke::dashed(palette.construction.with_alpha(0.4), 1.5, [3.0, 3.0]);
                let chain: Vec<Option<RealPoint>> =
                    self.multiples.iter().map(FieldPoint::to_domain).collect();
                painter.draw_connectors(&chain, &stroke);
                self.draw_multiples(painter, self.multiples.len(), 1.0);
                if self.multiplication_labels {
                    for point in &self.multiples {
                        painter.draw_field_coordinates(point);
                    }
                }
            }
            _ => {}
        }
        self.draw_selection(canvas, painter);
    }

    pub fn draw_frame<S: Surface>(
        &self,
        canvas: CanvasId,
        painter: &mut Painter<'_, S>,
        state: &FrameState,
    ) {
        let palette = *painter.palette();
        match (canvas, state) {
            (_, FrameState::Points { shown, .. }) => {
                painter.draw_field_grid();
                painter.draw_revealing_points(&self.points, *shown, palette.field_point);
            }
            (CanvasId::FieldAddition, FrameState::FieldAddition(frame)) => {
                painter.draw_field_grid();
                painter.draw_discrete_points(&self.points, palette.field_point, false);
                if let Some(addition) = &self.addition {
                    self.draw_addition(painter, addition, frame);
                }
                self.draw_selection(canvas, painter);
            }
            (CanvasId::FieldMultiplication, FrameState::Multiples { shown, fresh }) => {
                painter.draw_field_grid();
                painter.draw_discrete_points(&self.points, palette.field_point, false);
                let shown = (*shown).min(self.multiples.len());
                for i in 1..shown {
                    let pair = (self.multiples[i - 1].to_domain(), self.multiples[i].to_domain());
                    if let (Some(from), Some(to)) = pair {
                        let alpha = if i + 3 >= shown { 0.7 } else { 0.3 };
                        let color = palette.construction.with_alpha(alpha);
                        let stroke = Stroke::dashed(color, 2.0, [5.0, 3.0]);
                        painter.draw_segment(&from, &to, &stroke);
                    }
                }
                self.draw_multiples(painter, shown, 0.3 + 0.7 * fresh);
                if self.multiplication_labels {
                    for point in &self.multiples[..shown] {
                        painter.draw_field_coordinates(point);
                    }
                }
                self.draw_selection(canvas, painter);
            }
            _ => self.draw_static(canvas, painter),
        }
    }

    /// P and Q pop in, the segment between them grows, then R appears.
    fn draw_addition<S: Surface>(
        &self,
        painter: &mut Painter<'_, S>,
        addition: &FieldAddition,
        frame: &FieldAdditionFrame,
    ) {
        let palette = *painter.palette();
        let layout = *painter.layout();

        if frame.operands > 0.0 {
            let pop = ease_out_elastic(frame.operands).min(1.2);
            let operands = [(addition.p, palette.p, "P"), (addition.q, palette.q, "Q")];
            for (point, color, name) in operands {
                if let Some(at) = point.to_domain() {
                    if frame.operands < 1.0 {
                        let fading = 1.0 - frame.operands;
                        painter.draw_glow(&at, 12.0 + fading * 8.0, color.with_alpha(fading * 0.4));
                    }
                    painter.draw_marker(&at, color, layout.marker_radius, Some(name), pop);
                }
            }
        }

        if frame.segment > 0.0 {
            if let (Some(p), Some(q)) = (addition.p.to_domain(), addition.q.to_domain()) {
                let end = RealPoint::new(
                    p.x + (q.x - p.x) * frame.segment,
                    p.y + (q.y - p.y) * frame.segment,
                );
                let stroke = Stroke::dashed(palette.construction.with_alpha(0.8), 3.0, [8.0, 4.0]);
                painter.draw_segment(&p, &end, &stroke);
            }
        }

        if frame.result > 0.0 {
            if let Some(at) = addition.r.to_domain() {
                painter.draw_burst(&at, frame.result, palette.r);
                let pop = ease_out_back(frame.result).min(1.2);
                painter.draw_marker(&at, palette.r, layout.result_radius, Some("R"), pop);
            }
        }
    }

    /// The first `shown` multiples labelled `1P, 2P, ..`; the newest drawn
    /// with `newest_alpha`.
    fn draw_multiples<S: Surface>(
        &self,
        painter: &mut Painter<'_, S>,
        shown: usize,
        newest_alpha: f64,
    ) {
        let color = painter.palette().r;
        let radius = painter.layout().marker_radius;
        for (i, point) in self.multiples.iter().take(shown).enumerate() {
            if let Some(at) = point.to_domain() {
                let alpha = if i + 1 == shown { newest_alpha } else { 1.0 };
                let label = format!("{}P", i + 1);
                let faded = color.with_alpha(alpha);
                painter.draw_marker(&at, faded, radius, Some(label.as_str()), 1.0);
            }
        }
    }

    fn draw_selection<S: Surface>(&self, canvas: CanvasId, painter: &mut Painter<'_, S>) {
        let selected = self
            .selection(canvas)
            .and_then(|index| self.points.get(index));
        if let Some(point) = selected {
            if let Some(at) = point.to_domain() {
                let color = painter.palette().selected;
                painter.draw_highlighted(&at, color, Some(point.to_string().as_str()));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Layout;
    use crate::mapper::CanvasBox;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::surface::Paint;
    use crate::theme::Palette;

    fn scene() -> FieldScene {
        let mut scene = FieldScene::default();
        scene.load(
            FieldCurve::new(2, 3, 97),
            vec![
                FieldPoint::Infinity,
                FieldPoint::new(3, 6),
                FieldPoint::new(80, 10),
                FieldPoint::new(80, 87),
            ],
        );
        scene
    }

    fn draw(scene: &FieldScene, canvas: CanvasId, state: Option<FrameState>) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        let mut painter = Painter::begin(
            &mut surface,
            CanvasBox::new(600.0, 600.0),
            scene.window(),
            Palette::LIGHT,
            Layout::default(),
        )
        .unwrap();
        match state {
            Some(state) => scene.draw_frame(canvas, &mut painter, &state),
            None => scene.draw_static(canvas, &mut painter),
        }
        surface
    }

    #[test]
    fn selecting_another_point_drops_multiples() {
        let mut scene = scene();
        scene.set_multiples(1, vec![FieldPoint::new(3, 6), FieldPoint::new(80, 10)]);
        assert!(!scene.select(CanvasId::FieldMultiplication, Some(1)));
        assert_eq!(scene.multiples().len(), 2);
        assert!(scene.select(CanvasId::FieldMultiplication, Some(2)));
        assert!(scene.multiples().is_empty());
        assert_eq!(scene.selection(CanvasId::FieldMultiplication), Some(2));
        assert_eq!(scene.selection(CanvasId::FieldAddition), None);
    }

    #[test]
    fn reload_clears_derived_state() {
        let mut scene = scene();
        scene.select(CanvasId::FieldAddition, Some(1));
        scene.set_addition(FieldAddition {
            p: FieldPoint::new(3, 6),
            q: FieldPoint::new(3, 6),
            r: FieldPoint::new(80, 10),
        });
        scene.load(FieldCurve::new(1, 1, 5), vec![FieldPoint::Infinity]);
        assert_eq!(scene.selection(CanvasId::FieldAddition), None);
        assert!(scene.addition().is_none());
        assert_eq!(scene.point(3), Err(RenderError::UnknownPoint(3)));
    }

    #[test]
    fn static_addition_scene() {
        let mut scene = scene();
        scene.set_addition(FieldAddition {
            p: FieldPoint::new(3, 6),
            q: FieldPoint::new(80, 10),
            r: FieldPoint::Infinity,
        });
        scene.select(CanvasId::FieldAddition, Some(3));
        let surface = draw(&scene, CanvasId::FieldAddition, None);
        let texts = surface.texts();
        assert!(texts.contains(&"P"));
        assert!(texts.contains(&"Q"));
        // the identity result has no marker
        assert!(!texts.contains(&"R"));
        assert!(texts.contains(&"(80, 87)"));
        assert_eq!(surface.filled_arcs(Palette::LIGHT.field_point).len(), 3);
    }

    #[test]
    fn multiples_frame_shows_prefix() {
        let mut scene = scene();
        let multiples = vec![
            FieldPoint::new(3, 6),
            FieldPoint::new(80, 10),
            FieldPoint::new(80, 87),
        ];
        scene.set_multiples(1, multiples);
        let surface = draw(
            &scene,
            CanvasId::FieldMultiplication,
            Some(FrameState::Multiples { shown: 2, fresh: 0.5 }),
        );
        let texts = surface.texts();
        assert!(texts.contains(&"1P"));
        assert!(texts.contains(&"2P"));
        assert!(!texts.contains(&"3P"));
    }

    #[test]
    fn reveal_frame_draws_prefix_only() {
        let scene = scene();
        let state = FrameState::Points {
            shown: 2,
            progress: 0.5,
        };
        let surface = draw(&scene, CanvasId::FieldAddition, Some(state));
        // index 0 is the identity, so only (3, 6) is visible; it carries a glow too
        let color = Palette::LIGHT.field_point;
        let visible: Vec<_> = surface
            .commands()
            .iter()
            .filter(|c| match c {
                DrawCommand::Arc {
                    paint: Paint::Fill(fill),
                    ..
                } => (fill.r, fill.g, fill.b) == (color.r, color.g, color.b),
                _ => false,
            })
            .collect();
        assert_eq!(visible.len(), 1);
    }
}
