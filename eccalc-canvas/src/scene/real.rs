use crate::animation::{ConstructionFrame, ConstructionPhase, FrameState};
use crate::canvas::CanvasId;
use crate::curve::{ConstructionLine, RealCurve};
use crate::easing::ease_out_cubic;
use crate::grid::format_number;
use crate::mapper::Window;
use crate::point::RealPoint;
use crate::render::Painter;
use crate::surface::{Stroke, Surface};
use crate::viewport::Viewport;
use crate::RenderError;

/// Which operand a click on the addition canvas fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickSlot {
    P,
    Q,
}

impl PickSlot {
    fn other(self) -> Self {
        match self {
            Self::P => Self::Q,
            Self::Q => Self::P,
        }
    }
}

/// State of the three real-curve canvases. They share one curve and one
/// viewport.
#[derive(Clone, Debug)]
pub struct RealScene {
    curve: RealCurve,
    viewport: Viewport,
    samples: usize,
    p: Option<RealPoint>,
    q: Option<RealPoint>,
    /// `None` with `computed` set is the identity.
    r: Option<RealPoint>,
    computed: bool,
    next_pick: PickSlot,
    base: Option<RealPoint>,
    multiples: Vec<Option<RealPoint>>,
    addition_labels: bool,
    multiplication_labels: bool,
}

impl RealScene {
    pub fn new(viewport: Viewport, samples: usize) -> Self {
        Self {
            curve: RealCurve::default(),
            viewport,
            samples,
            p: None,
            q: None,
            r: None,
            computed: false,
            next_pick: PickSlot::P,
            base: None,
            multiples: Vec::new(),
            addition_labels: false,
            multiplication_labels: false,
        }
    }

    /// Switches to a new curve. Operands and results belong to the old one
    /// and are dropped; the viewport is reset when a range is given.
    pub fn load(&mut self, curve: RealCurve, range: Option<Window>) -> Result<(), RenderError> {
        if let Some(range) = range {
            self.viewport.reset(range)?;
        }
        self.curve = curve;
        self.p = None;
        self.q = None;
        self.clear_result();
        self.next_pick = PickSlot::P;
        self.base = None;
        self.multiples.clear();
        Ok(())
    }

    pub fn curve(&self) -> &RealCurve {
        &self.curve
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn window(&self) -> Window {
        *self.viewport.window()
    }

    pub fn operand(&self, slot: PickSlot) -> Option<RealPoint> {
        match slot {
            PickSlot::P => self.p,
            PickSlot::Q => self.q,
        }
    }

    /// `Some(None)` when the computed sum is the identity.
    pub fn result(&self) -> Option<Option<RealPoint>> {
        self.computed.then(|| self.r)
    }

    pub fn next_pick(&self) -> PickSlot {
        self.next_pick
    }

    fn clear_result(&mut self) {
        self.r = None;
        self.computed = false;
    }

    pub fn set_operand(&mut self, slot: PickSlot, point: RealPoint) {
        match slot {
            PickSlot::P => self.p = Some(point),
            PickSlot::Q => self.q = Some(point),
        }
        self.next_pick = slot.other();
        self.clear_result();
    }

    /// Fills the operand whose turn it is and returns which one that was.
    pub fn pick(&mut self, point: RealPoint) -> PickSlot {
        let slot = self.next_pick;
        self.set_operand(slot, point);
        slot
    }

    pub fn base(&self) -> Option<RealPoint> {
        self.base
    }

    pub fn set_base(&mut self, point: RealPoint) {
        self.base = Some(point);
        self.multiples.clear();
    }

    pub fn set_addition_result(&mut self, r: Option<RealPoint>) -> Result<(), RenderError> {
        if self.p.is_none() {
            return Err(RenderError::MissingOperand("P"));
        }
        if self.q.is_none() {
            return Err(RenderError::MissingOperand("Q"));
        }
        self.r = r;
        self.computed = true;
        self.next_pick = PickSlot::P;
        Ok(())
    }

    pub fn construction_line(&self) -> Option<ConstructionLine> {
        match (&self.p, &self.q) {
            (Some(p), Some(q)) => Some(ConstructionLine::through(p, q, &self.curve)),
            _ => None,
        }
    }

    pub fn multiples(&self) -> &[Option<RealPoint>] {
        &self.multiples
    }

    pub fn set_multiples(&mut self, multiples: Vec<Option<RealPoint>>) {
        self.multiples = multiples;
    }

    pub fn clear_multiples(&mut self) {
        self.multiples.clear();
    }

    pub fn set_labels(&mut self, canvas: CanvasId, on: bool) {
        match canvas {
            CanvasId::RealAddition => self.addition_labels = on,
            CanvasId::RealMultiplication => self.multiplication_labels = on,
            _ => {}
        }
    }

    fn draw_backdrop<S: Surface>(&self, painter: &mut Painter<'_, S>, progress: f64) {
        painter.draw_real_grid();
        let color = painter.palette().curve;
        painter.draw_continuous_curve(&self.curve, self.samples, progress, color);
    }

    pub fn draw_static<S: Surface>(&self, canvas: CanvasId, painter: &mut Painter<'_, S>) {
        self.draw_backdrop(painter, 1.0);
        match canvas {
            CanvasId::RealAddition => self.draw_addition(painter),
            CanvasId::RealMultiplication => {
                if self.multiples.is_empty() {
                    self.draw_base_preview(painter);
                } else {
                    self.draw_multiples(painter, self.multiples.len(), None);
                }
            }
            _ => {}
        }
    }

    pub fn draw_frame<S: Surface>(
        &self,
        canvas: CanvasId,
        painter: &mut Painter<'_, S>,
        state: &FrameState,
    ) {
        match (canvas, state) {
            (_, FrameState::Curve { progress }) => self.draw_backdrop(painter, *progress),
            (CanvasId::RealAddition, FrameState::Construction(frame)) => {
                self.draw_backdrop(painter, 1.0);
                self.draw_construction(painter, frame);
            }
            (CanvasId::RealMultiplication, FrameState::Multiples { shown, fresh }) => {
                self.draw_backdrop(painter, 1.0);
                let shown = (*shown).min(self.multiples.len());
                let color = painter.palette().construction.with_alpha(0.6);
                let stroke = Stroke::dashed(color, 2.0, [6.0, 4.0]);
                painter.draw_connectors(&self.multiples[..shown], &stroke);
                self.draw_multiples(painter, shown, Some(*fresh));
            }
            _ => self.draw_static(canvas, painter),
        }
    }

    fn draw_addition<S: Surface>(&self, painter: &mut Painter<'_, S>) {
        let palette = *painter.palette();
        let labels = self.addition_labels;
        if let Some(p) = &self.p {
            painter.draw_real_point(p, palette.p, labels.then(|| "P"));
        }
        if let Some(q) = &self.q {
            painter.draw_real_point(q, palette.q, labels.then(|| "Q"));
        }
        if self.computed {
            if let Some(line) = self.construction_line() {
                painter.draw_construction_line(&line, 1.0, &Stroke::solid(palette.neg_r, 1.5));
            }
        }
        if let Some(r) = &self.r {
            let mirror = r.mirrored();
            painter.draw_real_point(&mirror, palette.neg_r, labels.then(|| "-R"));
            painter.draw_real_point(r, palette.r, labels.then(|| "R"));
            let stroke = Stroke::dashed(palette.label_shadow.with_alpha(0.3), 1.0, [4.0, 4.0]);
            painter.draw_segment(r, &mirror, &stroke);
        }
    }

    /// Line, then `-R`, then the reflection onto `R`. Operands are always
    /// named while the construction runs.
    fn draw_construction<S: Surface>(
        &self,
        painter: &mut Painter<'_, S>,
        frame: &ConstructionFrame,
    ) {
        let palette = *painter.palette();
        for (point, color, name) in [(self.p, palette.p, "P"), (self.q, palette.q, "Q")] {
            if let Some(point) = point {
                painter.draw_glow(&point, 12.0, color.with_alpha(0.15));
                painter.draw_real_point(&point, color, Some(name));
            }
        }

        if let Some(line) = self.construction_line() {
            let stroke = Stroke::dashed(palette.construction.with_alpha(0.9), 2.5, [6.0, 4.0]);
            painter.draw_construction_line(&line, frame.line, &stroke);
        }

        let r = match self.r {
            Some(r) => r,
            None => return,
        };
        let mirror = r.mirrored();
        if frame.mirror > 0.0 {
            if frame.mirror < 1.0 {
                let fading = 1.0 - frame.mirror;
                let glow = palette.neg_r.with_alpha(fading * 0.4);
                painter.draw_glow(&mirror, 12.0 + fading * 8.0, glow);
            }
            painter.draw_real_point(&mirror, palette.neg_r.with_alpha(frame.mirror), Some("-R"));
        }

        if matches!(frame.phase, ConstructionPhase::Reflect | ConstructionPhase::Reveal) {
            let reached = RealPoint::new(r.x, mirror.y + (r.y - mirror.y) * frame.reflect);
            let stroke = Stroke::dashed(palette.construction.with_alpha(0.6), 2.0, [5.0, 5.0]);
            painter.draw_segment(&mirror, &reached, &stroke);
        }

        if frame.phase == ConstructionPhase::Reveal {
            painter.draw_burst(&r, frame.reveal, palette.r);
            let color = palette.r.with_alpha(ease_out_cubic(frame.reveal));
            painter.draw_real_point(&r, color, Some("R"));
        }
    }

    /// `1P..` with captions; `fresh` is set while the newest one fades in.
    fn draw_multiples<S: Surface>(
        &self,
        painter: &mut Painter<'_, S>,
        shown: usize,
        fresh: Option<f64>,
    ) {
        let palette = *painter.palette();
        for (i, point) in self.multiples.iter().take(shown).enumerate() {
            let point = match point {
                Some(point) => point,
                None => continue,
            };
            let newest = i + 1 == shown;
            let alpha = match fresh {
                Some(fresh) if newest => 0.3 + 0.7 * fresh,
                _ => 1.0,
            };
            painter.draw_real_point(point, palette.multiples.with_alpha(alpha), None);
            painter.draw_caption(point, &format!("{}P", i + 1), 12.0, alpha);
            if self.multiplication_labels {
                let coordinates =
                    format!("({}, {})", format_number(point.x), format_number(point.y));
                painter.draw_caption(point, &coordinates, 26.0, alpha);
            }
            if let Some(fresh) = fresh.filter(|f| newest && *f > 0.5) {
                let pulse = (fresh - 0.5) / 0.5;
                let stroke = Stroke::solid(palette.construction.with_alpha(1.0 - pulse * 0.6), 2.0);
                painter.draw_ring(point, 8.0 + 8.0 * pulse, &stroke);
            }
        }
    }

    fn draw_base_preview<S: Surface>(&self, painter: &mut Painter<'_, S>) {
        if let Some(base) = &self.base {
            if self.viewport.window().contains(base) {
                let color = painter.palette().p;
                painter.draw_real_point(base, color, self.multiplication_labels.then(|| "P"));
            }
        }
    }
}
