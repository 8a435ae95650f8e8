//! The calculator's canvas state in one place.
//!
//! Every entry point mutates state synchronously and, where an animation is
//! involved, asks the [`FrameScheduler`] for the next frame. Drawing only
//! happens in [`Session::render`] and [`Session::frame`], so a frame callback
//! never observes a half-applied update.
use crate::animation::{AnimationKind, Generation, Sequencer, Tick};
use crate::canvas::{CanvasId, Family};
use crate::config::RenderConfig;
use crate::curve::{FieldCurve, RealCurve};
use crate::gesture::PanGesture;
use crate::hit::{nearest_point, pick_on_curve};
use crate::mapper::{CanvasBox, PlotRect, Projection, ScreenPoint, Window};
use crate::payload::{AdditionResponse, RealInitResponse, ScalarResponse};
use crate::point::{FieldPoint, RealPoint};
use crate::render::Painter;
use crate::scene::{FieldAddition, FieldScene, PickSlot, RealScene};
use crate::scheduler::FrameScheduler;
use crate::surface::Surface;
use crate::theme::Theme;
use crate::viewport::{SpanLimits, Viewport};
use crate::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The callback was for a cancelled or replaced animation; nothing drawn.
    Stale,
    /// A frame was drawn and the next one requested.
    Running,
    /// The animation ended and the static scene was drawn.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    /// The click ended a pan and was ignored.
    Suppressed,
    /// Index of the enumerated point hit, if any.
    Field(Option<usize>),
    /// The curve point picked, if any.
    Real(Option<RealPoint>),
}

#[derive(Clone, Debug)]
pub struct Session {
    config: RenderConfig,
    theme: Theme,
    field: FieldScene,
    real: RealScene,
    sequencers: [Sequencer; CanvasId::COUNT],
    gesture: PanGesture,
}

impl Session {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let v = &config.viewport;
        let viewport = Viewport::new(
            Window::symmetric(v.half_range, v.half_range)?,
            SpanLimits::new(v.min_span, v.max_span)?,
        )?;
        let real = RealScene::new(viewport, config.curve_samples);
        Ok(Self {
            config,
            theme: Theme::default(),
            field: FieldScene::default(),
            real,
            sequencers: Default::default(),
            gesture: PanGesture::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn field(&self) -> &FieldScene {
        &self.field
    }

    pub fn real(&self) -> &RealScene {
        &self.real
    }

    pub fn sequencer(&self, canvas: CanvasId) -> &Sequencer {
        &self.sequencers[canvas.index()]
    }

    pub fn is_animating(&self, canvas: CanvasId) -> bool {
        self.sequencer(canvas).is_active()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_show_labels(&mut self, canvas: CanvasId, on: bool) {
        match canvas.family() {
            Family::Field => self.field.set_labels(canvas, on),
            Family::Real => self.real.set_labels(canvas, on),
        }
    }

    fn start<F: FrameScheduler>(
        &mut self,
        canvas: CanvasId,
        kind: AnimationKind,
        now: f64,
        scheduler: &mut F,
    ) -> Generation {
        let generation = self.sequencers[canvas.index()].start(kind, now);
        scheduler.request_frame(canvas, generation);
        generation
    }

    /// Stops whatever runs on `canvas`; a callback already in flight for it
    /// comes back stale.
    pub fn cancel<F: FrameScheduler>(&mut self, canvas: CanvasId, scheduler: &mut F) {
        self.sequencers[canvas.index()].cancel();
        scheduler.cancel_frame(canvas);
    }

    /// New enumerated points: both finite-field canvases reveal them.
    pub fn load_field_curve<F: FrameScheduler>(
        &mut self,
        curve: FieldCurve,
        points: Vec<FieldPoint>,
        now: f64,
        scheduler: &mut F,
    ) {
        let total = points.len();
        self.field.load(curve, points);
        let duration = self.config.timing.point_reveal(total);
        for canvas in CanvasId::of_family(Family::Field) {
            if total == 0 {
                self.cancel(canvas, scheduler);
            } else {
                self.start(canvas, AnimationKind::PointReveal { duration, total }, now, scheduler);
            }
        }
    }

    pub fn show_field_addition<F: FrameScheduler>(
        &mut self,
        p_index: usize,
        q_index: usize,
        response: &AdditionResponse,
        now: f64,
        scheduler: &mut F,
    ) -> Result<(), RenderError> {
        let p = self.field.point(p_index)?;
        let q = self.field.point(q_index)?;
        let r = response.field_result()?;
        self.field.set_addition(FieldAddition { p, q, r });
        let duration = self.config.timing.field_addition;
        let kind = AnimationKind::FieldAddition { duration };
        self.start(CanvasId::FieldAddition, kind, now, scheduler);
        Ok(())
    }

    pub fn show_field_multiplication<F: FrameScheduler>(
        &mut self,
        point_index: usize,
        response: &ScalarResponse,
        now: f64,
        scheduler: &mut F,
    ) -> Result<(), RenderError> {
        self.field.point(point_index)?;
        let multiples = response.field_multiples()?;
        let total = multiples.len();
        self.field.set_multiples(point_index, multiples);
        let canvas = CanvasId::FieldMultiplication;
        if total == 0 {
            self.cancel(canvas, scheduler);
        } else {
            let interval = self.config.timing.field_multiple_interval;
            let kind = AnimationKind::MultiplicationReveal { interval, total };
            self.start(canvas, kind, now, scheduler);
        }
        Ok(())
    }

    /// Switches the real canvases to a new curve, resetting the viewport to
    /// the range the server reported. The curve canvas redraws progressively.
    pub fn load_real_curve<F: FrameScheduler>(
        &mut self,
        curve: RealCurve,
        response: &RealInitResponse,
        now: f64,
        scheduler: &mut F,
    ) -> Result<(), RenderError> {
        let range = response.window()?;
        self.real.load(curve, range)?;
        self.cancel(CanvasId::RealAddition, scheduler);
        self.cancel(CanvasId::RealMultiplication, scheduler);
        let duration = self.config.timing.curve_reveal;
        self.start(CanvasId::RealCurve, AnimationKind::CurveReveal { duration }, now, scheduler);
        Ok(())
    }

    pub fn set_real_operand<F: FrameScheduler>(
        &mut self,
        slot: PickSlot,
        point: RealPoint,
        scheduler: &mut F,
    ) {
        self.real.set_operand(slot, point);
        self.cancel(CanvasId::RealAddition, scheduler);
    }

    pub fn set_real_multiplication_base<F: FrameScheduler>(
        &mut self,
        point: RealPoint,
        scheduler: &mut F,
    ) {
        self.real.set_base(point);
        self.cancel(CanvasId::RealMultiplication, scheduler);
    }

    pub fn show_real_addition<F: FrameScheduler>(
        &mut self,
        response: &AdditionResponse,
        now: f64,
        scheduler: &mut F,
    ) -> Result<(), RenderError> {
        let r = response.real_result()?;
        self.real.set_addition_result(r)?;
        let phases = self.config.timing.real_addition;
        let kind = AnimationKind::AdditionConstruction { phases };
        self.start(CanvasId::RealAddition, kind, now, scheduler);
        Ok(())
    }

    pub fn show_real_multiplication<F: FrameScheduler>(
        &mut self,
        response: &ScalarResponse,
        now: f64,
        scheduler: &mut F,
    ) -> Result<(), RenderError> {
        let multiples = response.real_multiples()?;
        let total = multiples.len();
        self.real.set_multiples(multiples);
        let canvas = CanvasId::RealMultiplication;
        if total == 0 {
            self.cancel(canvas, scheduler);
        } else {
            let interval = self.config.timing.real_multiple_interval;
            let kind = AnimationKind::MultiplicationReveal { interval, total };
            self.start(canvas, kind, now, scheduler);
        }
        Ok(())
    }

    fn window(&self, canvas: CanvasId) -> Window {
        match canvas.family() {
            Family::Field => self.field.window(),
            Family::Real => self.real.window(),
        }
    }

    fn projection(
        &self,
        canvas: CanvasId,
        canvas_box: CanvasBox,
    ) -> Result<Projection, RenderError> {
        Projection::for_canvas(self.window(canvas), canvas_box, self.config.layout.padding)
    }

    fn painter<'a, S: Surface>(
        &self,
        canvas: CanvasId,
        surface: &'a mut S,
        canvas_box: CanvasBox,
    ) -> Result<Painter<'a, S>, RenderError> {
        Painter::begin(
            surface,
            canvas_box,
            self.window(canvas),
            self.theme.palette(),
            self.config.layout,
        )
    }

    /// Redraws `canvas` from current state. A running animation keeps its
    /// latest frame so an out-of-band redraw (theme, labels, resize) doesn't
    /// flash the final scene.
    pub fn render<S: Surface>(
        &self,
        canvas: CanvasId,
        surface: &mut S,
        canvas_box: CanvasBox,
    ) -> Result<(), RenderError> {
        let sequencer = self.sequencer(canvas);
        let state = sequencer
            .current_state()
            .copied()
            .or_else(|| sequencer.kind().and_then(|kind| kind.sample(0.0)));
        let mut painter = self.painter(canvas, surface, canvas_box)?;
        match (canvas.family(), state) {
            (Family::Field, Some(state)) => self.field.draw_frame(canvas, &mut painter, &state),
            (Family::Field, None) => self.field.draw_static(canvas, &mut painter),
            (Family::Real, Some(state)) => self.real.draw_frame(canvas, &mut painter, &state),
            (Family::Real, None) => self.real.draw_static(canvas, &mut painter),
        }
        Ok(())
    }

    /// Display-frame entry point for the callback requested with
    /// `generation`.
    pub fn frame<S: Surface, F: FrameScheduler>(
        &mut self,
        canvas: CanvasId,
        generation: Generation,
        now: f64,
        surface: &mut S,
        canvas_box: CanvasBox,
        scheduler: &mut F,
    ) -> Result<FrameStatus, RenderError> {
        match self.sequencers[canvas.index()].tick(generation, now) {
            Tick::Stale => Ok(FrameStatus::Stale),
            Tick::Running(_) => {
                scheduler.request_frame(canvas, generation);
                self.render(canvas, surface, canvas_box)?;
                Ok(FrameStatus::Running)
            }
            Tick::Finished => {
                self.render(canvas, surface, canvas_box)?;
                Ok(FrameStatus::Finished)
            }
        }
    }

    /// Resolves a click at CSS-pixel position `at` and applies it: finite
    /// field canvases select the nearest point, the real addition canvas
    /// fills the next operand and the real multiplication canvas sets the
    /// base point. Hitting a point on the finite-field addition canvas
    /// replays the addition shown there.
    pub fn click<F: FrameScheduler>(
        &mut self,
        canvas: CanvasId,
        at: ScreenPoint,
        canvas_box: CanvasBox,
        now: f64,
        scheduler: &mut F,
    ) -> Result<ClickOutcome, RenderError> {
        let projection = self.projection(canvas, canvas_box)?;
        match canvas.family() {
            Family::Field => {
                let threshold = self.config.hit_threshold_px;
                let hit = nearest_point(at, self.field.points(), &projection, threshold);
                if self.field.select(canvas, hit) {
                    self.cancel(canvas, scheduler);
                }
                let replay = canvas == CanvasId::FieldAddition
                    && hit.is_some()
                    && self.field.addition().is_some();
                if replay {
                    let duration = self.config.timing.field_addition;
                    let kind = AnimationKind::FieldAddition { duration };
                    self.start(canvas, kind, now, scheduler);
                }
                Ok(ClickOutcome::Field(hit))
            }
            Family::Real => {
                if self.gesture.consume_click() {
                    return Ok(ClickOutcome::Suppressed);
                }
                let picked = pick_on_curve(at, self.real.curve(), &projection);
                if let Some(point) = picked {
                    match canvas {
                        CanvasId::RealAddition => {
                            self.real.pick(point);
                            self.cancel(canvas, scheduler);
                        }
                        CanvasId::RealMultiplication => {
                            self.set_real_multiplication_base(point, scheduler)
                        }
                        _ => {}
                    }
                }
                Ok(ClickOutcome::Real(picked))
            }
        }
    }

    /// Wheel zoom anchored at the cursor; negative `delta_y` zooms in.
    /// Returns whether the shared real window changed.
    pub fn zoom(
        &mut self,
        canvas: CanvasId,
        at: ScreenPoint,
        delta_y: f64,
        canvas_box: CanvasBox,
    ) -> Result<bool, RenderError> {
        if canvas.family() != Family::Real || delta_y == 0.0 || delta_y.is_nan() {
            return Ok(false);
        }
        let scale = if delta_y < 0.0 {
            self.config.viewport.zoom_in
        } else {
            self.config.viewport.zoom_out
        };
        let plot = PlotRect::new(canvas_box, self.config.layout.padding)?;
        Ok(self.real.viewport_mut().zoom_at(at, scale, &plot))
    }

    pub fn pan_start(&mut self, canvas: CanvasId, at: ScreenPoint) {
        if canvas.family() == Family::Real {
            self.gesture.start(canvas, at);
        }
    }

    /// Follows the pointer while a pan is in progress. Returns whether the
    /// shared real window moved.
    pub fn pan_move(
        &mut self,
        at: ScreenPoint,
        canvas_box: CanvasBox,
    ) -> Result<bool, RenderError> {
        let (dx, dy) = match self.gesture.update(at) {
            Some(delta) => delta,
            None => return Ok(false),
        };
        let plot = PlotRect::new(canvas_box, self.config.layout.padding)?;
        Ok(self.real.viewport_mut().pan_by(dx, dy, &plot))
    }

    pub fn pan_end(&mut self) {
        self.gesture.end(self.config.pan_click_threshold_px);
    }

    /// Canvas the pan in progress started on.
    pub fn panning(&self) -> Option<CanvasId> {
        self.gesture.canvas()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::recording::RecordingSurface;
    use crate::scheduler::ManualScheduler;

    fn session() -> Session {
        Session::new(RenderConfig::default()).unwrap()
    }

    fn canvas_box() -> CanvasBox {
        CanvasBox::new(600.0, 600.0)
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = RenderConfig::default();
        config.curve_samples = 0;
        assert!(matches!(Session::new(config), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn default_real_window() {
        let session = session();
        assert_eq!(session.real().window(), Window::symmetric(10.0, 10.0).unwrap());
    }

    #[test]
    fn field_load_reveals_on_both_canvases() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        session.load_field_curve(
            FieldCurve::new(2, 3, 97),
            vec![FieldPoint::Infinity, FieldPoint::new(3, 6)],
            0.0,
            &mut scheduler,
        );
        assert!(session.is_animating(CanvasId::FieldAddition));
        assert!(session.is_animating(CanvasId::FieldMultiplication));
        assert_eq!(scheduler.take().len(), 2);

        // an empty point set has nothing to reveal
        session.load_field_curve(FieldCurve::new(2, 3, 97), vec![], 0.0, &mut scheduler);
        assert!(!session.is_animating(CanvasId::FieldAddition));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn unknown_point_index_is_rejected() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        let points = vec![FieldPoint::new(3, 6)];
        session.load_field_curve(FieldCurve::new(2, 3, 97), points, 0.0, &mut scheduler);
        let response = AdditionResponse::default();
        assert_eq!(
            session.show_field_addition(0, 4, &response, 0.0, &mut scheduler),
            Err(RenderError::UnknownPoint(4))
        );
    }

    #[test]
    fn frame_runs_to_completion() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new();
        let init = RealInitResponse::default();
        session
            .load_real_curve(RealCurve::default(), &init, 0.0, &mut scheduler)
            .unwrap();
        assert!(scheduler.pending(CanvasId::RealCurve).is_some());

        let mut now = 0.0;
        let mut last = None;
        while let Some((canvas, generation)) = scheduler.take().into_iter().next() {
            now += 16.0;
            assert!(now < 10_000.0);
            last = Some(
                session
                    .frame(canvas, generation, now, &mut surface, canvas_box(), &mut scheduler)
                    .unwrap(),
            );
        }
        assert_eq!(last, Some(FrameStatus::Finished));
        assert!(!session.is_animating(CanvasId::RealCurve));
    }

    #[test]
    fn wheel_zooms_only_real_canvases() {
        let mut session = session();
        let center = ScreenPoint::new(300.0, 300.0);
        assert!(!session.zoom(CanvasId::FieldAddition, center, -100.0, canvas_box()).unwrap());
        assert!(session.zoom(CanvasId::RealCurve, center, -100.0, canvas_box()).unwrap());
        let span = session.real().window().x_span();
        assert!((span - 17.0).abs() < 1e-9);
        assert!(session.zoom(CanvasId::RealAddition, center, 100.0, canvas_box()).unwrap());
        assert!((session.real().window().x_span() - 17.0 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn drag_suppresses_the_following_click() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        session.pan_start(CanvasId::RealAddition, ScreenPoint::new(300.0, 300.0));
        assert_eq!(session.panning(), Some(CanvasId::RealAddition));
        assert!(session.pan_move(ScreenPoint::new(350.0, 300.0), canvas_box()).unwrap());
        session.pan_end();
        let at = ScreenPoint::new(350.0, 300.0);
        let click = session
            .click(CanvasId::RealAddition, at, canvas_box(), 0.0, &mut scheduler)
            .unwrap();
        assert_eq!(click, ClickOutcome::Suppressed);
        assert_eq!(session.real().operand(PickSlot::P), None);
    }

    #[test]
    fn clicking_a_point_replays_the_shown_addition() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        let points = vec![FieldPoint::new(3, 6), FieldPoint::new(80, 10)];
        session.load_field_curve(FieldCurve::new(2, 3, 97), points, 0.0, &mut scheduler);
        let projection = Projection::for_canvas(Window::field(97), canvas_box(), 50.0).unwrap();
        let on_point = projection.to_screen(&RealPoint::new(3.0, 6.0));
        let far = ScreenPoint::new(on_point.x + 200.0, on_point.y);

        // no addition yet: only the selection changes
        session.cancel(CanvasId::FieldAddition, &mut scheduler);
        let canvas = CanvasId::FieldAddition;
        session.click(canvas, on_point, canvas_box(), 0.0, &mut scheduler).unwrap();
        assert!(!session.is_animating(canvas));
        assert!(scheduler.pending(canvas).is_none());

        let response: AdditionResponse = serde_json::from_str(
            r#"{"success": true, "result": {"x": 80, "y": 87, "display": "(80, 87)"}}"#,
        )
        .unwrap();
        session.show_field_addition(0, 1, &response, 0.0, &mut scheduler).unwrap();
        session.cancel(canvas, &mut scheduler);

        session.click(canvas, far, canvas_box(), 5000.0, &mut scheduler).unwrap();
        assert!(!session.is_animating(canvas));

        let outcome = session
            .click(canvas, on_point, canvas_box(), 5000.0, &mut scheduler)
            .unwrap();
        assert_eq!(outcome, ClickOutcome::Field(Some(0)));
        assert!(session.is_animating(canvas));
        assert!(scheduler.pending(canvas).is_some());

        // the multiplication canvas never replays the addition
        let canvas = CanvasId::FieldMultiplication;
        session.cancel(canvas, &mut scheduler);
        session.click(canvas, on_point, canvas_box(), 5000.0, &mut scheduler).unwrap();
        assert!(!session.is_animating(canvas));
    }

    #[test]
    fn field_render_with_a_modulus_near_u64_max() {
        let mut session = session();
        let mut scheduler = ManualScheduler::new();
        let curve = FieldCurve::new(0, 7, 18_446_744_073_709_551_557);
        session.load_field_curve(curve, vec![FieldPoint::new(3, 6)], 0.0, &mut scheduler);
        session.cancel(CanvasId::FieldAddition, &mut scheduler);
        let mut surface = RecordingSurface::new();
        session
            .render(CanvasId::FieldAddition, &mut surface, canvas_box())
            .unwrap();
        assert!(surface.texts().contains(&"0"));
    }

    #[test]
    fn degenerate_canvas_is_an_error() {
        let session = session();
        let mut surface = RecordingSurface::new();
        assert!(matches!(
            session.render(CanvasId::RealCurve, &mut surface, CanvasBox::new(80.0, 600.0)),
            Err(RenderError::DegenerateCanvas { .. })
        ));
    }
}
