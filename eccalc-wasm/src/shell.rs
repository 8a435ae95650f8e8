use crate::scheduler::RafScheduler;
use crate::surface::CanvasSurface;
use eccalc_canvas::{
    CanvasBox, CanvasId, Family, FrameScheduler, Generation, RenderError, Session, Surface,
};

/// Everything the exported calculator object owns: the session, one surface
/// per canvas and the frame scheduler.
pub struct Shell {
    pub(crate) session: Session,
    pub(crate) scheduler: RafScheduler,
    surfaces: Vec<Option<CanvasSurface>>,
}

/// Render failures are reported, never thrown: the next redraw heals them.
/// A canvas that is hidden or not laid out yet is silently skipped.
pub(crate) fn report(context: &str, result: Result<(), RenderError>) {
    match result {
        Ok(()) | Err(RenderError::DegenerateCanvas { .. }) => {}
        Err(e) => web_sys::console::warn_1(&format!("{}: {}", context, e).into()),
    }
}

fn surface(surfaces: &mut [Option<CanvasSurface>], canvas: CanvasId) -> Option<&mut CanvasSurface> {
    let slot = surfaces.get_mut(canvas.index())?;
    if slot.is_none() {
        match CanvasSurface::attach(canvas) {
            Ok(attached) => *slot = Some(attached),
            Err(e) => {
                web_sys::console::warn_1(&format!("{}: {}", canvas, e).into());
                return None;
            }
        }
    }
    slot.as_mut()
}

/// Runs one fired frame. Without a surface to draw on the animation is
/// cancelled, since its frame request has already been used up.
pub(crate) fn run_frame<S: Surface, F: FrameScheduler>(
    session: &mut Session,
    scheduler: &mut F,
    canvas: CanvasId,
    generation: Generation,
    now: f64,
    target: Option<(&mut S, CanvasBox)>,
) -> Result<(), RenderError> {
    match target {
        Some((surface, canvas_box)) => session
            .frame(canvas, generation, now, surface, canvas_box, scheduler)
            .map(|_| ()),
        None => {
            session.cancel(canvas, scheduler);
            Ok(())
        }
    }
}

impl Shell {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            scheduler: RafScheduler::default(),
            surfaces: CanvasId::ALL.iter().map(|_| None).collect(),
        }
    }

    pub fn apply<R>(&mut self, f: impl FnOnce(&mut Session, &mut RafScheduler) -> R) -> R {
        f(&mut self.session, &mut self.scheduler)
    }

    /// CSS size of `canvas`, resizing its backing store if needed.
    pub fn canvas_box(&mut self, canvas: CanvasId) -> Option<CanvasBox> {
        surface(&mut self.surfaces, canvas).map(|s| s.fit())
    }

    pub fn redraw(&mut self, canvas: CanvasId) {
        let surface = match surface(&mut self.surfaces, canvas) {
            Some(surface) => surface,
            None => return,
        };
        let canvas_box = surface.fit();
        report("redraw", self.session.render(canvas, surface, canvas_box));
    }

    pub fn redraw_family(&mut self, family: Family) {
        for canvas in CanvasId::of_family(family) {
            self.redraw(canvas);
        }
    }

    pub fn redraw_all(&mut self) {
        for canvas in CanvasId::ALL {
            self.redraw(canvas);
        }
    }

    pub fn on_frame(&mut self, canvas: CanvasId, now: f64) {
        let generation = match self.scheduler.fired(canvas) {
            Some(generation) => generation,
            None => return,
        };
        let target = surface(&mut self.surfaces, canvas).map(|surface| {
            let canvas_box = surface.fit();
            (surface, canvas_box)
        });
        let result = run_frame(
            &mut self.session,
            &mut self.scheduler,
            canvas,
            generation,
            now,
            target,
        );
        report("frame", result);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use eccalc_canvas::{FieldCurve, FieldPoint, ManualScheduler, RecordingSurface, RenderConfig};

    fn revealing() -> (Session, ManualScheduler) {
        let mut session = Session::new(RenderConfig::default()).unwrap();
        let mut scheduler = ManualScheduler::new();
        let points = vec![FieldPoint::new(3, 6), FieldPoint::new(80, 10)];
        session.load_field_curve(FieldCurve::new(2, 3, 97), points, 0.0, &mut scheduler);
        (session, scheduler)
    }

    #[test]
    fn missing_surface_ends_the_animation() {
        let (mut session, mut scheduler) = revealing();
        let canvas = CanvasId::FieldAddition;
        let generation = scheduler.pending(canvas).unwrap();
        scheduler.take();
        assert!(session.is_animating(canvas));

        let target: Option<(&mut RecordingSurface, CanvasBox)> = None;
        run_frame(&mut session, &mut scheduler, canvas, generation, 16.0, target).unwrap();
        assert!(!session.is_animating(canvas));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn frame_with_a_surface_keeps_running() {
        let (mut session, mut scheduler) = revealing();
        let canvas = CanvasId::FieldAddition;
        let generation = scheduler.pending(canvas).unwrap();
        scheduler.take();
        let mut surface = RecordingSurface::new();

        let target = Some((&mut surface, CanvasBox::new(600.0, 600.0)));
        run_frame(&mut session, &mut scheduler, canvas, generation, 16.0, target).unwrap();
        assert!(session.is_animating(canvas));
        assert_eq!(scheduler.pending(canvas), Some(generation));
        assert!(!surface.is_empty());
    }
}
