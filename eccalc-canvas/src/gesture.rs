use crate::canvas::CanvasId;
use crate::mapper::ScreenPoint;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    canvas: CanvasId,
    last: ScreenPoint,
    travelled: f64,
}

/// Drag tracking for the shared real viewport. A drag that travels further
/// than the click threshold swallows the click the browser fires on release.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanGesture {
    drag: Option<Drag>,
    moved: bool,
}

impl PanGesture {
    pub fn start(&mut self, canvas: CanvasId, at: ScreenPoint) {
        self.drag = Some(Drag {
            canvas,
            last: at,
            travelled: 0.0,
        });
        self.moved = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Canvas the drag started on.
    pub fn canvas(&self) -> Option<CanvasId> {
        self.drag.map(|d| d.canvas)
    }

    /// Pointer delta since the previous position, `None` when not dragging.
    pub fn update(&mut self, at: ScreenPoint) -> Option<(f64, f64)> {
        let drag = self.drag.as_mut()?;
        let dx = at.x - drag.last.x;
        let dy = at.y - drag.last.y;
        drag.last = at;
        drag.travelled += dx.abs() + dy.abs();
        self.moved = true;
        Some((dx, dy))
    }

    pub fn end(&mut self, click_threshold: f64) {
        if let Some(drag) = self.drag.take() {
            if drag.travelled < click_threshold {
                self.moved = false;
            }
        }
    }

    /// Whether the click being delivered should be ignored. Clears the flag.
    pub fn consume_click(&mut self) -> bool {
        std::mem::replace(&mut self.moved, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn long_drag_swallows_click() {
        let mut gesture = PanGesture::default();
        gesture.start(CanvasId::RealAddition, ScreenPoint::new(10.0, 10.0));
        assert_eq!(gesture.update(ScreenPoint::new(20.0, 5.0)), Some((10.0, -5.0)));
        gesture.end(3.0);
        assert!(!gesture.is_dragging());
        assert!(gesture.consume_click());
        assert!(!gesture.consume_click());
    }

    #[test]
    fn jitter_is_still_a_click() {
        let mut gesture = PanGesture::default();
        gesture.start(CanvasId::RealAddition, ScreenPoint::new(10.0, 10.0));
        gesture.update(ScreenPoint::new(11.0, 11.0));
        gesture.end(3.0);
        assert!(!gesture.consume_click());
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let mut gesture = PanGesture::default();
        assert_eq!(gesture.update(ScreenPoint::new(1.0, 1.0)), None);
        assert!(!gesture.consume_click());
    }
}
