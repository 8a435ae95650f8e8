use crate::animation::Generation;
use crate::canvas::CanvasId;
use std::collections::BTreeMap;

/// "Call me back next frame." The callback must come back into the session's
/// frame entry point with the same canvas and generation. A new request for
/// a canvas replaces the pending one, so there is at most one per canvas.
pub trait FrameScheduler {
    fn request_frame(&mut self, canvas: CanvasId, generation: Generation);
    fn cancel_frame(&mut self, canvas: CanvasId);
}

/// Collects requests so a test can fire them with synthetic timestamps.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    pending: BTreeMap<CanvasId, Generation>,
    requested: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self, canvas: CanvasId) -> Option<Generation> {
        self.pending.get(&canvas).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Total number of requests ever made.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Drains every pending request, in canvas order.
    pub fn take(&mut self) -> Vec<(CanvasId, Generation)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, canvas: CanvasId, generation: Generation) {
        self.requested += 1;
        self.pending.insert(canvas, generation);
    }

    fn cancel_frame(&mut self, canvas: CanvasId) {
        self.pending.remove(&canvas);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_pending_request_per_canvas() {
        let mut scheduler = ManualScheduler::new();
        scheduler.request_frame(CanvasId::RealCurve, 1);
        scheduler.request_frame(CanvasId::RealCurve, 2);
        scheduler.request_frame(CanvasId::FieldAddition, 1);
        assert_eq!(scheduler.pending(CanvasId::RealCurve), Some(2));
        assert_eq!(scheduler.requested(), 3);
        scheduler.cancel_frame(CanvasId::FieldAddition);
        assert_eq!(scheduler.take(), vec![(CanvasId::RealCurve, 2)]);
        assert!(!scheduler.has_pending());
    }
}
