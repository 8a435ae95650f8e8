//! Time-driven reveal sessions, one [`Sequencer`] per canvas.
//!
//! A session is sampled with the timestamp of every display frame and yields
//! the state that frame should draw. Every start or cancel bumps the
//! sequencer's generation; a frame callback carrying an older generation is
//! answered with [`Tick::Stale`] and must not draw.
use crate::easing::{ease_in_out_cubic, ease_out_cubic, phase};
use serde::Deserialize;

pub type Generation = u64;

/// Durations of the four real addition phases, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub line: f64,
    pub hold: f64,
    pub reflect: f64,
    pub reveal: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            line: 1000.0,
            hold: 300.0,
            reflect: 900.0,
            reveal: 400.0,
        }
    }
}

impl PhaseDurations {
    pub fn total(&self) -> f64 {
        self.line + self.hold + self.reflect + self.reveal
    }

    pub fn is_valid(&self) -> bool {
        let parts = [self.line, self.hold, self.reflect, self.reveal];
        parts.iter().all(|d| d.is_finite() && *d >= 0.0) && self.total() > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationKind {
    /// Continuous curve drawn left to right.
    CurveReveal { duration: f64 },
    /// Enumerated finite-field points appearing in order.
    PointReveal { duration: f64, total: usize },
    /// Multiples `1P..kP` appearing one per `interval`.
    MultiplicationReveal { interval: f64, total: usize },
    /// Chord or tangent, hold, reflection, result.
    AdditionConstruction { phases: PhaseDurations },
    /// Finite-field addition: operands, connecting segment, result.
    FieldAddition { duration: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructionPhase {
    Line,
    Hold,
    Reflect,
    Reveal,
}

/// Progress values of one real addition frame, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstructionFrame {
    pub phase: ConstructionPhase,
    pub line: f64,
    /// Opacity of `-R`, fading in once the line is complete.
    pub mirror: f64,
    pub reflect: f64,
    pub reveal: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldAdditionFrame {
    pub operands: f64,
    pub segment: f64,
    pub result: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameState {
    Curve { progress: f64 },
    Points { shown: usize, progress: f64 },
    /// `fresh` is how far the newest multiple has faded in.
    Multiples { shown: usize, fresh: f64 },
    Construction(ConstructionFrame),
    FieldAddition(FieldAdditionFrame),
}

fn ratio(elapsed: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (elapsed / duration).min(1.0)
    } else {
        1.0
    }
}

impl AnimationKind {
    /// The state to draw `elapsed` milliseconds in, `None` once the session
    /// is over and the static scene takes the canvas back.
    pub fn sample(&self, elapsed: f64) -> Option<FrameState> {
        let elapsed = elapsed.max(0.0);
        match *self {
            Self::CurveReveal { duration } => {
                let progress = ratio(elapsed, duration);
                (progress < 1.0).then(|| FrameState::Curve { progress })
            }
            Self::PointReveal { duration, total } => {
                let raw = ratio(elapsed, duration);
                let shown = (ease_out_cubic(raw) * total as f64).ceil() as usize;
                (raw < 1.0).then(|| FrameState::Points {
                    shown: shown.min(total),
                    progress: raw,
                })
            }
            Self::MultiplicationReveal { interval, total } => {
                let steps = if interval > 0.0 {
                    elapsed / interval
                } else {
                    f64::INFINITY
                };
                let shown = if steps.is_finite() {
                    (steps.floor() as usize).saturating_add(1).min(total)
                } else {
                    total
                };
                (shown < total).then(|| FrameState::Multiples {
                    shown,
                    fresh: steps.fract(),
                })
            }
            Self::AdditionConstruction { phases } => {
                if elapsed >= phases.total() {
                    return None;
                }
                let reflect_at = phases.line + phases.hold;
                let reveal_at = reflect_at + phases.reflect;
                let current = if elapsed < phases.line {
                    ConstructionPhase::Line
                } else if elapsed < reflect_at {
                    ConstructionPhase::Hold
                } else if elapsed < reveal_at {
                    ConstructionPhase::Reflect
                } else {
                    ConstructionPhase::Reveal
                };
                Some(FrameState::Construction(ConstructionFrame {
                    phase: current,
                    line: ease_in_out_cubic(ratio(elapsed, phases.line)),
                    mirror: if elapsed > phases.line {
                        ease_out_cubic(ratio(elapsed - phases.line, phases.hold))
                    } else {
                        0.0
                    },
                    reflect: ease_in_out_cubic(phase(elapsed, reflect_at, reveal_at)),
                    reveal: phase(elapsed, reveal_at, phases.total()),
                }))
            }
            Self::FieldAddition { duration } => {
                let t = ratio(elapsed, duration);
                (t < 1.0).then(|| {
                    FrameState::FieldAddition(FieldAdditionFrame {
                        operands: phase(t, 0.0, 0.25),
                        segment: ease_in_out_cubic(phase(t, 0.25, 0.55)),
                        result: phase(t, 0.55, 1.0),
                    })
                })
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// The callback belongs to a cancelled or replaced session.
    Stale,
    Running(FrameState),
    /// The session just ended; draw the static scene.
    Finished,
}

#[derive(Clone, Copy, Debug)]
struct Active {
    kind: AnimationKind,
    started: f64,
    elapsed: f64,
    state: Option<FrameState>,
}

#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    generation: Generation,
    active: Option<Active>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replaces any running session.
    pub fn start(&mut self, kind: AnimationKind, now: f64) -> Generation {
        self.generation = self.generation.wrapping_add(1);
        self.active = Some(Active {
            kind,
            started: now,
            elapsed: 0.0,
            state: None,
        });
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<&AnimationKind> {
        self.active.as_ref().map(|a| &a.kind)
    }

    /// State drawn by the latest frame of the running session.
    pub fn current_state(&self) -> Option<&FrameState> {
        self.active.as_ref().and_then(|a| a.state.as_ref())
    }

    /// Advances the session to `now`. Elapsed time never goes backwards.
    pub fn tick(&mut self, generation: Generation, now: f64) -> Tick {
        if generation != self.generation {
            return Tick::Stale;
        }
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return Tick::Stale,
        };
        let elapsed = now - active.started;
        if elapsed > active.elapsed {
            active.elapsed = elapsed;
        }
        match active.kind.sample(active.elapsed) {
            Some(state) => {
                active.state = Some(state);
                Tick::Running(state)
            }
            None => {
                self.active = None;
                Tick::Finished
            }
        }
    }
}
