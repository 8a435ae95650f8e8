#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

pub mod animation;
pub mod canvas;
pub mod config;
pub mod curve;
pub mod easing;
pub mod gesture;
pub mod grid;
pub mod hit;
pub mod mapper;
pub mod payload;
pub mod point;
pub mod recording;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use animation::{AnimationKind, FrameState, Generation, PhaseDurations, Sequencer, Tick};
pub use canvas::{CanvasId, Family};
pub use config::RenderConfig;
pub use curve::{ConstructionLine, FieldCurve, RealCurve};
pub use mapper::{CanvasBox, PlotRect, Projection, ScreenPoint, Window};
pub use point::{FieldPoint, RealPoint};
pub use recording::{DrawCommand, RecordingSurface};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use session::{ClickOutcome, FrameStatus, Session};
pub use surface::Surface;
pub use theme::Theme;
pub use viewport::{SpanLimits, Viewport};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("no drawable area on a {width}x{height} canvas")]
    DegenerateCanvas { width: f64, height: f64 },
    #[error("invalid range: x in [{x_min}, {x_max}], y in [{y_min}, {y_max}]")]
    InvalidRange {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    #[error("malformed point: {0}")]
    MalformedPoint(String),
    #[error("unusable payload: {0}")]
    Payload(String),
    #[error("no enumerated point at index {0}")]
    UnknownPoint(usize),
    #[error("operand {0} is not set")]
    MissingOperand(&'static str),
    #[error("unknown canvas `{0}`")]
    UnknownCanvas(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
