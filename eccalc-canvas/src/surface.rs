//! The drawing capability the renderers are written against.
use crate::mapper::ScreenPoint;
use crate::theme::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `[dash, gap]` in CSS pixels, solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke(Stroke),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Rotation around the anchor, in radians.
    pub angle: f64,
}

impl TextStyle {
    pub fn new(font: &'static str, color: Color) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
            angle: 0.0,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// All coordinates are CSS pixels; `set_transform` installs the device pixel
/// ratio once per frame.
pub trait Surface {
    fn set_transform(&mut self, scale: f64);
    fn clear(&mut self, width: f64, height: f64, color: Color);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke);
    fn draw_arc(&mut self, center: ScreenPoint, radius: f64, paint: &Paint);
    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: &TextStyle);
}
