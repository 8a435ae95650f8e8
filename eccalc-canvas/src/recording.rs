use crate::mapper::ScreenPoint;
use crate::surface::{Paint, Stroke, Surface, TextStyle};
use crate::theme::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetTransform(f64),
    Clear {
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        stroke: Stroke,
    },
    Arc {
        center: ScreenPoint,
        radius: f64,
        paint: Paint,
    },
    Text {
        text: String,
        at: ScreenPoint,
        style: TextStyle,
    },
}

/// A [`Surface`] that keeps every command it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Centers of arcs filled with `color`.
    pub fn filled_arcs(&self, color: Color) -> Vec<ScreenPoint> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc {
                    center,
                    paint: Paint::Fill(fill),
                    ..
                } if *fill == color => Some(*center),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self, color: Color) -> Vec<(ScreenPoint, ScreenPoint)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, stroke } if stroke.color == color => {
                    Some((*from, *to))
                }
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn set_transform(&mut self, scale: f64) {
        self.commands.push(DrawCommand::SetTransform(scale));
    }

    fn clear(&mut self, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::Clear {
            width,
            height,
            color,
        });
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn draw_arc(&mut self, center: ScreenPoint, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            paint: *paint,
        });
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            style: *style,
        });
    }
}
