use serde::Deserialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Self::Light => Palette::LIGHT,
            Self::Dark => Palette::DARK,
        }
    }
}

/// An sRGB colour with its own opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with its opacity multiplied by `factor` (clamped to 0..1).
    pub fn with_alpha(self, factor: f64) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        Self {
            a: self.a * factor,
            ..self
        }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub border: Color,
    pub grid: Color,
    pub tick_label: Color,
    pub axis: Color,
    pub title: Color,
    pub curve: Color,
    pub field_point: Color,
    pub p: Color,
    pub q: Color,
    pub r: Color,
    pub neg_r: Color,
    pub selected: Color,
    pub construction: Color,
    pub multiples: Color,
    pub label: Color,
    pub label_shadow: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::rgb(0xff, 0xff, 0xff),
        border: Color::rgb(0xdd, 0xdd, 0xdd),
        grid: Color::rgba(0, 0, 0, 0.06),
        tick_label: Color::rgb(0x66, 0x66, 0x66),
        axis: Color::rgb(0x55, 0x55, 0x55),
        title: Color::rgb(0x88, 0x88, 0x88),
        curve: Color::rgb(0x8a, 0x8a, 0x8a),
        field_point: Color::rgb(0x8a, 0x8a, 0x8a),
        p: Color::rgb(0x25, 0x63, 0xeb),
        q: Color::rgb(0xf9, 0x73, 0x16),
        r: Color::rgb(0x16, 0x65, 0x34),
        neg_r: Color::rgb(0x9c, 0xa3, 0xaf),
        selected: Color::rgb(0xf4, 0x43, 0x36),
        construction: Color::rgb(0x60, 0xa5, 0xfa),
        multiples: Color::rgb(0x64, 0x74, 0x8b),
        label: Color::rgb(0x11, 0x18, 0x27),
        label_shadow: Color::rgba(255, 255, 255, 0.85),
    };

    pub const DARK: Palette = Palette {
        background: Color::rgb(0x1e, 0x1e, 0x1e),
        border: Color::rgb(0x44, 0x44, 0x44),
        grid: Color::rgba(255, 255, 255, 0.08),
        tick_label: Color::rgb(0xaa, 0xaa, 0xaa),
        axis: Color::rgb(0xbb, 0xbb, 0xbb),
        title: Color::rgb(0x99, 0x99, 0x99),
        curve: Color::rgb(0xa3, 0xa3, 0xa3),
        field_point: Color::rgb(0xa3, 0xa3, 0xa3),
        p: Color::rgb(0x60, 0xa5, 0xfa),
        q: Color::rgb(0xfb, 0x92, 0x3c),
        r: Color::rgb(0x4a, 0xde, 0x80),
        neg_r: Color::rgb(0x6b, 0x72, 0x80),
        selected: Color::rgb(0xef, 0x53, 0x50),
        construction: Color::rgb(0x93, 0xc5, 0xfd),
        multiples: Color::rgb(0x94, 0xa3, 0xb8),
        label: Color::rgb(0xe5, 0xe7, 0xeb),
        label_shadow: Color::rgba(0, 0, 0, 0.85),
    };
}
