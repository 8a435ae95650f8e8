use crate::mapper::Window;
use crate::point::{FieldPoint, RealPoint};

// below this, coordinates are treated as equal / slopes as undefined
const SLOPE_EPSILON: f64 = 1e-12;

/// `y^2 = x^3 + ax + b (mod p)`. The discriminant is checked upstream; the
/// renderer draws whatever points it is handed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldCurve {
    pub a: i64,
    pub b: i64,
    pub p: u64,
}

impl FieldCurve {
    pub fn new(a: i64, b: i64, p: u64) -> Self {
        Self { a, b, p }
    }

    pub fn window(&self) -> Window {
        Window::field(self.p)
    }

    /// Whether both coordinates are proper field elements.
    pub fn admits(&self, point: &FieldPoint) -> bool {
        match point.coordinates() {
            None => true,
            Some((x, y)) => x < self.p && y < self.p,
        }
    }
}

/// `y^2 = x^3 + ax + b` over the reals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealCurve {
    pub a: f64,
    pub b: f64,
}

impl Default for RealCurve {
    fn default() -> Self {
        Self { a: -1.0, b: 1.0 }
    }
}

impl RealCurve {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn y_squared(&self, x: f64) -> f64 {
        x * x * x + self.a * x + self.b
    }

    /// The `(+sqrt, -sqrt)` pair at `x`, or `None` where the curve is not real.
    pub fn branches(&self, x: f64) -> Option<(f64, f64)> {
        let y2 = self.y_squared(x);
        if y2.is_finite() && y2 >= 0.0 {
            let y = y2.sqrt();
            Some((y, -y))
        } else {
            None
        }
    }
}

/// The chord through two points, or the tangent at a doubled point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstructionLine {
    Slope { m: f64, through: RealPoint },
    Vertical { x: f64 },
}

impl ConstructionLine {
    pub fn through(p: &RealPoint, q: &RealPoint, curve: &RealCurve) -> Self {
        let doubling = (p.x - q.x).abs() < SLOPE_EPSILON && (p.y - q.y).abs() < SLOPE_EPSILON;
        let m = if doubling {
            if p.y.abs() < SLOPE_EPSILON {
                None
            } else {
                Some((3.0 * p.x * p.x + curve.a) / (2.0 * p.y))
            }
        } else if (q.x - p.x).abs() < SLOPE_EPSILON {
            None
        } else {
            Some((q.y - p.y) / (q.x - p.x))
        };

        match m {
            Some(m) if m.is_finite() => Self::Slope { m, through: *p },
            _ => Self::Vertical { x: p.x },
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Vertical { .. })
    }

    pub fn y_at(&self, x: f64) -> Option<f64> {
        match self {
            Self::Slope { m, through } => Some(m * (x - through.x) + through.y),
            Self::Vertical { .. } => None,
        }
    }
}
