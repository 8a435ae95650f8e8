use serde::{Deserialize, Serialize};
use std::fmt;

/// A point of a curve over a prime field. Only the coordinates (or the fact
/// that the point is the identity) are authoritative; the display string is
/// always derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPoint {
    Infinity,
    Affine { x: u64, y: u64 },
}

impl FieldPoint {
    pub fn new(x: u64, y: u64) -> Self {
        Self::Affine { x, y }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    pub fn coordinates(&self) -> Option<(u64, u64)> {
        match self {
            Self::Infinity => None,
            Self::Affine { x, y } => Some((*x, *y)),
        }
    }

    /// Domain-space position, `None` for the identity which has none.
    pub fn to_domain(&self) -> Option<RealPoint> {
        self.coordinates()
            .map(|(x, y)| RealPoint::new(x as f64, y as f64))
    }
}

impl fmt::Display for FieldPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Infinity => write!(f, "O"),
            Self::Affine { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}

/// A point of a curve over the reals. The identity is modelled as
/// `Option::<RealPoint>::None` by the callers that can produce it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealPoint {
    pub x: f64,
    pub y: f64,
}

impl RealPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reflection across the x axis.
    pub fn mirrored(&self) -> Self {
        Self::new(self.x, -self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
