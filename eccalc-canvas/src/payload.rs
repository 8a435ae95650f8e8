//! Result payloads as delivered by the calculator API.
//!
//! Points travel as `{x, y, display}` with `null` coordinates for the
//! identity. Only the coordinates are trusted; `display` is ignored. A point
//! whose coordinates are unusable is dropped from lists rather than failing
//! the whole payload.
use crate::mapper::Window;
use crate::point::{FieldPoint, RealPoint};
use crate::RenderError;
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct WirePoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub display: String,
}

fn field_coordinate(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then(|| value as u64)
}

impl WirePoint {
    fn malformed(&self) -> RenderError {
        RenderError::MalformedPoint(format!("x = {:?}, y = {:?}", self.x, self.y))
    }

    pub fn to_field(&self) -> Result<FieldPoint, RenderError> {
        match (self.x, self.y) {
            (None, None) => Ok(FieldPoint::Infinity),
            (Some(x), Some(y)) => match (field_coordinate(x), field_coordinate(y)) {
                (Some(x), Some(y)) => Ok(FieldPoint::new(x, y)),
                _ => Err(self.malformed()),
            },
            _ => Err(self.malformed()),
        }
    }

    /// `Ok(None)` is the identity.
    pub fn to_real(&self) -> Result<Option<RealPoint>, RenderError> {
        match (self.x, self.y) {
            (None, None) => Ok(None),
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Some(RealPoint::new(x, y))),
            _ => Err(self.malformed()),
        }
    }
}

fn check(success: Option<bool>, error: &Option<String>) -> Result<(), RenderError> {
    match success {
        Some(false) => Err(RenderError::Payload(
            error.clone().unwrap_or_else(|| "request failed".to_owned()),
        )),
        _ => Ok(()),
    }
}

/// Enumerated points, either bare or wrapped as `{success, points, count}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointsResponse {
    List(Vec<WirePoint>),
    Envelope {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        points: Vec<WirePoint>,
        #[serde(default)]
        error: Option<String>,
    },
}

impl PointsResponse {
    pub fn field_points(&self) -> Result<Vec<FieldPoint>, RenderError> {
        let points = match self {
            Self::List(points) => points,
            Self::Envelope {
                success,
                points,
                error,
            } => {
                check(*success, error)?;
                points
            }
        };
        Ok(points.iter().filter_map(|p| p.to_field().ok()).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdditionResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub result: Option<WirePoint>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AdditionResponse {
    fn result(&self) -> Result<&WirePoint, RenderError> {
        check(self.success, &self.error)?;
        self.result
            .as_ref()
            .ok_or_else(|| RenderError::Payload("missing result".to_owned()))
    }

    pub fn field_result(&self) -> Result<FieldPoint, RenderError> {
        self.result()?.to_field()
    }

    pub fn real_result(&self) -> Result<Option<RealPoint>, RenderError> {
        self.result()?.to_real()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ScalarResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub result: Option<WirePoint>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub points: Option<Vec<WirePoint>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScalarResponse {
    /// `1P..kP` recovered from the step descriptions.
    pub fn field_multiples(&self) -> Result<Vec<FieldPoint>, RenderError> {
        check(self.success, &self.error)?;
        Ok(multiples_from_steps(&self.steps))
    }

    /// `1P..kP` from the explicit point list, identities kept in place.
    pub fn real_multiples(&self) -> Result<Vec<Option<RealPoint>>, RenderError> {
        check(self.success, &self.error)?;
        Ok(self
            .points
            .iter()
            .flatten()
            .filter_map(|p| p.to_real().ok())
            .collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct WireRange {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl WireRange {
    pub fn to_window(&self) -> Result<Window, RenderError> {
        Window::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RealInitResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub a: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
    #[serde(default)]
    pub range: Option<WireRange>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RealInitResponse {
    /// The window to reset to, `None` when the default range applies.
    pub fn window(&self) -> Result<Option<Window>, RenderError> {
        check(self.success, &self.error)?;
        self.range.as_ref().map(WireRange::to_window).transpose()
    }
}

/// Parses `"iP = (x, y)"` / `"iP = O"` lines. Lines of any other shape are
/// skipped.
pub fn multiples_from_steps<S: AsRef<str>>(steps: &[S]) -> Vec<FieldPoint> {
    steps
        .iter()
        .filter_map(|step| parse_multiple(step.as_ref()))
        .collect()
}

fn parse_multiple(step: &str) -> Option<FieldPoint> {
    let (_, value) = step.split_once('=')?;
    let value = value.trim();
    if value == "O" {
        return Some(FieldPoint::Infinity);
    }
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(FieldPoint::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
