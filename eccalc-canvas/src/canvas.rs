use crate::RenderError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Field,
    Real,
}

/// The five canvases of the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanvasId {
    FieldAddition,
    FieldMultiplication,
    RealCurve,
    RealAddition,
    RealMultiplication,
}

impl CanvasId {
    pub const ALL: [CanvasId; 5] = [
        CanvasId::FieldAddition,
        CanvasId::FieldMultiplication,
        CanvasId::RealCurve,
        CanvasId::RealAddition,
        CanvasId::RealMultiplication,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            Self::FieldAddition => "additionCanvas",
            Self::FieldMultiplication => "multiplicationCanvas",
            Self::RealCurve => "realCurveCanvas",
            Self::RealAddition => "realAdditionCanvas",
            Self::RealMultiplication => "realMultiplicationCanvas",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Self::FieldAddition | Self::FieldMultiplication => Family::Field,
            _ => Family::Real,
        }
    }

    pub fn of_family(family: Family) -> impl Iterator<Item = CanvasId> {
        Self::ALL.into_iter().filter(move |c| c.family() == family)
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for CanvasId {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.element_id() == s)
            .ok_or_else(|| RenderError::UnknownCanvas(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn element_ids_round_trip() {
        for canvas in CanvasId::ALL {
            assert_eq!(canvas.element_id().parse::<CanvasId>(), Ok(canvas));
            assert_eq!(CanvasId::ALL[canvas.index()], canvas);
        }
        assert_eq!(
            "nope".parse::<CanvasId>(),
            Err(RenderError::UnknownCanvas("nope".to_owned()))
        );
    }

    #[test]
    fn families() {
        assert_eq!(CanvasId::of_family(Family::Field).count(), 2);
        assert_eq!(CanvasId::of_family(Family::Real).count(), 3);
    }
}
