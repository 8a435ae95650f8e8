//! What each canvas shows: static scenes and animation frames.
mod field;
mod real;

pub use field::{FieldAddition, FieldScene};
pub use real::{PickSlot, RealScene};
