//! Short rate models.

mod hull_white;

pub use hull_white::HullWhite;
