mod bound;
mod curve;
mod expr;
mod record;
mod segment;

pub use bound::Bound;
pub use curve::Curve;
pub use expr::{Expr, Function, Symbol};
pub use record::SegmentRecord;
pub use segment::Segment;

/// Exact rational numbers used for every numeric literal and folded constant.
pub type Rational = num_rational::BigRational;
