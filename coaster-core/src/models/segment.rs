use super::{Bound, Expr};
use crate::parse::{self, FieldError};

/// One piece of a piecewise curve: a formula over `[start, end]`.
///
/// Segments are immutable once built. Their position in the containing
/// sequence determines adjacency; a segment knows nothing about its neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    formula: Expr,
    start: Bound,
    end: Bound,
}

impl Segment {
    /// Assemble a segment from already-parsed parts.
    ///
    /// No checks are performed here; see [`crate::Validator`].
    pub fn new(formula: Expr, start: Bound, end: Bound) -> Self {
        Self {
            formula,
            start,
            end,
        }
    }

    /// Parse a segment from its three text fields.
    pub fn parse(formula: &str, start: &str, end: &str) -> Result<Self, FieldError> {
        parse::segment(formula, start, end)
    }

    /// The formula, `y` as a function of the curve's variable
    pub fn formula(&self) -> &Expr {
        &self.formula
    }

    /// The start of the interval
    pub fn start(&self) -> &Bound {
        &self.start
    }

    /// The end of the interval
    pub fn end(&self) -> &Bound {
        &self.end
    }
}
