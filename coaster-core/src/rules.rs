//! Each rule is a pure predicate over one segment or one adjacent pair of
//! segments. Equality is always exact: values are compared in canonical
//! symbolic form, never within a floating-point tolerance.

use crate::models::{Bound, Expr, Symbol};

/// The formula depends on no symbol other than `variable`.
///
/// Constant formulas are valid. Any other free symbol is an unbound parameter
/// and makes the formula invalid.
pub fn formula_validity(formula: &Expr, variable: &Symbol) -> bool {
    formula.free_symbols().iter().all(|symbol| symbol == variable)
}

/// The interval is non-degenerate and positively oriented, `end > start`.
pub fn interval_validity(start: &Bound, end: &Bound) -> bool {
    end > start
}

/// The previous segment ends exactly where the current one starts.
pub fn positional_continuity(prev_end: &Bound, current_start: &Bound) -> bool {
    prev_end == current_start
}

/// Both formulas take the same value at the join.
pub fn value_continuity(
    prev_formula: &Expr,
    current_formula: &Expr,
    prev_end: &Bound,
    current_start: &Bound,
    variable: &Symbol,
) -> bool {
    prev_end.substitute_into(prev_formula, variable)
        == current_start.substitute_into(current_formula, variable)
}

/// Both formulas have the same first derivative at the join.
pub fn derivative_continuity(
    prev_formula: &Expr,
    current_formula: &Expr,
    prev_end: &Bound,
    current_start: &Bound,
    variable: &Symbol,
) -> bool {
    let prev_slope = prev_formula.derivative(variable);
    let current_slope = current_formula.derivative(variable);
    prev_end.substitute_into(&prev_slope, variable)
        == current_start.substitute_into(&current_slope, variable)
}
