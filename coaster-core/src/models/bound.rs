use super::{Expr, Function, Rational, Symbol};
use crate::parse::ParseError;
use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use std::{cmp::Ordering, fmt};

/// An interval endpoint on the independent axis.
///
/// A bound is a closed symbolic expression (`2`, `1/3`, `pi/2`) that evaluates
/// to a finite real number. Equality is exact: two bounds are equal only when
/// their canonical expressions coincide, so `4/2 == 2` but `0.1 + 0.2` is only
/// equal to `0.3` because decimal literals are parsed as exact rationals.
#[derive(Clone, Debug)]
pub struct Bound {
    value: Expr,
    approx: f64,
}

impl Bound {
    /// Wrap a constant expression, returning `None` if it has free symbols or
    /// does not evaluate to a finite real number.
    pub fn new(value: Expr) -> Option<Self> {
        let approx = value.to_f64().filter(|approx| approx.is_finite())?;
        Some(Self { value, approx })
    }

    /// The exact value
    pub fn value(&self) -> &Expr {
        &self.value
    }

    /// A floating-point approximation, for sampling and display only
    pub fn to_f64(&self) -> f64 {
        self.approx
    }

    /// Substitute this bound for `variable` in `formula`
    pub fn substitute_into(&self, formula: &Expr, variable: &Symbol) -> Expr {
        formula.subs(variable, &self.value)
    }
}

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Bound {}

// Bounds are ordered by the sign of their canonical difference. When that is
// not a plain number, the float estimate decides unless it is within rounding
// of zero, in which case the difference is evaluated again with pi and roots
// expanded to `PRECISE_DIGITS` decimal places. Bounds that cannot be told apart
// even then are incomparable.
impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.value == other.value {
            return Some(Ordering::Equal);
        }
        if let (Some(lhs), Some(rhs)) = (self.value.as_rational(), other.value.as_rational()) {
            return Some(lhs.cmp(rhs));
        }
        sign(&(self.value.clone() - other.value.clone()))
    }
}

const PRECISE_DIGITS: u32 = 60;

const PI_DIGITS: &str = "3141592653589793238462643383279502884197169399375105820974944592307816406286";

fn sign(difference: &Expr) -> Option<Ordering> {
    if let Some(value) = difference.as_rational() {
        return Some(value.cmp(&Rational::zero()));
    }

    let approx = difference.to_f64()?;
    let scale = match difference {
        Expr::Sum(terms) => terms
            .iter()
            .map(|term| term.to_f64().map(f64::abs))
            .sum::<Option<f64>>()?,
        _ => approx.abs(),
    };
    if !approx.is_finite() || !scale.is_finite() {
        return None;
    }
    if approx.abs() > 1e-9 * scale {
        return approx.partial_cmp(&0.0);
    }

    let precise = precise(difference)?;
    let tolerance = Rational::new(BigInt::one(), Pow::pow(BigInt::from(10), PRECISE_DIGITS / 2))
        * Rational::from_float(scale.max(1.0))?;
    if precise.abs() <= tolerance {
        return None;
    }
    Some(precise.cmp(&Rational::zero()))
}

/// A rational approximation of a constant built from numbers, pi, sums,
/// products and rational powers, accurate to about `PRECISE_DIGITS` places.
fn precise(expr: &Expr) -> Option<Rational> {
    match expr {
        Expr::Number(value) => Some(value.clone()),
        Expr::Pi => {
            let digits = PI_DIGITS.get(..PRECISE_DIGITS as usize + 1)?;
            Some(Rational::new(
                digits.parse().ok()?,
                Pow::pow(BigInt::from(10), PRECISE_DIGITS),
            ))
        }
        Expr::Sum(terms) => terms.iter().map(precise).sum(),
        Expr::Product(factors) => factors.iter().map(precise).product(),
        Expr::Power(base, exponent) => {
            let exponent = exponent.as_rational()?;
            let power = exponent.numer().to_i32().filter(|power| power.abs() <= 64)?;
            let base = precise(base)?;
            if base.is_zero() && power < 0 {
                return None;
            }
            let base = Pow::pow(base, power);
            if exponent.is_integer() {
                return Some(base);
            }
            root(&base, exponent.denom().to_u32()?)
        }
        Expr::Apply(Function::Abs, argument) => precise(argument).map(|value| value.abs()),
        Expr::Symbol(_) | Expr::Apply(..) => None,
    }
}

/// `value ** (1/degree)`, truncated to `PRECISE_DIGITS` places
fn root(value: &Rational, degree: u32) -> Option<Rational> {
    if value.is_negative() {
        return None;
    }
    // (n/d)**(1/q) == (n * d**(q-1))**(1/q) / d
    let scale = Pow::pow(BigInt::from(10), PRECISE_DIGITS);
    let radicand = value.numer() * Pow::pow(value.denom(), degree - 1) * Pow::pow(&scale, degree);
    Some(Rational::new(radicand.nth_root(degree), value.denom() * scale))
}

impl TryFrom<Rational> for Bound {
    type Error = ParseError;

    fn try_from(value: Rational) -> Result<Self, ParseError> {
        Self::new(Expr::Number(value.clone()))
            .ok_or_else(|| ParseError::NonRealBound(value.to_string()))
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Self {
            value: Expr::integer(value),
            approx: value as f64,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn rational_bounds_order_exactly() {
        let third = parse::bound("1/3").unwrap();
        let approx = parse::bound("0.3333333333333333").unwrap();
        assert!(approx < third);
        assert_ne!(approx, third);
    }

    #[test]
    fn irrational_bounds_order_by_value() {
        let half_pi = parse::bound("pi/2").unwrap();
        assert!(Bound::from(1) < half_pi);
        assert!(half_pi < Bound::from(2));
        assert_eq!(half_pi, parse::bound("pi*0.5").unwrap());
    }

    #[test]
    fn close_irrational_bounds_still_order() {
        // the floats of both sides round to the same double
        let large = parse::bound("10**20*pi").unwrap();
        let above = parse::bound("10**20*pi + 1").unwrap();
        assert_eq!(large.to_f64(), above.to_f64());
        assert!(large < above);
        assert!(above > large);

        let pi = parse::bound("pi").unwrap();
        let decimal = parse::bound("3.1415926535897933").unwrap();
        assert!(pi < decimal);
        assert!(parse::bound("3.1415926535897931").unwrap() < pi);

        let root = parse::bound("sqrt(2)").unwrap();
        let decimal = parse::bound("1.4142135623730951").unwrap();
        assert!(root < decimal);
    }

    #[test]
    fn rational_bounds_must_be_finite() {
        let third = Bound::try_from(Rational::new(1.into(), 3.into())).unwrap();
        assert_eq!(third, parse::bound("1/3").unwrap());

        let huge = Rational::from_integer(Pow::pow(BigInt::from(10), 400u32));
        assert!(matches!(
            Bound::try_from(huge),
            Err(ParseError::NonRealBound(_))
        ));
    }

    #[test]
    fn equal_values_in_different_forms_are_equal() {
        assert_eq!(parse::bound("4/2").unwrap(), Bound::from(2));
        assert_eq!(parse::bound("2.0").unwrap(), Bound::from(2));
        assert_eq!(
            parse::bound("0.1 + 0.2").unwrap(),
            parse::bound("0.3").unwrap()
        );
    }

    #[test]
    fn rejects_non_constant_or_non_finite() {
        let x = Expr::Symbol(Symbol::default());
        assert!(Bound::new(x).is_none());
        assert!(Bound::new(Expr::power(Expr::zero(), Expr::integer(-1))).is_none());
    }

    #[test]
    fn substitutes_into_formulas() {
        let formula = parse::expression("x**2").unwrap();
        let at = parse::bound("3").unwrap();
        assert_eq!(
            at.substitute_into(&formula, &Symbol::default()),
            Expr::integer(9)
        );
    }
}
