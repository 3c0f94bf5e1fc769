use super::{Expr, Function};
use crate::models::Rational;
use num_traits::{One, Signed};
use std::fmt;

// Binding strength, used to decide where parentheses are needed. The output is
// valid formula text and parses back to the same expression.
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const POWER: u8 = 3;
const ATOM: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(value) if value.is_negative() || !value.is_integer() => PRODUCT,
            Expr::Number(_) | Expr::Pi | Expr::Symbol(_) | Expr::Apply(_, _) => ATOM,
            Expr::Sum(_) => SUM,
            Expr::Product(factors) => match factors.first() {
                Some(Expr::Number(value)) if value.is_negative() => SUM,
                _ => PRODUCT,
            },
            Expr::Power(_, exponent) => match exponent.as_ref() {
                Expr::Number(value) if value.is_negative() => PRODUCT,
                _ => POWER,
            },
        }
    }

    fn fmt_wrapped(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    /// Split a negative-looking term into its positive counterpart.
    fn negated_term(&self) -> Option<Expr> {
        match self {
            Expr::Number(value) if value.is_negative() => Some(Expr::Number(-value)),
            Expr::Product(factors) => match factors.first() {
                Some(Expr::Number(value)) if value.is_negative() => {
                    Some(-self.clone())
                }
                _ => None,
            },
            _ => None,
        }
    }
}

fn fmt_product(factors: &[Expr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut coefficient = Rational::one();
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for factor in factors {
        match factor {
            Expr::Number(value) => coefficient *= value,
            Expr::Power(base, exponent) => match exponent.as_ref() {
                Expr::Number(value) if value.is_negative() => {
                    denominator.push(Expr::power(base.as_ref().clone(), Expr::Number(-value)))
                }
                _ => numerator.push(factor.clone()),
            },
            other => numerator.push(other.clone()),
        }
    }

    if coefficient.is_negative() {
        f.write_str("-")?;
        coefficient = -coefficient;
    }
    let numer = coefficient.numer().clone();
    let denom = coefficient.denom().clone();

    let mut first = true;
    if !numer.is_one() || numerator.is_empty() {
        write!(f, "{numer}")?;
        first = false;
    }
    for factor in &numerator {
        if !first {
            f.write_str("*")?;
        }
        factor.fmt_wrapped(f, POWER)?;
        first = false;
    }

    let denom_count = denominator.len() + usize::from(!denom.is_one());
    if denom_count == 0 {
        return Ok(());
    }
    f.write_str("/")?;
    if denom_count > 1 {
        f.write_str("(")?;
    }
    let mut first = true;
    if !denom.is_one() {
        write!(f, "{denom}")?;
        first = false;
    }
    for factor in &denominator {
        if !first {
            f.write_str("*")?;
        }
        factor.fmt_wrapped(f, POWER)?;
        first = false;
    }
    if denom_count > 1 {
        f.write_str(")")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => {
                if value.is_integer() {
                    write!(f, "{}", value.numer())
                } else {
                    write!(f, "{}/{}", value.numer(), value.denom())
                }
            }
            Expr::Pi => f.write_str("pi"),
            Expr::Symbol(symbol) => write!(f, "{symbol}"),
            Expr::Sum(terms) => {
                // Constants read better at the end, as in `x**2 + 1`
                let (constants, others): (Vec<&Expr>, Vec<&Expr>) =
                    terms.iter().partition(|term| matches!(term, Expr::Number(_)));
                for (i, term) in others.into_iter().chain(constants).enumerate() {
                    match (i, term.negated_term()) {
                        (0, _) => term.fmt_wrapped(f, SUM)?,
                        (_, Some(positive)) => {
                            f.write_str(" - ")?;
                            positive.fmt_wrapped(f, PRODUCT)?;
                        }
                        (_, None) => {
                            f.write_str(" + ")?;
                            term.fmt_wrapped(f, SUM)?;
                        }
                    }
                }
                Ok(())
            }
            Expr::Product(factors) => fmt_product(factors, f),
            Expr::Power(base, exponent) => match exponent.as_ref() {
                Expr::Number(value) if value.is_negative() => fmt_product(&[self.clone()], f),
                Expr::Number(value) if *value == Rational::new(1.into(), 2.into()) => {
                    write!(f, "sqrt({base})")
                }
                _ => {
                    base.fmt_wrapped(f, ATOM)?;
                    f.write_str("**")?;
                    exponent.fmt_wrapped(f, ATOM)
                }
            },
            Expr::Apply(Function::Exp, argument) if argument.as_rational().is_some_and(One::is_one) => {
                f.write_str("E")
            }
            Expr::Apply(function, argument) => write!(f, "{}({argument})", function.name()),
        }
    }
}
