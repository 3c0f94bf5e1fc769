use crate::models::{Bound, Expr, Function, Rational, Segment, Symbol};
use num_bigint::BigInt;
use num_traits::Pow;
use pest::{
    Parser as _,
    error::LineColLocation,
    iterators::Pair,
    pratt_parser::{Assoc, Op, PrattParser},
};
use std::{fmt, sync::LazyLock};

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "src/parse/formula.pest"]
    pub(super) struct FormulaParser;
}

use grammar::{FormulaParser, Rule};

// Decimal literals with exponents beyond this are rejected rather than expanded.
const MAX_DECIMAL_EXPONENT: i32 = 4096;

// Unary minus binds looser than `**`, so `-x**2 == -(x**2)`,
// and `**` is right associative.
static PRATT_PARSER: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
        .op(Op::infix(Rule::pow, Assoc::Right))
});

/// Parse formula text into a canonical symbolic expression.
///
/// Numeric literals become exact rationals (`0.1` is exactly `1/10`).
/// Identifiers become free symbols, except `pi` and `E`, which are constants.
pub fn expression(text: &str) -> Result<Expr, ParseError> {
    let formula = FormulaParser::parse(Rule::formula, text)
        .map_err(|error| ParseError::syntax(text, &error))?
        .next()
        .and_then(|formula| formula.into_inner().find(|pair| pair.as_rule() == Rule::expr))
        .ok_or_else(|| ParseError::Syntax {
            text: text.to_owned(),
            message: "expected an expression".to_owned(),
        })?;
    build(formula)
}

/// Parse the text of an interval endpoint.
///
/// A bound may be any closed expression (`2`, `1/3`, `pi/2`), but it must not
/// depend on a free symbol and must evaluate to a finite real number.
pub fn bound(text: &str) -> Result<Bound, ParseError> {
    let value = expression(text)?;

    let symbols = value.free_symbols();
    if !symbols.is_empty() {
        let symbols = symbols
            .iter()
            .map(Symbol::name)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ParseError::NonConstantBound {
            text: text.to_owned(),
            symbols,
        });
    }

    Bound::new(value).ok_or_else(|| ParseError::NonRealBound(text.to_owned()))
}

/// Parse a variable name.
pub fn symbol(text: &str) -> Result<Symbol, ParseError> {
    let ident = FormulaParser::parse(Rule::name, text)
        .ok()
        .and_then(|mut pairs| pairs.next())
        .and_then(|name| name.into_inner().next())
        .ok_or_else(|| ParseError::InvalidSymbol(text.to_owned()))?;

    let name = ident.as_str();
    if is_reserved(name) {
        return Err(ParseError::ReservedName(name.to_owned()));
    }
    Ok(Symbol::from_ident(name))
}

/// Parse the three text fields of a segment.
pub fn segment(formula: &str, start: &str, end: &str) -> Result<Segment, FieldError> {
    let formula = expression(formula).map_err(|source| FieldError {
        field: Field::Formula,
        source,
    })?;
    let start = bound(start).map_err(|source| FieldError {
        field: Field::Start,
        source,
    })?;
    let end = bound(end).map_err(|source| FieldError {
        field: Field::End,
        source,
    })?;
    Ok(Segment::new(formula, start, end))
}

fn build(expr: Pair<'_, Rule>) -> Result<Expr, ParseError> {
    PRATT_PARSER
        .map_primary(primary)
        .map_prefix(|op, operand| match op.as_rule() {
            Rule::neg => Ok(-operand?),
            _ => operand,
        })
        .map_infix(|lhs, op, rhs| {
            let (lhs, rhs) = (lhs?, rhs?);
            match op.as_rule() {
                Rule::add => Ok(lhs + rhs),
                Rule::sub => Ok(lhs - rhs),
                Rule::mul => Ok(lhs * rhs),
                Rule::div => Ok(lhs / rhs),
                Rule::pow => Ok(Expr::power(lhs, rhs)),
                rule => Err(ParseError::unexpected(rule, op.as_str())),
            }
        })
        .parse(expr.into_inner())
}

fn primary(pair: Pair<'_, Rule>) -> Result<Expr, ParseError> {
    match pair.as_rule() {
        Rule::number => number(pair.as_str()).map(Expr::Number),
        Rule::ident => identifier(pair.as_str()),
        Rule::expr => build(pair),
        Rule::call => {
            let text = pair.as_str();
            let mut inner = pair.into_inner();
            let (Some(name), Some(argument)) = (inner.next(), inner.next()) else {
                return Err(ParseError::unexpected(Rule::call, text));
            };

            let name = name.as_str();
            if name == "sqrt" {
                return Ok(Expr::power(build(argument)?, Expr::rational(1, 2)));
            }
            let function =
                Function::from_name(name).ok_or_else(|| ParseError::UnknownFunction(name.to_owned()))?;
            Ok(Expr::apply(function, build(argument)?))
        }
        rule => Err(ParseError::unexpected(rule, pair.as_str())),
    }
}

fn identifier(name: &str) -> Result<Expr, ParseError> {
    match name {
        "pi" => Ok(Expr::Pi),
        "E" => Ok(Expr::apply(Function::Exp, Expr::one())),
        _ if is_reserved(name) => Err(ParseError::ReservedName(name.to_owned())),
        _ => Ok(Expr::Symbol(Symbol::from_ident(name))),
    }
}

fn is_reserved(name: &str) -> bool {
    matches!(name, "pi" | "E" | "sqrt") || Function::from_name(name).is_some()
}

/// Convert a decimal literal (`12`, `2.5`, `.5`, `1e-3`) to an exact rational.
fn number(literal: &str) -> Result<Rational, ParseError> {
    let invalid = || ParseError::InvalidNumber(literal.to_owned());

    let (mantissa, exponent) = match literal.find(['e', 'E']) {
        Some(at) => (
            &literal[..at],
            literal[at + 1..].parse::<i64>().map_err(|_| invalid())?,
        ),
        None => (literal, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits: BigInt = format!("{whole}{fraction}")
        .parse()
        .map_err(|_| invalid())?;

    let scale = exponent - i64::try_from(fraction.len()).map_err(|_| invalid())?;
    let scale = i32::try_from(scale)
        .ok()
        .filter(|scale| scale.abs() <= MAX_DECIMAL_EXPONENT)
        .ok_or_else(invalid)?;

    let ten = Rational::from_integer(BigInt::from(10));
    Ok(Rational::from_integer(digits) * Pow::pow(ten, scale))
}

/// Errors raised while interpreting formula or bound text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text does not match the formula grammar
    #[error("malformed expression `{text}`: {message}")]
    Syntax {
        /// The offending text
        text: String,
        /// What the grammar expected
        message: String,
    },
    /// A call to a function the grammar does not know
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    /// A function or constant name used where a symbol was expected
    #[error("`{0}` is reserved and cannot be used as a symbol")]
    ReservedName(String),
    /// A numeric literal that cannot be represented
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// A bound that depends on free symbols
    #[error("bound `{text}` depends on free symbol(s) {symbols}")]
    NonConstantBound {
        /// The offending text
        text: String,
        /// The free symbols, comma separated
        symbols: String,
    },
    /// A bound that is not a finite real number
    #[error("bound `{0}` is not a finite real number")]
    NonRealBound(String),
    /// Text that is not a valid variable name
    #[error("`{0}` is not a valid variable name")]
    InvalidSymbol(String),
}

impl ParseError {
    fn syntax(text: &str, error: &pest::error::Error<Rule>) -> Self {
        let column = match error.line_col {
            LineColLocation::Pos((_, column)) | LineColLocation::Span((_, column), _) => column,
        };
        Self::Syntax {
            text: text.to_owned(),
            message: format!("{} at column {column}", error.variant.message()),
        }
    }

    fn unexpected(rule: Rule, text: &str) -> Self {
        Self::Syntax {
            text: text.to_owned(),
            message: format!("unexpected {rule:?}"),
        }
    }
}

/// The three text fields of a segment record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Field {
    /// The formula
    Formula,
    /// The start of the interval
    Start,
    /// The end of the interval
    End,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Formula => "formula",
            Self::Start => "start_x",
            Self::End => "end_x",
        })
    }
}

/// A [`ParseError`] tagged with the segment field it came from
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {source}")]
pub struct FieldError {
    /// The field that failed to parse
    pub field: Field,
    /// The underlying error
    #[source]
    pub source: ParseError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn x() -> Expr {
        Expr::Symbol(Symbol::default())
    }

    #[rstest]
    #[case::power("x**3 + 3", Expr::power(x(), Expr::integer(3)) + Expr::integer(3))]
    #[case::caret("x^2", Expr::power(x(), Expr::integer(2)))]
    #[case::unary_minus_binds_looser("-x**2", -Expr::power(x(), Expr::integer(2)))]
    #[case::signed_operand("2*-3", Expr::integer(-6))]
    #[case::negative_exponent("2**-1", Expr::rational(1, 2))]
    #[case::right_associative("2**3**2", Expr::integer(512))]
    #[case::sqrt("sqrt(4)", Expr::integer(2))]
    #[case::decimals_are_exact("0.1 + 0.2", Expr::rational(3, 10))]
    #[case::scientific("1e-3", Expr::rational(1, 1000))]
    #[case::scientific_upper("2.5E2", Expr::integer(250))]
    #[case::leading_dot(".5", Expr::rational(1, 2))]
    #[case::trailing_dot("1.", Expr::one())]
    #[case::constant("7", Expr::integer(7))]
    #[case::pi("pi/2", Expr::rational(1, 2) * Expr::Pi)]
    #[case::euler("E", Expr::apply(Function::Exp, Expr::one()))]
    #[case::ln_alias("ln(x)", Expr::apply(Function::Log, x()))]
    #[case::nested("sin(cos(x))", Expr::apply(Function::Sin, Expr::apply(Function::Cos, x())))]
    #[case::whitespace("  x  *  x ", Expr::power(x(), Expr::integer(2)))]
    fn parses_expressions(#[case] text: &str, #[case] expected: Expr) {
        assert_eq!(expression(text).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::dangling_operator("x +")]
    #[case::implicit_multiplication("2x")]
    #[case::double_operator("x ** * 2")]
    #[case::unbalanced("(x")]
    #[case::juxtaposed_symbols("x y")]
    #[case::two_arguments("sin(x, 1)")]
    fn rejects_malformed_syntax(#[case] text: &str) {
        assert!(matches!(expression(text), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn rejects_unknown_functions_and_reserved_names() {
        assert_eq!(
            expression("foo(x)"),
            Err(ParseError::UnknownFunction("foo".to_owned()))
        );
        assert_eq!(
            expression("sin + 1"),
            Err(ParseError::ReservedName("sin".to_owned()))
        );
    }

    #[test]
    fn other_symbols_are_free() {
        let expr = expression("x + y").unwrap();
        let names: Vec<_> = expr.free_symbols().into_iter().map(String::from).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn bounds_must_be_constant() {
        assert_eq!(
            bound("x + 1"),
            Err(ParseError::NonConstantBound {
                text: "x + 1".to_owned(),
                symbols: "x".to_owned()
            })
        );
    }

    #[rstest]
    #[case::division_by_zero("1/0")]
    #[case::log_of_zero("log(0)")]
    #[case::complex("sqrt(-1)")]
    fn bounds_must_be_finite_reals(#[case] text: &str) {
        assert_eq!(bound(text), Err(ParseError::NonRealBound(text.to_owned())));
    }

    #[test]
    fn bounds_accept_closed_expressions() {
        assert_eq!(bound("-1").unwrap(), Bound::from(-1));
        assert_eq!(bound("4/2").unwrap(), Bound::from(2));
        assert!(bound("pi/2").is_ok());
    }

    #[test]
    fn segment_errors_name_the_field() {
        let error = segment("x**2", "0", "two").unwrap_err();
        assert_eq!(error.field, Field::End);

        let error = segment("x**", "0", "2").unwrap_err();
        assert_eq!(error.field, Field::Formula);
        assert!(error.to_string().starts_with("invalid formula"));
    }

    #[rstest]
    #[case("x**3 + 3")]
    #[case("-x**2 + 2*x - 1/3")]
    #[case("sin(x)/x")]
    #[case("exp(-x**2/2)")]
    #[case("sqrt(x + 1) - pi")]
    #[case("2**x*log(2)")]
    fn display_parses_back(#[case] text: &str) {
        let expr = expression(text).unwrap();
        assert_eq!(expression(&expr.to_string()).unwrap(), expr);
    }
}
