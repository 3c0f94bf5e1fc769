mod calculus;
mod canonical;
mod display;
mod symbol;

pub use symbol::Symbol;

use super::Rational;
use num_traits::{One, ToPrimitive as _, Zero};
use std::collections::BTreeSet;

/// An exact symbolic expression in canonical form.
///
/// Expressions are built bottom-up through the canonicalising constructors
/// ([`Expr::sum`], [`Expr::product`], [`Expr::power`], [`Expr::apply`], and the
/// arithmetic operator impls), which flatten nested sums and products, collect
/// like terms and like powers, and fold numeric sub-expressions exactly. Two
/// expressions built this way compare equal exactly when their canonical forms
/// coincide, which is the notion of equality used by every continuity check.
///
/// The variants are public for inspection. Building them directly skips
/// canonicalisation, and such values may compare unequal to mathematically
/// identical canonical ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// An exact rational number
    Number(Rational),
    /// The circle constant π
    Pi,
    /// A free symbol
    Symbol(Symbol),
    /// A sum of two or more terms, sorted, with at most one numeric term
    Sum(Vec<Expr>),
    /// A product of two or more factors, sorted, with at most one (leading) numeric coefficient
    Product(Vec<Expr>),
    /// `base ** exponent`
    Power(Box<Expr>, Box<Expr>),
    /// An elementary function applied to an argument
    Apply(Function, Box<Expr>),
}

/// The elementary functions understood by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Function {
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Natural exponential
    Exp,
    /// Natural logarithm
    Log,
    /// Absolute value
    Abs,
}

impl Function {
    /// Look up a function by the name used in formula text.
    ///
    /// `ln` is accepted as an alias of `log`. `sqrt` is not a function here; the
    /// parser rewrites it as a power.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "exp" => Some(Self::Exp),
            "log" | "ln" => Some(Self::Log),
            "abs" => Some(Self::Abs),
            _ => None,
        }
    }

    /// The canonical name, as accepted by [`Function::from_name`]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Abs => "abs",
        }
    }

    fn eval(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Exp => value.exp(),
            Self::Log => value.ln(),
            Self::Abs => value.abs(),
        }
    }
}

impl Expr {
    /// The number zero
    pub fn zero() -> Self {
        Self::Number(Rational::zero())
    }

    /// The number one
    pub fn one() -> Self {
        Self::Number(Rational::one())
    }

    /// An integer constant
    pub fn integer(value: i64) -> Self {
        Self::Number(Rational::from_integer(value.into()))
    }

    /// The exact rational `numer / denom`
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Self::Number(Rational::new(numer.into(), denom.into()))
    }

    /// A free symbol
    pub fn symbol(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }

    /// Returns the value if this expression is a plain rational number
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    /// The set of free symbols occurring anywhere in the expression
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<Symbol>) {
        match self {
            Self::Number(_) | Self::Pi => {}
            Self::Symbol(symbol) => {
                symbols.insert(symbol.clone());
            }
            Self::Sum(items) | Self::Product(items) => {
                for item in items {
                    item.collect_symbols(symbols);
                }
            }
            Self::Power(base, exponent) => {
                base.collect_symbols(symbols);
                exponent.collect_symbols(symbols);
            }
            Self::Apply(_, argument) => argument.collect_symbols(symbols),
        }
    }

    /// Whether `symbol` occurs in the expression
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match self {
            Self::Number(_) | Self::Pi => false,
            Self::Symbol(other) => other == symbol,
            Self::Sum(items) | Self::Product(items) => items.iter().any(|item| item.contains(symbol)),
            Self::Power(base, exponent) => base.contains(symbol) || exponent.contains(symbol),
            Self::Apply(_, argument) => argument.contains(symbol),
        }
    }

    /// Whether the expression has no free symbols at all
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Number(_) | Self::Pi => true,
            Self::Symbol(_) => false,
            Self::Sum(items) | Self::Product(items) => items.iter().all(Self::is_constant),
            Self::Power(base, exponent) => base.is_constant() && exponent.is_constant(),
            Self::Apply(_, argument) => argument.is_constant(),
        }
    }

    /// Approximate a constant expression as a float.
    ///
    /// Returns `None` if the expression has free symbols. The result may be
    /// non-finite (e.g. `log(0)`); callers decide what that means.
    pub fn to_f64(&self) -> Option<f64> {
        self.eval_with(&|_| None)
    }

    /// Approximate the expression as a float with `variable` bound to `value`.
    ///
    /// Returns `None` if any other free symbol remains.
    pub fn evaluate(&self, variable: &Symbol, value: f64) -> Option<f64> {
        self.eval_with(&|symbol| (symbol == variable).then_some(value))
    }

    fn eval_with(&self, lookup: &dyn Fn(&Symbol) -> Option<f64>) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value.to_f64()?,
            Self::Pi => std::f64::consts::PI,
            Self::Symbol(symbol) => lookup(symbol)?,
            Self::Sum(terms) => terms
                .iter()
                .map(|term| term.eval_with(lookup))
                .sum::<Option<f64>>()?,
            Self::Product(factors) => factors
                .iter()
                .map(|factor| factor.eval_with(lookup))
                .product::<Option<f64>>()?,
            Self::Power(base, exponent) => {
                let base = base.eval_with(lookup)?;
                let exponent = exponent.eval_with(lookup)?;
                base.powf(exponent)
            }
            Self::Apply(function, argument) => function.eval(argument.eval_with(lookup)?),
        };
        Some(value)
    }
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}
