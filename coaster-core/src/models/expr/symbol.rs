use crate::parse::ParseError;
use std::{fmt, str::FromStr};

/// A named free symbol, such as the independent variable of a curve.
///
/// Symbols are plain values: the variable a curve is expressed in is passed
/// explicitly to whatever needs it rather than living in shared state.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Symbol(String);

impl Symbol {
    /// Wrap an identifier that the grammar has already accepted.
    pub(crate) fn from_ident(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The symbol's name
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The conventional independent variable, `x`
impl Default for Symbol {
    fn default() -> Self {
        Self::from_ident("x")
    }
}

impl FromStr for Symbol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::symbol(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers() {
        assert_eq!("t".parse::<Symbol>().unwrap().name(), "t");
        assert_eq!(" x_1 ".parse::<Symbol>().unwrap().name(), "x_1");
    }

    #[test]
    fn rejects_non_identifiers() {
        assert!("".parse::<Symbol>().is_err());
        assert!("1x".parse::<Symbol>().is_err());
        assert!("x y".parse::<Symbol>().is_err());
        assert!("sin".parse::<Symbol>().is_err());
        assert!("pi".parse::<Symbol>().is_err());
    }
}
