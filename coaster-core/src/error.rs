use crate::{
    parse::FieldError,
    ports::LoadError,
    validator::{Location, Violation},
};
use std::fmt;

/// The reason a curve was rejected.
///
/// Every error the crate produces maps onto exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// A formula or bound could not be interpreted
    ParseError,
    /// A formula depends on a symbol other than the variable
    InvalidFormula,
    /// An interval does not satisfy `end > start`
    InvalidInterval,
    /// Adjacent segments do not meet on the independent axis
    DiscontinuousDomain,
    /// Adjacent formulas take different values at their join
    DiscontinuousValue,
    /// Adjacent formulas have different slopes at their join
    DiscontinuousDerivative,
    /// There was nothing to validate
    NoData,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ParseError => "formula or bound could not be parsed",
            Self::InvalidFormula => "formula depends on a symbol other than the variable",
            Self::InvalidInterval => "interval end is not greater than its start",
            Self::DiscontinuousDomain => "segment does not start where the previous one ends",
            Self::DiscontinuousValue => "curve value jumps",
            Self::DiscontinuousDerivative => "curve slope jumps",
            Self::NoData => "no segments",
        })
    }
}

/// Everything that can go wrong between reading records and holding a
/// validated [`crate::models::Curve`].
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// The records could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A record could not be parsed into a segment
    #[error("segment {index}: {source}")]
    Parse {
        /// Position of the record in the input
        index: usize,
        /// What went wrong, and in which field
        #[source]
        source: FieldError,
    },

    /// The parsed segments do not form a valid curve
    #[error(transparent)]
    Invalid(#[from] Violation),
}

impl CurveError {
    /// The category of the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(error) => error.kind(),
            Self::Parse { .. } => ErrorKind::ParseError,
            Self::Invalid(violation) => violation.kind,
        }
    }

    /// Where in the input the failure was detected
    pub fn location(&self) -> Location {
        match self {
            Self::Load(_) => Location::Sequence,
            Self::Parse { index, .. } => Location::Segment(*index),
            Self::Invalid(violation) => violation.location,
        }
    }
}
