use crate::{
    ErrorKind,
    models::{Segment, Symbol},
    rules,
};
use std::fmt;
use tracing::{Level, event};

/// Where a [`Violation`] was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Location {
    /// The sequence as a whole
    Sequence,
    /// A single segment, by index
    Segment(usize),
    /// The join between two adjacent segments
    Join {
        /// Index of the earlier segment
        previous: usize,
        /// Index of the later segment, always `previous + 1`
        next: usize,
    },
}

impl Location {
    fn join(next: usize) -> Self {
        Self::Join {
            previous: next - 1,
            next,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => f.write_str("sequence"),
            Self::Segment(index) => write!(f, "segment {index}"),
            Self::Join { previous, next } => write!(f, "segments ({previous}, {next})"),
        }
    }
}

/// The first rule a segment sequence breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} at {location}")]
pub struct Violation {
    /// Which rule failed
    pub kind: ErrorKind,
    /// Where it failed
    pub location: Location,
}

impl Violation {
    fn new(kind: ErrorKind, location: Location) -> Self {
        Self { kind, location }
    }
}

/// Checks a segment sequence against the curve rules, stopping at the first
/// failure.
///
/// Every segment is checked on its own first (formula, then interval), and
/// only then is every adjacent pair checked in order (position, value, slope).
/// A sequence that fails several rules therefore always reports the same one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validator {
    variable: Symbol,
}

impl Validator {
    /// A validator for curves in `variable`
    pub fn new(variable: Symbol) -> Self {
        Self { variable }
    }

    /// The independent variable
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    /// Validate the whole sequence.
    pub fn validate(&self, segments: &[Segment]) -> Result<(), Violation> {
        event!(
            Level::DEBUG,
            segments = segments.len(),
            variable = %self.variable,
            "validating curve"
        );

        if segments.is_empty() {
            return self.reject(ErrorKind::NoData, Location::Sequence);
        }

        for (index, segment) in segments.iter().enumerate() {
            if let Some(kind) = self.check_segment(segment) {
                return self.reject(kind, Location::Segment(index));
            }
        }

        for (next, pair) in segments.windows(2).enumerate().map(|(i, pair)| (i + 1, pair)) {
            if let Some(kind) = self.check_join(&pair[0], &pair[1]) {
                return self.reject(kind, Location::join(next));
            }
        }

        event!(Level::DEBUG, "curve is valid");
        Ok(())
    }

    /// The first rule `segment` breaks on its own, if any
    pub fn check_segment(&self, segment: &Segment) -> Option<ErrorKind> {
        if !rules::formula_validity(segment.formula(), &self.variable) {
            Some(ErrorKind::InvalidFormula)
        } else if !rules::interval_validity(segment.start(), segment.end()) {
            Some(ErrorKind::InvalidInterval)
        } else {
            None
        }
    }

    /// The first rule the join between `previous` and `next` breaks, if any
    pub fn check_join(&self, previous: &Segment, next: &Segment) -> Option<ErrorKind> {
        let (formulas, bounds) = (
            (previous.formula(), next.formula()),
            (previous.end(), next.start()),
        );

        if !rules::positional_continuity(bounds.0, bounds.1) {
            Some(ErrorKind::DiscontinuousDomain)
        } else if !rules::value_continuity(formulas.0, formulas.1, bounds.0, bounds.1, &self.variable)
        {
            Some(ErrorKind::DiscontinuousValue)
        } else if !rules::derivative_continuity(
            formulas.0,
            formulas.1,
            bounds.0,
            bounds.1,
            &self.variable,
        ) {
            Some(ErrorKind::DiscontinuousDerivative)
        } else {
            None
        }
    }

    fn reject(&self, kind: ErrorKind, location: Location) -> Result<(), Violation> {
        event!(Level::DEBUG, %kind, %location, "curve rejected");
        Err(Violation::new(kind, location))
    }
}
