use super::{Bound, Segment, SegmentRecord, Symbol};
use crate::{CurveError, Validator, Violation, ports::RecordSource};
use tracing::{Level, event};

/// A validated piecewise curve.
///
/// The segments are non-empty, each has a formula in `variable` alone over a
/// positively oriented interval, and adjacent segments meet with matching
/// position, value and first derivative. The only way to obtain a `Curve` is
/// through validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    variable: Symbol,
    segments: Vec<Segment>,
}

impl Curve {
    /// Validate `segments` as a curve in `variable`.
    pub fn new(variable: Symbol, segments: Vec<Segment>) -> Result<Self, Violation> {
        Validator::new(variable.clone()).validate(&segments)?;
        Ok(Self { variable, segments })
    }

    /// Parse and validate raw records.
    ///
    /// Parsing stops at the first record that cannot be interpreted, so a
    /// parse failure is reported before any rule is checked.
    pub fn from_records(
        variable: Symbol,
        records: impl IntoIterator<Item = SegmentRecord>,
    ) -> Result<Self, CurveError> {
        let segments = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .parse()
                    .map_err(|source| CurveError::Parse { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(variable, segments)?)
    }

    /// Load, parse and validate the records of `source`.
    pub fn load(variable: Symbol, source: impl RecordSource) -> Result<Self, CurveError> {
        let records = source.load()?;
        event!(Level::DEBUG, records = records.len(), "loaded segment records");
        Self::from_records(variable, records)
    }

    /// The independent variable
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    /// The segments, in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Give up the segments
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// The interval covered by the whole curve, from the start of the first
    /// segment to the end of the last
    pub fn domain(&self) -> (&Bound, &Bound) {
        // `segments` is never empty for a validated curve
        let first = &self.segments[0];
        let last = &self.segments[self.segments.len() - 1];
        (first.start(), last.end())
    }
}
