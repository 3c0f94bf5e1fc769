use super::Segment;
use crate::parse::FieldError;

/// A raw, unparsed segment as delivered by a record source.
///
/// The field names match the column headers of the tabular input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentRecord {
    /// The formula text, e.g. `x**2 + 1`
    pub formula: String,
    /// The start of the interval, e.g. `0`
    pub start_x: String,
    /// The end of the interval, e.g. `pi/2`
    pub end_x: String,
}

impl SegmentRecord {
    /// Create a record from its three text fields
    pub fn new(
        formula: impl Into<String>,
        start_x: impl Into<String>,
        end_x: impl Into<String>,
    ) -> Self {
        Self {
            formula: formula.into(),
            start_x: start_x.into(),
            end_x: end_x.into(),
        }
    }

    /// Parse the record into a [`Segment`]
    pub fn parse(&self) -> Result<Segment, FieldError> {
        Segment::parse(&self.formula, &self.start_x, &self.end_x)
    }
}
