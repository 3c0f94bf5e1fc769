use crate::{ErrorKind, models::SegmentRecord};

/// A supplier of raw segment records, in curve order.
///
/// Implementations are expected to check the shape of their input (for
/// tabular data, that the `formula`, `start_x` and `end_x` columns exist), but
/// not to interpret the field text; that is left to the core.
pub trait RecordSource {
    /// Read every record, or fail without yielding any.
    ///
    /// An input with no records must be reported as [`LoadError::NoData`]
    /// rather than as an empty collection.
    fn load(self) -> Result<Vec<SegmentRecord>, LoadError>;
}

impl RecordSource for Vec<SegmentRecord> {
    fn load(self) -> Result<Vec<SegmentRecord>, LoadError> {
        if self.is_empty() {
            Err(LoadError::NoData)
        } else {
            Ok(self)
        }
    }
}

/// Failure to obtain records from a [`RecordSource`]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input holds no records
    #[error("no segment records found")]
    NoData,

    /// Required columns are absent
    #[error("missing column(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The underlying reader failed
    #[error("unable to read records: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    /// Wrap a reader-specific failure
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Source(error.into())
    }

    /// The category of the failure. A curve that cannot be loaded has no
    /// data to validate.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NoData
    }
}
