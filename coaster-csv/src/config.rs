//! Configuration for reading CSV input.

use serde::{Deserialize, Serialize};

/// How the CSV input is tokenised.
///
/// ```
/// use coaster_csv::config::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     ..Default::default()
/// };
/// assert!(config.trim);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CsvConfig {
    /// The field delimiter, which must be a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether to strip whitespace around headers and fields
    #[serde(default = "default_true")]
    pub trim: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            trim: true,
        }
    }
}
