use crate::config::CsvConfig;
use coaster_core::{
    models::SegmentRecord,
    ports::{LoadError, RecordSource},
};
use std::{fs::File, io, path::Path};
use tracing::{Level, event};

/// Column headers every input must have
const REQUIRED_COLUMNS: [&str; 3] = ["formula", "start_x", "end_x"];

/// A [`RecordSource`] over CSV text with a header row.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
}

impl<R: io::Read> CsvSource<R> {
    /// Read records from any byte stream.
    pub fn from_reader(reader: R, config: &CsvConfig) -> Result<Self, LoadError> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                LoadError::other(format!(
                    "delimiter {:?} is not a single ASCII character",
                    config.delimiter
                ))
            })?;

        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(if config.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);
        Ok(Self { reader })
    }
}

impl CsvSource<File> {
    /// Read records from the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Self, LoadError> {
        let path = path.as_ref();
        event!(Level::DEBUG, path = %path.display(), "opening csv input");
        let file = File::open(path).map_err(LoadError::other)?;
        Self::from_reader(file, config)
    }
}

impl<R: io::Read> RecordSource for CsvSource<R> {
    fn load(mut self) -> Result<Vec<SegmentRecord>, LoadError> {
        let headers = self.reader.headers().map_err(LoadError::other)?.clone();
        if headers.is_empty() {
            return Err(LoadError::NoData);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            event!(Level::WARN, ?missing, "csv input lacks required columns");
            return Err(LoadError::MissingFields(missing));
        }

        let records = self
            .reader
            .deserialize::<SegmentRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(LoadError::other)?;
        event!(Level::DEBUG, records = records.len(), "read csv records");

        if records.is_empty() {
            Err(LoadError::NoData)
        } else {
            Ok(records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn load(text: &str, config: &CsvConfig) -> Result<Vec<SegmentRecord>, LoadError> {
        CsvSource::from_reader(text.as_bytes(), config)?.load()
    }

    #[test]
    fn reads_records_in_order() {
        let text = "formula,start_x,end_x\nx**2,0,1\n2*x - 1,1,pi\n";
        let records = load(text, &CsvConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![
                SegmentRecord::new("x**2", "0", "1"),
                SegmentRecord::new("2*x - 1", "1", "pi"),
            ]
        );
    }

    #[test]
    fn ignores_extra_columns_and_order() {
        let text = "end_x,note,formula,start_x\n1,first,x**3+3,-1\n";
        let records = load(text, &CsvConfig::default()).unwrap();
        assert_eq!(records, vec![SegmentRecord::new("x**3+3", "-1", "1")]);
    }

    #[test]
    fn quoted_formulas_may_contain_the_delimiter() {
        let text = "formula,start_x,end_x\n\"x, more\",0,1\n";
        let records = load(text, &CsvConfig::default()).unwrap();
        assert_eq!(records[0].formula, "x, more");
    }

    #[test]
    fn trims_whitespace_when_asked() {
        let text = "formula , start_x , end_x\n x**2 , 0 , 1 \n";
        let records = load(text, &CsvConfig::default()).unwrap();
        assert_eq!(records, vec![SegmentRecord::new("x**2", "0", "1")]);

        let untrimmed = CsvConfig {
            trim: false,
            ..Default::default()
        };
        let error = load(text, &untrimmed).unwrap_err();
        assert!(matches!(error, LoadError::MissingFields(ref missing) if missing.len() == 3));
    }

    #[test]
    fn other_delimiters() {
        let config = CsvConfig {
            delimiter: ';',
            ..Default::default()
        };
        let text = "formula;start_x;end_x\nx;0;1\n";
        assert_eq!(
            load(text, &config).unwrap(),
            vec![SegmentRecord::new("x", "0", "1")]
        );
    }

    #[test]
    fn rejects_wide_delimiters() {
        let config = CsvConfig {
            delimiter: '→',
            ..Default::default()
        };
        assert!(matches!(
            CsvSource::from_reader(&b""[..], &config),
            Err(LoadError::Source(_))
        ));
    }

    #[rstest]
    #[case::no_formula("start_x,end_x\n0,1\n", &["formula"])]
    #[case::only_formula("formula\nx\n", &["start_x", "end_x"])]
    #[case::misspelt("formula,start,end\nx,0,1\n", &["start_x", "end_x"])]
    fn reports_missing_columns(#[case] text: &str, #[case] expected: &[&str]) {
        match load(text, &CsvConfig::default()) {
            Err(LoadError::MissingFields(missing)) => assert_eq!(missing, expected),
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[rstest]
    #[case::empty("")]
    #[case::header_only("formula,start_x,end_x\n")]
    fn empty_inputs_have_no_data(#[case] text: &str) {
        assert!(matches!(
            load(text, &CsvConfig::default()),
            Err(LoadError::NoData)
        ));
    }

    #[test]
    fn ragged_rows_are_source_errors() {
        let text = "formula,start_x,end_x\nx,0\n";
        assert!(matches!(
            load(text, &CsvConfig::default()),
            Err(LoadError::Source(_))
        ));
    }

    #[test]
    fn missing_files_are_source_errors() {
        let result = CsvSource::from_path("does/not/exist.csv", &CsvConfig::default());
        assert!(matches!(result, Err(LoadError::Source(_))));
    }
}
