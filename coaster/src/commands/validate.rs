use coaster_core::{
    CurveError, ErrorKind, Location,
    models::{Curve, Symbol},
    ports::RecordSource,
};
use coaster_csv::{CsvSource, config::CsvConfig};
use serde::Serialize;
use std::{io::Read, process::ExitCode};
use tracing::{Level, event};

/// The outcome of validating one input, as written by `coaster validate`
#[derive(Debug, Serialize, PartialEq)]
pub struct Report {
    pub valid: bool,
    pub segments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ReportError {
    pub kind: ErrorKind,
    pub location: Location,
    pub message: String,
}

impl Report {
    fn new(segments: usize, outcome: &Result<Curve, CurveError>) -> Self {
        match outcome {
            Ok(_) => Self {
                valid: true,
                segments,
                error: None,
            },
            Err(error) => Self {
                valid: false,
                segments,
                error: Some(ReportError {
                    kind: error.kind(),
                    location: error.location(),
                    message: error.to_string(),
                }),
            },
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Load, parse and validate the records of `source`.
pub fn check(source: impl RecordSource, variable: Symbol) -> (Report, Result<Curve, CurveError>) {
    let (segments, outcome) = match source.load() {
        Ok(records) => (records.len(), Curve::from_records(variable, records)),
        Err(error) => (0, Err(error.into())),
    };

    match &outcome {
        Ok(_) => event!(Level::INFO, segments, "curve is valid"),
        Err(error) => event!(
            Level::WARN,
            kind = ?error.kind(),
            location = %error.location(),
            err = error.to_string(),
            "curve is invalid"
        ),
    }

    (Report::new(segments, &outcome), outcome)
}

/// Validate the CSV records read from `input`.
pub fn run(
    input: impl Read,
    csv: &CsvConfig,
    variable: Symbol,
) -> (Report, Result<Curve, CurveError>) {
    match CsvSource::from_reader(input, csv) {
        Ok(source) => check(source, variable),
        Err(error) => {
            let outcome = Err(CurveError::from(error));
            (Report::new(0, &outcome), outcome)
        }
    }
}
