use anyhow::Context as _;
use clap::Args;
use std::{
    ffi::OsString,
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
};
use tracing::{Level, event};

/// Where the segment table comes from and where the result goes
#[derive(Args, Debug)]
pub struct TrackIo {
    /// CSV table of segments, or "-" for standard input
    input: Endpoint,

    /// Destination of the report or drawing, or "-" for standard output
    #[arg(short, long, default_value = "-")]
    output: Endpoint,
}

impl TrackIo {
    /// Open the segment table for reading
    pub fn segments(&self) -> anyhow::Result<Box<dyn Read>> {
        event!(Level::DEBUG, input = %self.input, "reading segments");
        Ok(match &self.input {
            Endpoint::Standard => Box::new(stdin().lock()),
            Endpoint::File(path) => Box::new(BufReader::new(
                File::open(path)
                    .with_context(|| format!("cannot open segment table {}", path.display()))?,
            )),
        })
    }

    /// Write `bytes` to the output in one go.
    ///
    /// A file output is only created here, so nothing is left behind when the
    /// input could not be read.
    pub fn emit(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut sink: Box<dyn Write> = match &self.output {
            Endpoint::Standard => Box::new(stdout().lock()),
            Endpoint::File(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("cannot create output {}", path.display()))?,
            )),
        };
        sink.write_all(bytes)?;
        sink.flush()?;
        event!(Level::DEBUG, output = %self.output, bytes = bytes.len(), "wrote output");
        Ok(())
    }
}

/// A file on disk, or the process's own standard stream (`-`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Standard,
    File(PathBuf),
}

impl From<OsString> for Endpoint {
    fn from(value: OsString) -> Self {
        if value == "-" {
            Self::Standard
        } else {
            Self::File(value.into())
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, process};

    fn track_io(input: &str, output: PathBuf) -> TrackIo {
        TrackIo {
            input: OsString::from(input).into(),
            output: output.into_os_string().into(),
        }
    }

    #[test]
    fn dash_selects_the_standard_stream() {
        assert_eq!(Endpoint::from(OsString::from("-")), Endpoint::Standard);
        assert_eq!(
            Endpoint::from(OsString::from("track.csv")),
            Endpoint::File("track.csv".into())
        );
        assert_eq!(Endpoint::Standard.to_string(), "-");
        assert_eq!(Endpoint::File("track.csv".into()).to_string(), "track.csv");
    }

    #[test]
    fn missing_tables_are_named() {
        let io = track_io("no/such/track.csv", env::temp_dir().join("unused.svg"));
        let error = io.segments().err().unwrap();
        assert!(error.to_string().contains("no/such/track.csv"));
    }

    #[test]
    fn emit_replaces_the_output_file() {
        let path = env::temp_dir().join(format!("coaster-emit-{}.json", process::id()));
        let io = track_io("-", path.clone());
        io.emit(b"{\"valid\": true}\n").unwrap();
        io.emit(b"{}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        fs::remove_file(path).unwrap();
    }
}
