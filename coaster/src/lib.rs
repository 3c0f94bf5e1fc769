use clap::Parser;
use std::{path::PathBuf, process::ExitCode};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

pub mod config;
pub use config::AppConfig;

// The top-level arguments: an optional config file and the subcommand to execute
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "APP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<ExitCode> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Validate { io, curve } => {
                let variable = curve.variable.unwrap_or(config.variable);
                let (report, _) = validate::run(io.segments()?, &config.csv, variable);
                let mut json = serde_json::to_vec_pretty(&report)?;
                json.push(b'\n');
                io.emit(&json)?;
                Ok(report.exit_code())
            }
            Commands::Render { io, curve, plot } => {
                let variable = curve.variable.unwrap_or(config.variable);
                let plot = plot.apply(config.plot);
                let svg = render::run(io.segments()?, &config.csv, variable, plot)?;
                io.emit(svg.as_bytes())?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
