use super::validate;
use clap::Args;
use coaster_core::{models::Symbol, ports::CurveRenderer as _};
use coaster_csv::config::CsvConfig;
use coaster_plot::{SvgRenderer, config::PlotConfig};
use std::io::Read;
use tracing::{Level, event};

/// Overrides for the configured plot settings
#[derive(Args, Debug, Default)]
pub struct PlotArgs {
    /// Points sampled per segment
    #[arg(long)]
    pub samples: Option<usize>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Chart caption
    #[arg(long)]
    pub title: Option<String>,
}

impl PlotArgs {
    pub fn apply(self, config: PlotConfig) -> PlotConfig {
        PlotConfig {
            samples: self.samples.unwrap_or(config.samples),
            width: self.width.unwrap_or(config.width),
            height: self.height.unwrap_or(config.height),
            title: self.title.or(config.title),
            ..config
        }
    }
}

/// Validate the CSV records read from `input` and draw the curve as SVG.
///
/// Nothing is drawn unless the whole curve is valid.
pub fn run(
    input: impl Read,
    csv: &CsvConfig,
    variable: Symbol,
    plot: PlotConfig,
) -> anyhow::Result<String> {
    let (_, outcome) = validate::run(input, csv, variable);
    let curve = outcome?;

    let svg = SvgRenderer::new(plot).render(&curve)?;
    event!(
        Level::INFO,
        segments = curve.segments().len(),
        bytes = svg.len(),
        "rendered curve"
    );
    Ok(svg)
}
