use super::TrackIo;
use clap::{Args, Subcommand};
use coaster_core::models::Symbol;

pub mod render;
pub mod validate;

pub use render::PlotArgs;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the segments form a continuous, smooth curve and report the result as JSON
    Validate {
        #[command(flatten)]
        io: TrackIo,

        #[command(flatten)]
        curve: CurveArgs,
    },

    /// Validate the curve, then draw it as an SVG image
    Render {
        #[command(flatten)]
        io: TrackIo,

        #[command(flatten)]
        curve: CurveArgs,

        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Args, Debug)]
pub struct CurveArgs {
    /// The independent variable of the formulas (overrides the configuration)
    #[arg(long)]
    pub variable: Option<Symbol>,
}
