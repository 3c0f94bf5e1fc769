#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod config;
mod render;
mod sample;

pub use render::{PlotError, SvgRenderer};
pub use sample::{finite_runs, sample};
