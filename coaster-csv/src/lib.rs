#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod config;
mod source;

pub use source::CsvSource;
