#![warn(missing_docs)]
//! Core models and checks for validating piecewise-defined curves.
//!
//! A curve is described as an ordered list of segments, each a formula in a
//! single independent variable over an interval of that variable. This crate
//! parses such segments into an exact symbolic representation and decides
//! whether, taken together, they form one continuous curve with a continuous
//! first derivative.
//!
//! Loading the segment records and drawing the validated curve are the
//! responsibility of external adapters, described by the traits in [`ports`].

/// Core domain models for piecewise curves.
///
/// This module contains the symbolic expression type and the segment and curve
/// types built on top of it.
///
/// The models carry their own invariants: a [`models::Curve`] can only be
/// obtained by passing validation, so downstream consumers never need to check
/// it again.
pub mod models;

/// Interface traits for the external collaborators of the core.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// The core never reads files or draws images itself. Record loading and curve
/// rendering are provided by adapters implementing these traits, which keeps the
/// validation logic independent of any particular file format or plotting
/// library.
pub mod ports;

/// Conversion of formula and bound text into symbolic values.
pub mod parse;

/// The individual well-formedness predicates applied to segments.
pub mod rules;

mod error;
pub use error::{CurveError, ErrorKind};

mod validator;
pub use validator::{Location, Validator, Violation};
