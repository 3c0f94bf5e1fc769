mod render;
mod source;

pub use render::CurveRenderer;
pub use source::{LoadError, RecordSource};
