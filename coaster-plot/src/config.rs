//! Configuration for curve rendering.

use serde::{Deserialize, Serialize};

/// Size and styling of the rendered chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Number of points sampled per segment, including both endpoints
    pub samples: usize,

    /// Blank space around the chart, in pixels
    pub margin: u32,

    /// Optional chart caption
    pub title: Option<String>,

    /// Line width of the segments, in pixels
    pub stroke_width: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples: 300,
            margin: 20,
            title: None,
            stroke_width: 2,
        }
    }
}
