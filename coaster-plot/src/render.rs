use crate::{
    config::PlotConfig,
    sample::{finite_runs, sample},
};
use coaster_core::{models::Curve, ports::CurveRenderer};
use plotters::prelude::*;
use std::ops::Range;
use tracing::{Level, event};

/// Failure to draw a curve
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// The chart cannot be drawn with this configuration
    #[error("invalid plot configuration: {0}")]
    Config(String),

    /// The drawing backend failed
    #[error("unable to draw curve: {0}")]
    Drawing(String),
}

impl PlotError {
    fn drawing(error: impl std::fmt::Display) -> Self {
        Self::Drawing(error.to_string())
    }
}

/// Renders a [`Curve`] as an SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    config: PlotConfig,
}

impl SvgRenderer {
    /// A renderer with the given size and styling
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// The size and styling in use
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }
}

impl CurveRenderer for SvgRenderer {
    type Output = String;
    type Error = PlotError;

    fn render(&self, curve: &Curve) -> Result<String, PlotError> {
        let config = &self.config;
        if config.width == 0 || config.height == 0 {
            return Err(PlotError::Config(format!(
                "image size {}x{} is empty",
                config.width, config.height
            )));
        }

        let series: Vec<(String, Vec<Vec<(f64, f64)>>)> = curve
            .segments()
            .iter()
            .map(|segment| {
                let points = sample(segment, curve.variable(), config.samples);
                (segment.formula().to_string(), finite_runs(&points))
            })
            .collect();

        let (start, end) = curve.domain();
        let x_range = start.to_f64()..end.to_f64();
        let y_range = value_range(series.iter().flat_map(|(_, runs)| runs.iter().flatten()));
        event!(
            Level::DEBUG,
            segments = series.len(),
            ?x_range,
            ?y_range,
            "rendering curve"
        );

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(PlotError::drawing)?;

            let mut builder = ChartBuilder::on(&root);
            builder
                .margin(config.margin)
                .x_label_area_size(40)
                .y_label_area_size(60);
            if let Some(title) = &config.title {
                builder.caption(title, ("sans-serif", 24));
            }
            let mut chart = builder
                .build_cartesian_2d(x_range, y_range)
                .map_err(PlotError::drawing)?;

            chart
                .configure_mesh()
                .x_desc(curve.variable().name())
                .y_desc("y")
                .draw()
                .map_err(PlotError::drawing)?;

            for (index, (formula, runs)) in series.into_iter().enumerate() {
                let color = Palette99::pick(index);
                let style = color.stroke_width(config.stroke_width);
                for (run_index, run) in runs.into_iter().enumerate() {
                    let drawn = chart
                        .draw_series(LineSeries::new(run, style))
                        .map_err(PlotError::drawing)?;
                    if run_index == 0 {
                        drawn.label(formula.clone()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], style)
                        });
                    }
                }
            }

            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()
                .map_err(PlotError::drawing)?;

            root.present().map_err(PlotError::drawing)?;
        }

        Ok(svg)
    }
}

/// The vertical range covering every point, padded by 5% on each side.
///
/// A flat curve gets a unit range around its value, and a curve with no finite
/// points at all is drawn over `-1..1`.
fn value_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Range<f64> {
    let (low, high) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &(_, y)| {
        (low.min(y), high.max(y))
    });
    if low > high {
        return -1.0..1.0;
    }
    if high - low < f64::EPSILON * high.abs().max(1.0) {
        return (low - 1.0)..(high + 1.0);
    }
    let pad = (high - low) * 0.05;
    (low - pad)..(high + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use coaster_core::models::{SegmentRecord, Symbol};

    fn curve(rows: &[(&str, &str, &str)]) -> Curve {
        let records = rows
            .iter()
            .map(|(formula, start, end)| SegmentRecord::new(*formula, *start, *end));
        Curve::from_records(Symbol::default(), records).unwrap()
    }

    #[test]
    fn renders_an_svg_document() {
        let renderer = SvgRenderer::new(PlotConfig {
            title: Some("Test coaster".into()),
            ..Default::default()
        });
        let svg = renderer
            .render(&curve(&[("x**2", "0", "1"), ("2*x - 1", "1", "3")]))
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Test coaster"));
        assert!(svg.contains("2*x - 1"));
        assert!(svg.contains("width=\"1280\""));
    }

    #[test]
    fn every_segment_is_drawn() {
        let one = SvgRenderer::default()
            .render(&curve(&[("x**3+3", "-1", "1")]))
            .unwrap();
        let two = SvgRenderer::default()
            .render(&curve(&[("x**2", "0", "1"), ("2*x - 1", "1", "3")]))
            .unwrap();
        // each segment is labelled with its formula in the legend
        assert!(one.contains("x**3 + 3"));
        assert!(!one.contains("x**2"));
        assert!(two.contains("x**2"));
        assert!(two.contains("2*x - 1"));
        assert!(!two.contains("x**3 + 3"));
    }

    #[test]
    fn empty_images_are_rejected() {
        let renderer = SvgRenderer::new(PlotConfig {
            width: 0,
            ..Default::default()
        });
        let result = renderer.render(&curve(&[("x", "0", "1")]));
        assert!(matches!(result, Err(PlotError::Config(_))));
    }

    #[test]
    fn value_range_is_padded() {
        let range = value_range([(0.0, 0.0), (1.0, 10.0)].iter());
        assert_abs_diff_eq!(range.start, -0.5);
        assert_abs_diff_eq!(range.end, 10.5);
    }

    #[test]
    fn flat_and_empty_ranges_are_widened() {
        let flat = value_range([(0.0, 3.0), (1.0, 3.0)].iter());
        assert_abs_diff_eq!(flat.start, 2.0);
        assert_abs_diff_eq!(flat.end, 4.0);

        let empty = value_range(std::iter::empty());
        assert_eq!(empty, -1.0..1.0);
    }
}
