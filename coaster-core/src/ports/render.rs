use crate::models::Curve;

/// Draws a validated curve.
///
/// Renderers only ever see a [`Curve`], so every segment they receive has
/// finite numeric bounds and a formula in the curve's variable alone.
pub trait CurveRenderer {
    /// The rendered artifact, e.g. an SVG document
    type Output;

    /// Error type for rendering failures
    type Error: std::error::Error;

    /// Render the curve.
    fn render(&self, curve: &Curve) -> Result<Self::Output, Self::Error>;
}
