use coaster_core::models::{Segment, Symbol};

/// Evaluate `segment` at `count` evenly spaced points of its interval.
///
/// The first and last points are the interval's endpoints. A `y` of `None`
/// marks a point where the formula has no finite real value. Fewer than two
/// points are never produced, since the endpoints are always included.
pub fn sample(segment: &Segment, variable: &Symbol, count: usize) -> Vec<(f64, Option<f64>)> {
    let (start, end) = (segment.start().to_f64(), segment.end().to_f64());
    let count = count.max(2);
    let step = (end - start) / (count - 1) as f64;

    (0..count)
        .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
        .map(|x| {
            let y = segment
                .formula()
                .evaluate(variable, x)
                .filter(|y| y.is_finite());
            (x, y)
        })
        .collect()
}

/// Split samples into runs of consecutive finite points.
pub fn finite_runs(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    points
        .split(|(_, y)| y.is_none())
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().filter_map(|&(x, y)| Some((x, y?))).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn segment(formula: &str, start: &str, end: &str) -> Segment {
        Segment::parse(formula, start, end).unwrap()
    }

    #[test]
    fn samples_include_both_endpoints() {
        let points = sample(&segment("x**2", "0", "2"), &Symbol::default(), 5);
        assert_eq!(points.len(), 5);

        let expected = [(0.0, 0.0), (0.5, 0.25), (1.0, 1.0), (1.5, 2.25), (2.0, 4.0)];
        for (&(x, y), (ex, ey)) in points.iter().zip(expected) {
            assert_abs_diff_eq!(x, ex, epsilon = 1e-12);
            assert_abs_diff_eq!(y.unwrap(), ey, epsilon = 1e-12);
        }
    }

    #[test]
    fn symbolic_bounds_are_approximated() {
        let points = sample(&segment("sin(x)", "0", "pi/2"), &Symbol::default(), 3);
        assert_abs_diff_eq!(points[2].0, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(points[2].1.unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            points[1].1.unwrap(),
            std::f64::consts::FRAC_PI_4.sin(),
            epsilon = 1e-12
        );
    }

    #[rstest]
    #[case::zero(0)]
    #[case::one(1)]
    fn at_least_the_endpoints(#[case] count: usize) {
        let points = sample(&segment("x", "1", "3"), &Symbol::default(), count);
        assert_eq!(points.len(), 2);
        assert_abs_diff_eq!(points[0].0, 1.0);
        assert_abs_diff_eq!(points[1].0, 3.0);
    }

    #[test]
    fn undefined_points_are_marked() {
        let points = sample(&segment("log(x)", "0", "1"), &Symbol::default(), 3);
        assert_eq!(points[0].1, None);
        assert_abs_diff_eq!(points[2].1.unwrap(), 0.0);
    }

    #[test]
    fn runs_split_at_gaps() {
        let points = [
            (0.0, None),
            (1.0, Some(1.0)),
            (2.0, Some(2.0)),
            (3.0, None),
            (4.0, None),
            (5.0, Some(5.0)),
        ];
        assert_eq!(
            finite_runs(&points),
            vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(5.0, 5.0)]]
        );
    }
}
