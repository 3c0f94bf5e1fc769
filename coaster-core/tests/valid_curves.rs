#![allow(unused_macros)]
use rstest_reuse::template;

// Curves that satisfy every rule, shared by the end-to-end tests. Each row is
// (formula, start_x, end_x).

#[template]
#[rstest]
#[case::single_cubic(&[("x**3+3", "-1", "1")])]
#[case::parabola_into_tangent(&[("x**2", "0", "1"), ("2*x - 1", "1", "3")])]
#[case::sine_into_plateau(&[("sin(x)", "0", "pi/2"), ("1", "pi/2", "2")])]
#[case::exponential_into_tangent(&[("exp(x)", "-1", "0"), ("x + 1", "0", "2")])]
#[case::decimal_bounds(&[("x**2/2", "0", "0.5"), ("x/2 - 1/8", "1/2", "1.5")])]
#[case::root_into_tangent(&[("sqrt(x)", "1", "4"), ("x/4 + 1", "4", "5")])]
#[case::even_cosine(&[("cos(x)", "0", "1"), ("cos(-x)", "1", "2")])]
#[case::cancelling_exponentials(&[("exp(x)*exp(-x)", "0", "1"), ("1", "1", "2")])]
#[case::sine_into_shifted_cosine(&[("sin(x)", "0", "pi/4"), ("cos(x - pi/2)", "pi/4", "1")])]
#[case::merged_radicals(&[("sqrt(2)*sqrt(3)*x", "0", "1"), ("sqrt(6)*x", "1", "2")])]
#[case::narrow_irrational_interval(&[("x", "10**20*pi", "10**20*pi + 1")])]
pub fn valid_curves(#[case] rows: &[(&str, &str, &str)]) {}
