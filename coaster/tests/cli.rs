use clap::Parser as _;
use coaster::{BaseArgs, Commands};
use rstest::rstest;
use std::{env, fs, path::PathBuf};

fn sample(name: &str) -> String {
    format!("{}/tests/samples/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn scratch(name: &str) -> PathBuf {
    env::temp_dir().join(format!("coaster-{}-{name}", std::process::id()))
}

#[test]
fn parses_render_flags() {
    let args = BaseArgs::try_parse_from([
        "coaster", "render", "track.csv", "-o", "track.svg", "--variable", "t", "--samples",
        "50", "--title", "Drop",
    ])
    .unwrap();

    match args.command {
        Commands::Render { curve, plot, .. } => {
            assert_eq!(curve.variable.unwrap().name(), "t");
            assert_eq!(plot.samples, Some(50));
            assert_eq!(plot.title.as_deref(), Some("Drop"));
            assert_eq!(plot.width, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn rejects_invalid_variable_names() {
    let result =
        BaseArgs::try_parse_from(["coaster", "validate", "track.csv", "--variable", "sin"]);
    assert!(result.is_err());
}

#[rstest]
#[case::smooth("smooth.csv", true, 4)]
#[case::trigonometric("trigonometric.csv", true, 2)]
#[case::kinked("kinked.csv", false, 2)]
fn validate_writes_a_report(#[case] name: &str, #[case] valid: bool, #[case] segments: u64) {
    let output = scratch(&format!("{name}.json"));
    let args = BaseArgs::try_parse_from([
        "coaster",
        "validate",
        &sample(name),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    args.evaluate().unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    fs::remove_file(&output).unwrap();

    assert_eq!(report["valid"], valid);
    assert_eq!(report["segments"], segments);
    assert_eq!(report.get("error").is_some(), !valid);
}

#[test]
fn render_writes_an_svg() {
    let output = scratch("smooth.svg");
    let args = BaseArgs::try_parse_from([
        "coaster",
        "render",
        &sample("smooth.csv"),
        "-o",
        output.to_str().unwrap(),
        "--width",
        "640",
    ])
    .unwrap();
    args.evaluate().unwrap();

    let svg = fs::read_to_string(&output).unwrap();
    fs::remove_file(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("width=\"640\""));
}

#[test]
fn render_refuses_invalid_curves() {
    let output = scratch("kinked.svg");
    let args = BaseArgs::try_parse_from([
        "coaster",
        "render",
        &sample("kinked.csv"),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let error = args.evaluate().unwrap_err();
    assert!(error.to_string().contains("slope"));
    assert!(!output.exists());
}
