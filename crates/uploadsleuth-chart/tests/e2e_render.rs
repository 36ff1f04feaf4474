/// End-to-end renderer tests: each format written to a real temp directory.
use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;
use uploadsleuth_chart::{render, ChartError, ChartOptions};
use uploadsleuth_core::analysis::bucketize;
use uploadsleuth_core::config::ChartFormat;
use uploadsleuth_core::model::FrequencySeries;

fn series() -> FrequencySeries {
    let t = |s: &str| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
    bucketize(
        &[
            t("2024-01-01T00:00:00Z"),
            t("2024-01-01T00:04:30Z"),
            t("2024-01-01T00:10:00Z"),
        ],
        TimeDelta::minutes(5),
    )
    .unwrap()
}

#[test]
fn html_artifact_is_written() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme-frequency-upload-chart.html");

    render(&series(), ChartFormat::Html, &path, &ChartOptions::default()).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("\"y\":[2,0,1]"));
}

#[test]
fn png_artifact_is_written() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/dir/acme-uploads-frequency.png");

    let options = ChartOptions {
        width: 640,
        height: 360,
        ..ChartOptions::default()
    };
    render(&series(), ChartFormat::Png, &path, &options).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn csv_artifact_is_written() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme-uploads-frequency.csv");

    render(&series(), ChartFormat::Csv, &path, &ChartOptions::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 4);
}

/// A failed render leaves neither the artifact nor a temp file behind.
#[test]
fn failed_render_leaves_nothing_on_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tiny.png");
    let options = ChartOptions {
        width: 10,
        height: 10,
        ..ChartOptions::default()
    };

    let err = render(&series(), ChartFormat::Png, &path, &options).unwrap_err();

    assert!(matches!(err, ChartError::ImageSize { .. }));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
