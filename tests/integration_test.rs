use anyhow::Result;
use chrono::NaiveDate;
use compute_trends::chart::render_chart;
use compute_trends::config::{ChartConfig, Config};
use compute_trends::export::export_clean_csv;
use compute_trends::pipeline::processing::DropReason;
use compute_trends::{ChartError, Domain, Pipeline};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_fixture_pipeline_end_to_end() -> Result<()> {
    let output = Pipeline::new(reference_date()).run(&fixture("sample_systems.csv"))?;
    let report = &output.report;

    assert_eq!(report.rows_read, 12);
    assert_eq!(report.rows_kept, 9);
    assert_eq!(report.rows_dropped(), 3);
    assert_eq!(report.dates_corrected, 3);

    // Two-digit years that parsed into the future are back in their century
    let maze = output.table.find_system("Maze Runner").unwrap();
    assert_eq!(maze.publication_date, NaiveDate::from_ymd_opt(1950, 7, 2).unwrap());
    let checkers = output.table.find_system("Checkers Player").unwrap();
    assert_eq!(checkers.publication_date, NaiveDate::from_ymd_opt(1959, 7, 1).unwrap());

    assert_eq!(output.table.find_system("Speech Tagger").unwrap().domain, Domain::Language);
    assert_eq!(output.table.find_system("Walker Bot").unwrap().domain, Domain::Other);
    assert!(output.table.find_system("Broken Compute").is_none());
    assert!(output.table.find_system("Undated System").is_none());

    assert_eq!(report.unknown_labels.get("Robotics"), Some(&1));
    assert_eq!(report.unknown_labels.get("Other"), Some(&1));

    let by_reason = report.dropped_by_reason();
    assert_eq!(by_reason.get(&DropReason::MissingTrainingCompute), Some(&1));
    assert_eq!(by_reason.get(&DropReason::MissingPublicationDate), Some(&1));
    assert_eq!(by_reason.get(&DropReason::MissingSystem), Some(&1));

    let counts: Vec<(Domain, usize)> = report.domain_counts.iter().map(|(d, c)| (*d, *c)).collect();
    assert_eq!(
        counts,
        vec![
            (Domain::Vision, 2),
            (Domain::Games, 2),
            (Domain::Drawing, 1),
            (Domain::Language, 2),
            (Domain::Other, 2),
        ]
    );

    Ok(())
}

#[test]
fn test_post_pipeline_invariants_hold() -> Result<()> {
    let output = Pipeline::new(reference_date()).run(&fixture("sample_systems.csv"))?;

    for record in &output.table {
        assert!(!record.system.is_empty());
        assert!(record.publication_date <= reference_date());
        assert!(record.training_compute_flop.is_finite());
        assert!(record.training_compute_flop >= 0.0);
        assert!(Domain::ALL.contains(&record.domain));
    }

    Ok(())
}

#[test]
fn test_three_row_synthetic_input() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("three.csv");
    fs::write(
        &input,
        "System,Publication date,Training compute (FLOP),Domain\n\
         Valid,2015-12-10,1e19,Vision\n\
         Bad Compute,2016-01-01,not_a_number,Games\n\
         Odd Label,2018-06-11,1e20,Robotics\n",
    )?;

    let output = Pipeline::new(reference_date()).run(&input)?;

    assert_eq!(output.table.len(), 2);
    assert_eq!(output.table.find_system("Odd Label").unwrap().domain, Domain::Other);
    assert_eq!(output.table.find_system("Valid").unwrap().domain, Domain::Vision);
    Ok(())
}

#[test]
fn test_missing_input_is_io_error() {
    let err = Pipeline::new(reference_date())
        .run(Path::new("/nonexistent/input.csv"))
        .unwrap_err();
    assert!(matches!(err, ChartError::Io(_)));
}

#[test]
fn test_schema_mismatch_is_fatal() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("wrong.csv");
    fs::write(&input, "Name,Year\nAlexNet,2012\n")?;

    match Pipeline::new(reference_date()).run(&input) {
        Err(ChartError::Schema { missing }) => assert_eq!(missing.len(), 4),
        other => panic!("expected schema error, got {:?}", other.map(|o| o.table.len())),
    }
    Ok(())
}

#[test]
fn test_render_and_export_from_fixture() -> Result<()> {
    let temp_dir = tempdir()?;
    let chart_path = temp_dir.path().join("out").join("chart.svg");
    let csv_path = temp_dir.path().join("out").join("clean.csv");

    let output = Pipeline::new(reference_date()).run(&fixture("sample_systems.csv"))?;

    let mut chart = ChartConfig::default();
    chart.annotations = Config::from_toml_str(
        r#"
        [chart]
        annotations = [
            { system = "Big Language Model", label = "Big LM" },
            { system = "Not In Table" },
        ]
        "#,
    )?
    .chart
    .annotations;

    render_chart(&output.table, &chart, &chart_path)?;
    export_clean_csv(&output.table, &csv_path)?;

    let svg = fs::read_to_string(&chart_path)?;
    assert!(svg.contains("Big LM"));
    assert!(svg.contains(&chart.title));

    let clean = fs::read_to_string(&csv_path)?;
    let mut lines = clean.lines();
    assert_eq!(
        lines.next(),
        Some("system,publication_date,training_compute_flop,domain")
    );
    assert_eq!(lines.count(), 9);
    assert!(clean.contains("Maze Runner,1950-07-02,4e1,Other"));

    // The exported table reads back through the same pipeline unchanged
    let reread = Pipeline::new(reference_date()).run(&csv_path)?;
    assert_eq!(reread.table.records(), output.table.records());
    assert_eq!(reread.report.dates_corrected, 0);

    Ok(())
}
