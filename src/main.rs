use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

use compute_trends::chart::render_chart;
use compute_trends::config::Config;
use compute_trends::export::export_clean_csv;
use compute_trends::logging;
use compute_trends::{Pipeline, PipelineReport};

#[derive(Parser)]
#[command(name = "compute_trends")]
#[command(about = "Clean the AI training-compute dataset and render the compute trend chart")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to compute_trends.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV, overrides [data].input
    #[arg(long)]
    input: Option<PathBuf>,

    /// Chart output path, overrides [output].chart
    #[arg(long)]
    output: Option<PathBuf>,

    /// Reference date for repairing future dates (YYYY-MM-DD, default: today UTC)
    #[arg(long, value_parser = parse_reference_date)]
    as_of: Option<NaiveDate>,

    /// Also write the cleaned table as CSV
    #[arg(long)]
    export_clean: Option<PathBuf>,

    /// Write the run report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Run the pipeline without rendering the chart
    #[arg(long)]
    no_render: bool,
}

fn parse_reference_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn print_summary(report: &PipelineReport) {
    println!("\n📊 Pipeline Results (reference date {}):", report.reference_date);
    println!("   Rows read: {}", report.rows_read);
    println!("   Rows kept: {}", report.rows_kept);
    println!("   Rows dropped: {}", report.rows_dropped());
    println!("   Dates shifted back a century: {}", report.dates_corrected);

    let by_reason = report.dropped_by_reason();
    if !by_reason.is_empty() {
        println!("\n⚠️  Dropped rows by missing field:");
        for (reason, count) in &by_reason {
            println!("   - {}: {}", reason.field(), count);
        }
    }

    if !report.unknown_labels.is_empty() {
        println!("\n🏷️  Labels folded into Other:");
        for (label, count) in &report.unknown_labels {
            println!("   - {}: {}", label, count);
        }
    }

    println!("\n📈 Systems per domain:");
    for (domain, count) in &report.domain_counts {
        println!("   {}: {}", domain, count);
    }
}

fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(input) = cli.input {
        config.data.input = input;
    }
    if let Some(output) = cli.output {
        config.output.chart = output;
    }
    if let Some(path) = cli.export_clean {
        config.output.clean_csv = Some(path);
    }

    // The only wall-clock read; every stage below gets this date injected
    let reference_date = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());

    println!("🔄 Cleaning {}...", config.data.input.display());
    let pipeline = Pipeline::new(reference_date).with_delimiter(config.delimiter_byte()?);
    let output = match pipeline.run(&config.data.input) {
        Ok(output) => output,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(e).with_context(|| {
                format!("Failed to prepare data from {}", config.data.input.display())
            });
        }
    };

    print_summary(&output.report);
    if output.report.rows_dropped() > 0 {
        warn!(dropped = output.report.rows_dropped(), "Incomplete rows excluded from chart");
    }

    if let Some(path) = &config.output.clean_csv {
        export_clean_csv(&output.table, path)
            .with_context(|| format!("Failed to export clean table to {}", path.display()))?;
        println!("\n📄 Clean table saved to: {}", path.display());
    }

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("📄 Report saved to: {}", path.display());
    }

    if cli.no_render {
        info!("Rendering skipped");
        return Ok(());
    }

    let chart_path = &config.output.chart;
    render_chart(&output.table, &config.chart, chart_path)
        .with_context(|| format!("Failed to render chart to {}", chart_path.display()))?;
    println!("\n✅ Chart saved to: {}", chart_path.display());

    Ok(())
}
