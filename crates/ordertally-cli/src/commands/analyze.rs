//! Analyze command - build the report for a set of order sheets.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ordertally_core::models::report::AnalysisReport;
use ordertally_core::{analyze_documents, FactExtractor, UploadedDocument};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write the customer table as CSV
    #[arg(long)]
    customers_csv: Option<PathBuf>,

    /// Skip the demand forecast
    #[arg(long)]
    no_forecast: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.no_forecast {
        config.report.forecast.enabled = false;
    }

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching .docx files found for: {}", args.inputs.join(" "));
    }

    eprintln!(
        "{} Found {} documents to analyze",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown.docx")
            .to_string();
        pb.set_message(filename.clone());

        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        documents.push(UploadedDocument::new(filename, data));
        pb.inc(1);
    }

    pb.set_message("extracting");
    pb.enable_steady_tick(Duration::from_millis(100));
    let report = analyze_documents(&documents, &FactExtractor::new(), &config.report)
        .map_err(|e| anyhow::anyhow!("Analysis failed: {}", e))?;
    pb.finish_and_clear();

    info!("Analyzed {} documents in {:?}", documents.len(), start.elapsed());

    if let Some(csv_path) = &args.customers_csv {
        write_customers_csv(csv_path, &report)?;
        eprintln!(
            "{} Customer table written to {}",
            style("✓").green(),
            csv_path.display()
        );
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_report_text(&report),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Report written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Expand every pattern, keeping `.docx` files in first-seen order.
fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        for path in glob(pattern)?.filter_map(|r| r.ok()) {
            if is_docx(&path) && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn is_docx(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"))
}

fn write_customers_csv(path: &Path, report: &AnalysisReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["customer", "order_count", "amount", "filename"])?;
    for customer in &report.top_customers {
        wtr.write_record([
            customer.customer.as_str(),
            &customer.order_count.to_string(),
            &format!("{:.2}", customer.amount),
            customer.filename.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_report_text(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Total orders: {}\n", report.total_orders));
    output.push('\n');

    output.push_str("Top sizes:\n");
    if report.top_sizes.is_empty() {
        output.push_str("  (none)\n");
    }
    for entry in &report.top_sizes {
        output.push_str(&format!("  {:>4}  x{}\n", entry.size, entry.count));
    }
    output.push('\n');

    output.push_str("Per file:\n");
    for file in &report.per_file {
        let sizes: Vec<String> = file
            .top_sizes
            .iter()
            .map(|s| format!("{} x{}", s.size, s.count))
            .collect();
        output.push_str(&format!(
            "  {}: {} orders ({})\n",
            file.filename,
            file.total_orders,
            sizes.join(", ")
        ));
    }
    output.push('\n');

    output.push_str("Top customers:\n");
    if report.top_customers.is_empty() {
        output.push_str("  (none)\n");
    }
    for customer in &report.top_customers {
        output.push_str(&format!(
            "  {:<14} {:>3} orders {:>10.2}  {}\n",
            customer.customer, customer.order_count, customer.amount, customer.filename
        ));
    }

    if let Some(predicted) = &report.predicted_top_sizes {
        output.push('\n');
        output.push_str("Predicted demand:\n");
        for entry in predicted {
            output.push_str(&format!("  {:>4}  {:.2}\n", entry.size, entry.predicted_demand));
        }
    }

    output
}
