//! Extract command - show the facts found in one document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use ordertally_core::text::{normalize_document, SegmentationPipeline};
use ordertally_core::{DocxDocument, FactExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input DOCX file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the normalized text split into blocks instead of the facts
    #[arg(long)]
    blocks: bool,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown.docx")
        .to_string();

    info!("Extracting facts from {}", args.input.display());

    let data = fs::read(&args.input)?;
    let document = DocxDocument::from_bytes(&data)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", filename, e))?;

    let output = if args.blocks {
        let text = normalize_document(&document);
        SegmentationPipeline::default()
            .segment(&text)
            .iter()
            .map(|block| format!("--- block {} ---\n{}\n", block.index, block.text))
            .collect::<String>()
    } else {
        let result = FactExtractor::new().extract_document(&document, &filename);
        serde_json::to_string_pretty(&result)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
