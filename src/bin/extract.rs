use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use filingintel::config::Config;
use filingintel::input::read_links;
use filingintel::pipeline::Extractor;
use filingintel::report::{self, CSV_FILE_NAME, XLSX_FILE_NAME};
use filingintel::ExportFormat;

/// Summarize every link of a CSV file into the 2l format and export the table.
#[derive(Debug, Parser)]
#[command(name = "extract")]
struct Args {
    /// CSV file with a `link` column
    #[arg(long, short)]
    input: PathBuf,

    /// Output file; defaults to 2l_summary.<format>
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    format: ExportFormat,

    /// Pause after each summarized link, overriding ROW_DELAY_MS
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Log at INFO instead of WARN
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::INFO } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so OPENAI_API_KEY from file is visible
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    let data = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let links = read_links(&data)?;

    let mut extractor = Extractor::new(&config)?;
    if let Some(ms) = args.delay_ms {
        extractor = extractor.with_row_delay(Duration::from_millis(ms));
    }

    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    let batch = extractor
        .run(&links, |i, _total, link| {
            pb.set_position(i as u64);
            pb.set_message(link.to_string());
        })
        .await;
    pb.finish_with_message("done");

    let output = args.output.unwrap_or_else(|| match args.format {
        ExportFormat::Csv => PathBuf::from(CSV_FILE_NAME),
        ExportFormat::Json => PathBuf::from("2l_summary.json"),
        ExportFormat::Xlsx => PathBuf::from(XLSX_FILE_NAME),
    });
    let bytes = match args.format {
        ExportFormat::Csv => report::write_csv(&batch.rows)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&batch)?,
        ExportFormat::Xlsx => report::write_xlsx(&batch.rows)?,
    };
    std::fs::write(&output, bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Extraction complete: {} links, {} summarized, {} failed -> {}",
        links.len(),
        batch.processed,
        batch.failed,
        output.display()
    );
    Ok(())
}
