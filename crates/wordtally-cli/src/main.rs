//! wordtally command-line interface

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wordtally::{BatchResult, SourceFile, TallyConfig, normalize_folder_input, process_batch, scan_folder};

/// Output format for batch results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned table followed by a summary line
    Text,
    /// The serialized batch result
    Json,
}

#[derive(Parser)]
#[command(name = "wordtally", version)]
#[command(about = "Count words in DOCX, PDF, TXT and Markdown files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count every supported file in a folder
    Scan {
        /// Folder to scan; surrounding quotes are ignored
        folder: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Count the given files
    Count {
        /// Files to count
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: RunOptions,
    },
}

#[derive(Args)]
struct RunOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Files processed at the same time (0 = one per CPU)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Per-file timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Configuration file (TOML or JSON); defaults to a discovered wordtally.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RunOptions {
    fn load_config(&self) -> Result<TallyConfig> {
        let mut config = match &self.config {
            Some(path) => TallyConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => TallyConfig::discover()
                .context("Failed to load discovered configuration")?
                .unwrap_or_default(),
        };

        match self.concurrency {
            Some(0) => config = config.with_cpu_concurrency(),
            Some(n) => config.max_concurrent_files = Some(n),
            None => {}
        }
        if let Some(seconds) = self.timeout {
            config.file_timeout_secs = Some(seconds);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (files, config, format) = match cli.command {
        Commands::Scan {
            folder,
            recursive,
            options,
        } => {
            let mut config = options.load_config()?;
            config.recursive |= recursive;

            let folder = normalize_folder_input(&folder);
            let files = scan_folder(&folder, &config).with_context(|| format!("Failed to scan {}", folder))?;
            (files, config, options.format)
        }
        Commands::Count { files, options } => {
            let config = options.load_config()?;
            let files = files.into_iter().map(SourceFile::from_path).collect::<Vec<_>>();
            (files, config, options.format)
        }
    };

    tracing::debug!(
        files = files.len(),
        concurrency = config.concurrency(),
        timeout_secs = ?config.file_timeout_secs,
        "Starting batch"
    );
    let batch = process_batch(files, &config).await.context("Batch processing failed")?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&batch)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
    }

    Ok(())
}

fn render_text(batch: &BatchResult) -> String {
    const HEADERS: [&str; 4] = ["FILENAME", "TYPE", "COUNT", "STATUS"];

    let rows: Vec<[String; 4]> = batch
        .results
        .iter()
        .map(|r| {
            [
                r.filename.clone(),
                r.file_type.clone(),
                r.count.to_string(),
                r.status.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 4]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.chars().count())))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_row(HEADERS);
    for row in &rows {
        push_row([&row[0], &row[1], &row[2], &row[3]]);
    }

    out.push_str(&format!(
        "\nTotal: {} files, {} words ({} failed)\n",
        batch.count,
        batch.total_count(),
        batch.failure_count()
    ));
    out
}
