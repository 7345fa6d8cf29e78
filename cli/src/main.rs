//! tabmend CLI - reconcile captured price-sheet fragments into typed tables

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tabmend::{
    to_csv, to_json, CapturedDocument, CsvFileSink, JsonFormat, LayoutConfig, Pipeline,
    RecordTable, TableSink,
};

#[derive(Parser)]
#[command(name = "tabmend")]
#[command(version)]
#[command(about = "Reconcile captured price-sheet fragments into typed tables", long_about = None)]
struct Cli {
    /// Input capture file (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Document layout family
    #[arg(long, value_enum, default_value = "vertical")]
    layout: Layout,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one capture and print or write the table
    Read {
        /// Input capture file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document layout family
        #[arg(long, value_enum, default_value = "vertical")]
        layout: Layout,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print run counters to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Reconcile many captures, writing one CSV per input
    Batch {
        /// Input capture files (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Document layout family
        #[arg(long, value_enum, default_value = "vertical")]
        layout: Layout,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Print the canonical columns of a layout family
    Columns {
        /// Document layout family
        #[arg(long, value_enum, default_value = "vertical")]
        layout: Layout,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// Vertical price sheets with interleaved species banners
    Vertical,
    /// Horizontal (landscape) price sheets, exact 16-column fragments
    Horizontal,
}

impl Layout {
    fn config(self) -> LayoutConfig {
        match self {
            Layout::Vertical => LayoutConfig::vertical(),
            Layout::Horizontal => LayoutConfig::horizontal(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Comma-separated values
    Csv,
    /// Compact JSON array of objects
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Read {
            input,
            layout,
            format,
            output,
            stats,
        }) => cmd_read(&input, layout, format, output.as_deref(), stats),
        Some(Commands::Batch {
            inputs,
            layout,
            output,
        }) => cmd_batch(&inputs, layout, &output),
        Some(Commands::Columns { layout }) => {
            cmd_columns(layout);
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_read(&input, cli.layout, Format::Csv, None, false)
            } else {
                println!("{}", "Usage: tabmend <FILE> [--layout <LAYOUT>]".yellow());
                println!("       tabmend --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_read(
    input: &Path,
    layout: Layout,
    format: Format,
    output: Option<&Path>,
    stats: bool,
) -> tabmend::Result<()> {
    let capture = CapturedDocument::from_path(input)?;
    let pipeline = Pipeline::new(layout.config())?;
    let (table, counters) = pipeline.read_with_stats(&capture)?;

    if stats {
        eprintln!(
            "{} {} records, {}/{} fragments used, {} header rows, {} placeholders, {} unparseable cells",
            "Stats:".cyan().bold(),
            counters.records,
            counters.fragments_seen - counters.fragments_rejected,
            counters.fragments_seen,
            counters.header_rows,
            counters.placeholder_rows,
            counters.unparseable_cells,
        );
    }

    let rendered = render(&table, format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], layout: Layout, output_dir: &Path) -> tabmend::Result<()> {
    fs::create_dir_all(output_dir)?;
    let pipeline = Pipeline::new(layout.config())?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut total_records = 0;
    for input in inputs {
        pb.set_message(
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let capture = CapturedDocument::from_path(input)?;
        let table = pipeline.read(&capture)?;
        total_records += table.len();

        let dest = output_dir.join(input.with_extension("csv").file_name().unwrap_or_default());
        CsvFileSink::new(dest).replace(&table)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} {} files, {} records",
        "Done!".green().bold(),
        inputs.len(),
        total_records
    );
    Ok(())
}

fn cmd_columns(layout: Layout) {
    let config = layout.config();
    println!("{}", "Canonical columns:".green().bold());
    for (i, column) in config.schema.columns().iter().enumerate() {
        let marker = if i < config.extracted_arity {
            "extracted"
        } else {
            "derived"
        };
        println!("  {:2}  {:30} {:8} {}", i, column.name, format!("{:?}", column.kind).to_lowercase(), marker.dimmed());
    }
}

fn render(table: &RecordTable, format: Format) -> tabmend::Result<String> {
    match format {
        Format::Csv => to_csv(table),
        Format::Json => to_json(table, JsonFormat::Compact),
        Format::JsonPretty => to_json(table, JsonFormat::Pretty),
    }
}
