//! FILENAME: app/cli/src/main.rs
//! Tabula command-line tool: inspect, transform and convert tables stored as
//! delimited text or JSON.

mod config;
mod demo;
mod display;
mod pipeline;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use config::{CliConfig, CodecOverrides};
use persistence::{load_table, save_table, Import};
use pipeline::{Pipeline, PipelineArgs};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Tabula - in-memory table transformations over CSV and JSON files")]
#[command(version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file with codec options
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    codec: CodecArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct CodecArgs {
    /// CSV field delimiter
    #[arg(long, global = true)]
    delimiter: Option<char>,

    /// Read and write Null as the literal text `null` in CSV
    #[arg(long, global = true)]
    null_literal: bool,

    /// Fail on CSV records with the wrong number of fields instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Indentation width for JSON output
    #[arg(long, global = true)]
    indent: Option<usize>,
}

impl From<&CodecArgs> for CodecOverrides {
    fn from(args: &CodecArgs) -> Self {
        CodecOverrides {
            delimiter: args.delimiter,
            null_literal: args.null_literal,
            strict: args.strict,
            indent: args.indent,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print shape, column types and the first rows of a file
    Show {
        file: PathBuf,

        /// Number of rows to print
        #[arg(long)]
        head: Option<usize>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Load a file, transform it and save it (format chosen by extension)
    Convert {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Run the built-in sample walkthrough
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut config = CliConfig::load_or_default(cli.config.as_deref())?;
    config.apply(&CodecOverrides::from(&cli.codec))?;

    match cli.command {
        Commands::Show {
            file,
            head,
            pipeline,
        } => {
            let table = load(&file, &config)?;
            let table = Pipeline::from_args(&pipeline)?.apply(table)?;
            println!("{}", display::render_shape(&table));
            print!("{}", display::render_data_types(&table));
            println!();
            print!("{}", display::render_rows(&table, head.unwrap_or(config.head)));
        }
        Commands::Convert {
            input,
            output,
            pipeline,
        } => {
            let table = load(&input, &config)?;
            let table = Pipeline::from_args(&pipeline)?.apply(table)?;
            save_table(&table, &output, &config.exchange())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Wrote {} rows x {} columns to {}",
                table.row_count(),
                table.column_count(),
                output.display()
            );
        }
        Commands::Demo => {
            print!("{}", demo::run()?);
        }
    }

    Ok(())
}

fn load(path: &Path, config: &CliConfig) -> Result<engine::Table> {
    let Import { table, report } = load_table(path, &config.exchange())
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if report.records_skipped() > 0 {
        log::warn!(
            "{}: skipped {} malformed records (lines {:?})",
            path.display(),
            report.records_skipped(),
            report.skipped_lines
        );
    }
    Ok(table)
}
