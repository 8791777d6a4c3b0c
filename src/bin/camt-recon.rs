//! `camt-recon`: flatten CAMT.053 statements into a reconciliation CSV.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use camt_recon::CamtError;
use camt_recon::export::write_csv_file;
use camt_recon::recon::batch::{self, DEFAULT_OUTPUT};
use camt_recon::recon::{Converter, ProjectionMode};

#[derive(Parser)]
#[command(name = "camt-recon")]
#[command(about = "Flatten CAMT.053 bank statements into a reconciliation table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every .xml/.nda statement in a directory; failing files are skipped
    Batch {
        /// Directory containing the statement files (not searched recursively)
        dir: PathBuf,

        /// Output CSV file
        #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = ProjectionMode::Full)]
        mode: ProjectionMode,

        /// Print the per-file report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Convert the given statement files; the first failing file aborts the run
    Convert {
        /// Statement files, in output order
        files: Vec<PathBuf>,

        /// Output CSV file, required when files are given
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ProjectionMode::Full)]
        mode: ProjectionMode,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_batch(
    dir: PathBuf,
    output: PathBuf,
    mode: ProjectionMode,
    json: bool,
) -> Result<(), CamtError> {
    let converter = Converter::new(mode)?;
    let outcome = batch::process_directory(&dir, &converter)?;

    if json {
        let report = serde_json::to_string_pretty(&outcome.reports)
            .map_err(|e| CamtError::Export(e.to_string()))?;
        println!("{report}");
    }

    let failed = outcome.failed().count();
    if failed > 0 {
        warn!(failed, "some files could not be processed");
    }

    if outcome.table.is_empty() {
        eprintln!("No data extracted from any files.");
        return Ok(());
    }

    write_csv_file(&outcome.table, &output)?;
    println!("Data saved to: {}", output.display());
    println!("Total columns extracted: {}", outcome.table.columns().len());
    println!("Total rows: {}", outcome.table.len());
    Ok(())
}

/// The output path of `convert`; only required once there is something to convert.
fn convert_output(
    files: &[PathBuf],
    output: Option<PathBuf>,
) -> Result<Option<PathBuf>, clap::Error> {
    match output {
        None if !files.is_empty() => Err(Cli::command().error(
            ErrorKind::MissingRequiredArgument,
            "the following required arguments were not provided:\n  --output <OUTPUT>",
        )),
        output => Ok(output),
    }
}

fn cmd_convert(
    files: Vec<PathBuf>,
    output: PathBuf,
    mode: ProjectionMode,
) -> Result<(), CamtError> {
    if files.is_empty() {
        return Ok(());
    }

    let conversion = Converter::new(mode)?.convert_files(&files)?;
    if conversion.is_empty() {
        eprintln!("No data extracted from selected files.");
        return Ok(());
    }

    write_csv_file(&conversion.table, &output)?;
    info!(rows = conversion.table.len(), "conversion finished");
    println!("Data saved to: {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Batch {
            dir,
            output,
            mode,
            json,
        } => cmd_batch(dir, output, mode, json),
        Commands::Convert {
            files,
            output,
            mode,
        } => match convert_output(&files, output) {
            Ok(Some(output)) => cmd_convert(files, output, mode),
            Ok(None) => Ok(()),
            Err(e) => e.exit(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
