//
// cli.rs
// Dicom-Png-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use crate::models::HeaderResponse;
use crate::{batch, dump, image, tag, values, web};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "dicom-png")]
#[command(about = "Read DICOM headers and render pixel data as PNG", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one header value as JSON
    Header {
        file: PathBuf,
        /// Tag as 8 hex digits, optionally prefixed with `x` or `0x` (e.g. x00100010)
        tag: String,
    },
    /// Print every header value as JSON
    Headers { file: PathBuf },
    /// Dump the top-level elements as text
    Dump {
        file: PathBuf,
        #[arg(long, default_value_t = 64)]
        max_value_len: usize,
    },
    /// Convert the pixel data to a PNG
    ToPng {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every .dcm file under a directory
    Batch {
        #[arg(short, long)]
        directory: PathBuf,
    },
    /// Start the web server
    Web {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Directory holding uploaded DICOM files and generated PNGs
        #[arg(long, default_value = "public/assets")]
        storage_dir: PathBuf,
    },
}

pub async fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();

    match cli.command {
        Commands::Header { file, tag: raw } => {
            let tag = tag::normalize(Some(raw.as_str()))?;
            let bytes = read(&file)?;
            let value = values::extract_from_bytes(&bytes, tag)?;
            if value.is_absent() {
                bail!("No header found for tag: \"{}\"", tag);
            }
            let response = HeaderResponse { tag, value };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Headers { file } => {
            let headers = values::extract_all_from_bytes(&read(&file)?);
            println!("{}", serde_json::to_string_pretty(&headers)?);
        }
        Commands::Dump {
            file,
            max_value_len,
        } => dump::dump_file(&file, max_value_len)?,
        Commands::ToPng { input, output } => {
            let saved = image::convert(&input, output)?;
            println!("Image saved to: {:?}", saved);
        }
        Commands::Batch { directory } => {
            let outcomes = batch::process_directory(&directory)?;
            let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
            if failed > 0 {
                bail!("{} of {} file(s) failed to convert", failed, outcomes.len());
            }
        }
        Commands::Web {
            host,
            port,
            storage_dir,
        } => web::start_server(&host, port, &storage_dir).await?,
    }

    Ok(())
}

fn read(path: &std::path::Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}
