//
// main.rs
// Dicom-Png-rs
//
// Tokio entry point that installs logging and hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom_png::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // Delegate all argument parsing and dispatching to the CLI module.
    cli::run().await
}
