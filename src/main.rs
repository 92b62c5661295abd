mod cli;
mod composite;
mod deserialise;
mod diagram;
mod error;
mod geometry;
mod reading;
mod render;
mod stats;

use std::{io, process::ExitCode};

use clap::Parser;
use cli::{command, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match command::generate(&cli) {
        Ok(paths) => {
            println!("{} diagrams saved to `{}`", paths.len(), cli.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
