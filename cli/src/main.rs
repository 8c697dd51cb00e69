#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[clap(name = "mobilenet", version)]
/// Classify images with MobileNetV2, locally or through the deployed API
struct Cli {
	#[clap(subcommand)]
	command: commands::Command,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	// Logs go to stderr so stdout only carries results.
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let outcome = commands::exec(cli.command).await?;

	println!("{}", render::render(&outcome));

	Ok(if outcome.is_error() {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}
