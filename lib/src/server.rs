use anyhow::Result;
use axum::{Extension, Server};
use mobilenet_core::InferenceHandler;

use crate::{config::ServeConfig, helpers::init_tracing, routes, runner::Runner, shutdown::Shutdown};

/// Load the handler, then serve the hosting contract until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the model fails to load, or the server fails to start.
pub async fn start<H: InferenceHandler + 'static>() -> Result<()> {
	init_tracing();

	let config = ServeConfig::from_env()?;
	let shutdown = Shutdown::new();

	// The model must be loaded before we accept any traffic.
	let runner = Runner::<H>::setup(shutdown.clone()).await?;

	let router = routes::handler::<H>()
		.layer(runner.extension())
		.layer(Extension(config.clone()));

	let addr = config.addr();
	tracing::info!("Starting server on {addr}...");
	Server::bind(&addr)
		.serve(router.into_make_service())
		.with_graceful_shutdown(shutdown.handle())
		.await?;

	Ok(())
}
