#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use mobilenet_proxy::{handle, ProxyConfig, ProxyEvent, SageMakerEndpoint};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
	// CloudWatch adds its own timestamps.
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_ansi(false)
		.without_time()
		.init();

	let config = ProxyConfig::from_env()?;
	tracing::info!(
		"Forwarding to endpoint {} in {}",
		config.endpoint_name,
		config.region
	);

	let endpoint = Arc::new(SageMakerEndpoint::new(&config).await);

	run(service_fn(move |event: LambdaEvent<Value>| {
		let endpoint = endpoint.clone();

		async move {
			let event = ProxyEvent::from_value(event.payload);
			Ok::<_, Error>(handle(&event, endpoint.as_ref()).await)
		}
	}))
	.await
}
