use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use mobilenet_core::InferenceHandler;

use crate::{
	config::ServeConfig,
	runner::{Health, Runner},
};

pub fn handler<H: InferenceHandler + 'static>() -> Router {
	Router::new().route("/ping", get(ping::<H>))
}

#[derive(Debug, serde::Serialize)]
pub struct HealthCheckSetup {
	/// Setup status
	pub status: String,
	/// Setup started time
	pub started_at: String,
	/// Setup completed time
	pub completed_at: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthCheck {
	/// Current health status
	pub status: Health,
	/// Setup information
	pub setup: HealthCheckSetup,
	/// Deployed version, from `APP_VERSION`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
}

/// Container health check. Healthy once the model is loaded, even while a prediction is running.
#[allow(clippy::unused_async)]
pub async fn ping<H: InferenceHandler + 'static>(
	Extension(runner): Extension<Runner<H>>,
	Extension(config): Extension<ServeConfig>,
) -> (StatusCode, Json<HealthCheck>) {
	let status = runner.health();
	let times = runner.setup_times();

	let code = if matches!(status, Health::Ready | Health::Busy) {
		StatusCode::OK
	} else {
		StatusCode::SERVICE_UNAVAILABLE
	};

	(
		code,
		Json(HealthCheck {
			status,
			setup: HealthCheckSetup {
				status: "succeeded".to_string(),
				started_at: times.started_at.to_rfc3339(),
				completed_at: times.completed_at.to_rfc3339(),
			},
			version: config.app_version,
		}),
	)
}
