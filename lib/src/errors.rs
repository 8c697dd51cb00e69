use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::{json, Value};

use crate::runner::Error as RunnerError;

#[derive(Debug)]
pub struct HTTPError {
	detail: Value,
	status_code: StatusCode,
}

impl HTTPError {
	pub fn new(detail: &str) -> Self {
		Self {
			detail: detail.into(),
			status_code: StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub const fn with_status(mut self, status_code: StatusCode) -> Self {
		self.status_code = status_code;
		self
	}

	pub const fn status_code(&self) -> StatusCode {
		self.status_code
	}
}

impl IntoResponse for HTTPError {
	fn into_response(self) -> Response {
		(self.status_code, Json(json!({ "detail": self.detail }))).into_response()
	}
}

impl From<RunnerError> for HTTPError {
	fn from(e: RunnerError) -> Self {
		tracing::error!("{e}");

		match e {
			RunnerError::WorkerGone => {
				Self::new(&e.to_string()).with_status(StatusCode::SERVICE_UNAVAILABLE)
			},
			RunnerError::Setup(_) | RunnerError::Prediction(_) => Self::new(&e.to_string()),
		}
	}
}

impl From<anyhow::Error> for HTTPError {
	fn from(e: anyhow::Error) -> Self {
		tracing::error!("{e:#}");

		Self::new(&format!("{e:#}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn runner_errors_map_to_status_codes() {
		let gone: HTTPError = RunnerError::WorkerGone.into();
		assert_eq!(gone.status_code(), StatusCode::SERVICE_UNAVAILABLE);

		let failed: HTTPError = RunnerError::Prediction(anyhow::anyhow!("oops")).into();
		assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(failed.detail, json!("Failed to run prediction: oops"));
	}

	#[test]
	fn status_can_be_overridden() {
		let error = HTTPError::new("nope").with_status(StatusCode::NOT_FOUND);

		assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
	}
}
