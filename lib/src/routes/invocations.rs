use axum::{
	body::Bytes,
	http::{
		header::{ACCEPT, CONTENT_TYPE},
		HeaderMap,
	},
	response::{IntoResponse, Response},
	routing::post,
	Extension, Router,
};
use mobilenet_core::InferenceHandler;

use crate::{errors::HTTPError, runner::Runner};

pub fn handler<H: InferenceHandler + 'static>() -> Router {
	Router::new().route("/invocations", post(invoke::<H>))
}

/// Decode the body, run the model and encode its output.
pub async fn invoke<H: InferenceHandler + 'static>(
	Extension(runner): Extension<Runner<H>>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Response, HTTPError> {
	let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
	let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());

	tracing::debug!(
		"Received invocation: {} bytes, content type {content_type:?}",
		body.len()
	);

	let input = H::decode_input(&body, content_type);
	tracing::trace!("{input:?}");

	let (output, predict_time) = runner.run(input).await?;
	tracing::debug!("Prediction took {}ms", predict_time.as_millis());

	let encoded = H::encode_output(&output, accept)?;

	Ok(([(CONTENT_TYPE, encoded.content_type)], encoded.body).into_response())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{runner::tests::LengthModel, shutdown::Shutdown};
	use axum::http::{HeaderValue, StatusCode};
	use serde_json::{json, Value};

	async fn call(headers: HeaderMap, body: &'static [u8]) -> (StatusCode, HeaderMap, Value) {
		let runner = Runner::<LengthModel>::setup(Shutdown::new()).await.unwrap();

		let response = match invoke(Extension(runner), headers, Bytes::from_static(body)).await {
			Ok(response) => response,
			Err(error) => error.into_response(),
		};

		let status = response.status();
		let headers = response.headers().clone();
		let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

		(status, headers, serde_json::from_slice(&bytes).unwrap())
	}

	#[tokio::test]
	async fn invocation_returns_a_json_array() {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-image"));

		let (status, headers, body) = call(headers, b"four").await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(headers[CONTENT_TYPE], "application/json");
		assert_eq!(body, json!([{ "label": "4", "prob": 1.0 }]));
	}

	#[tokio::test]
	async fn unusable_input_is_an_empty_result() {
		let (status, _, body) = call(HeaderMap::new(), b"").await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!([]));
	}

	#[tokio::test]
	async fn model_failures_are_server_errors() {
		let (status, _, body) = call(HeaderMap::new(), b"fail").await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(body["detail"].as_str().unwrap().contains("backend exploded"));
	}
}
