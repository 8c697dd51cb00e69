use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as Base64, Engine};
use mobilenet_core::Classification;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;

use crate::render::Outcome;

/// Upload the image as base64 JSON, the way the browser front end does.
pub async fn handle(image: &Path, url: &str) -> Result<Outcome> {
	let bytes = tokio::fs::read(image)
		.await
		.with_context(|| format!("Failed to read {}", image.display()))?;

	tracing::debug!("Sending {} bytes to {url}", bytes.len());
	let response = Client::new()
		.post(url)
		.json(&json!({ "image_base64": Base64.encode(bytes) }))
		.send()
		.await?;

	let status = response.status();
	let body = response.text().await?;

	Ok(normalize(status.as_u16(), &body))
}

/// Make sense of whatever the API answered: a prediction list, an error object, or a proxy
/// envelope (`{statusCode, body}`) wrapping either of them as a JSON string.
pub fn normalize(status: u16, body: &str) -> Outcome {
	let Ok(mut data) = serde_json::from_str::<Value>(body) else {
		return Outcome::Error(format!("HTTP {status}"));
	};

	if data.get("statusCode").is_some() {
		if let Some(inner) = data.get("body").and_then(Value::as_str) {
			data = serde_json::from_str(inner).unwrap_or_else(|_| Value::String(inner.to_string()));
		}
	}

	match data.get("error") {
		None | Some(Value::Null | Value::Bool(false)) => {},
		Some(Value::String(message)) if message.is_empty() => {},
		Some(Value::String(message)) => return Outcome::Error(message.clone()),
		Some(error) => return Outcome::Error(error.to_string()),
	}

	Outcome::Predictions(predictions(&data))
}

fn predictions(data: &Value) -> Vec<Classification> {
	let Some(items) = data.as_array() else {
		return vec![];
	};

	items
		.iter()
		.map(|item| {
			let label = match &item["label"] {
				Value::String(label) => label.clone(),
				Value::Null => String::new(),
				other => other.to_string(),
			};

			Classification::new(label, item["prob"].as_f64().unwrap_or(0.0))
		})
		.collect()
}
