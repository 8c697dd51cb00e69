use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const CORS_HEADERS: [(&str, &str); 4] = [
	("Content-Type", "application/json"),
	("Access-Control-Allow-Origin", "*"),
	("Access-Control-Allow-Methods", "POST,OPTIONS"),
	("Access-Control-Allow-Headers", "content-type,authorization"),
];

/// The response shape the HTTP front end expects from the function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
	pub status_code: u16,
	pub headers: HashMap<String, String>,
	/// JSON-encoded body
	pub body: String,
}

impl Envelope {
	pub fn new(status_code: u16, body: &Value) -> Self {
		Self {
			status_code,
			headers: CORS_HEADERS
				.iter()
				.map(|(name, value)| ((*name).to_string(), (*value).to_string()))
				.collect(),
			body: body.to_string(),
		}
	}

	pub fn ok(body: &Value) -> Self {
		Self::new(200, body)
	}

	pub fn preflight() -> Self {
		Self::ok(&json!({ "ok": true }))
	}

	pub fn raw(text: &str) -> Self {
		Self::ok(&json!({ "raw": text }))
	}

	pub fn error(message: &str) -> Self {
		Self::new(500, &json!({ "error": message }))
	}

	/// Parse the body back into JSON.
	///
	/// # Errors
	///
	/// Returns an error if the body is not valid JSON, which can't happen for envelopes built here.
	pub fn json(&self) -> serde_json::Result<Value> {
		serde_json::from_str(&self.body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_envelope_carries_cors_headers() {
		for envelope in [
			Envelope::preflight(),
			Envelope::raw("plain"),
			Envelope::error("boom"),
		] {
			assert_eq!(envelope.headers.len(), 4);
			assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
			assert_eq!(envelope.headers["Access-Control-Allow-Methods"], "POST,OPTIONS");
			assert_eq!(
				envelope.headers["Access-Control-Allow-Headers"],
				"content-type,authorization"
			);
			assert_eq!(envelope.headers["Content-Type"], "application/json");
		}
	}

	#[test]
	fn serializes_with_camel_case_keys() {
		let value = serde_json::to_value(Envelope::preflight()).unwrap();

		assert_eq!(value["statusCode"], 200);
		assert_eq!(value["body"], "{\"ok\":true}");
	}

	#[test]
	fn body_is_a_json_string() {
		assert_eq!(Envelope::raw("hi").json().unwrap(), json!({ "raw": "hi" }));
		assert_eq!(Envelope::error("x").status_code, 500);
	}
}
