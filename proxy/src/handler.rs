use base64::{engine::general_purpose::STANDARD as Base64, Engine};
use serde::Deserialize;
use serde_json::Value;
use std::string::FromUtf8Error;

use crate::{
	endpoint::{Endpoint, InvokeError},
	envelope::Envelope,
};

/// Forwarded when the request has no body.
pub const EMPTY_BODY: &str = "{}";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
	#[error("Malformed request event: {0}")]
	Event(serde_json::Error),

	#[error("Request body is not valid base64: {0}")]
	Base64(#[from] base64::DecodeError),

	#[error("Request body is not valid UTF-8: {0}")]
	Utf8(#[from] FromUtf8Error),

	#[error("Endpoint response is not valid UTF-8: {0}")]
	ResponseUtf8(FromUtf8Error),

	#[error(transparent)]
	Invoke(#[from] InvokeError),
}

/// An HTTP API event, kept as received. Both the v2 (`requestContext.http.method`) and the
/// REST-style (`httpMethod`) shapes are accepted.
#[derive(Debug, Clone, Default)]
pub struct ProxyEvent {
	raw: Value,
}

/// The body fields of an event. A present field of the wrong type is an error, not an absence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventBody {
	body: Option<String>,
	is_base64_encoded: Option<bool>,
}

impl ProxyEvent {
	pub const fn from_value(raw: Value) -> Self {
		Self { raw }
	}

	pub fn method(&self) -> Option<&str> {
		self.raw
			.pointer("/requestContext/http/method")
			.and_then(Value::as_str)
			.or_else(|| self.raw.get("httpMethod").and_then(Value::as_str))
	}

	pub fn is_preflight(&self) -> bool {
		self.method()
			.is_some_and(|method| method.eq_ignore_ascii_case("OPTIONS"))
	}

	/// The request body as text, base64-decoded if the event says so.
	///
	/// # Errors
	///
	/// Returns an error if the event isn't an object, its `body` or `isBase64Encoded` has the wrong
	/// type, or the body is declared base64 but doesn't decode to UTF-8 text.
	pub fn text_body(&self) -> Result<String, ProxyError> {
		let fields = match &self.raw {
			Value::Null => EventBody::default(),
			Value::Object(_) => EventBody::deserialize(&self.raw).map_err(ProxyError::Event)?,
			other => {
				return Err(ProxyError::Event(serde::de::Error::custom(format!(
					"expected an object, got {other}"
				))))
			},
		};

		let body = fields
			.body
			.as_deref()
			.filter(|body| !body.is_empty())
			.unwrap_or(EMPTY_BODY);

		if !fields.is_base64_encoded.unwrap_or(false) {
			return Ok(body.to_string());
		}

		Ok(String::from_utf8(Base64.decode(body)?)?)
	}
}

/// Answer one HTTP event. Always produces an envelope.
pub async fn handle(event: &ProxyEvent, endpoint: &dyn Endpoint) -> Envelope {
	if event.is_preflight() {
		tracing::debug!("Answering CORS preflight");
		return Envelope::preflight();
	}

	match forward(event, endpoint).await {
		Ok(envelope) => envelope,
		Err(error) => {
			tracing::error!("Failed to proxy request: {error}");
			Envelope::error(&error.to_string())
		},
	}
}

async fn forward(event: &ProxyEvent, endpoint: &dyn Endpoint) -> Result<Envelope, ProxyError> {
	let body = event.text_body()?;

	let response = endpoint.invoke(body.into_bytes()).await?;
	let text = String::from_utf8(response).map_err(ProxyError::ResponseUtf8)?;

	Ok(serde_json::from_str::<Value>(&text).map_or_else(
		|_| {
			tracing::debug!("Endpoint answered with non-JSON text, wrapping it");
			Envelope::raw(&text)
		},
		|value| Envelope::ok(&value),
	))
}
