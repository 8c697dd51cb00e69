use mobilenet_core::{ContentKind, Payload};
use serde_json::Value;

use crate::helpers::base64_decode;

/// Fields that may carry the base64 image in a JSON request, in order of preference.
pub const IMAGE_FIELDS: [&str; 2] = ["image_base64", "b64"];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("Request body is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Request body is not a JSON object")]
	NotAnObject,

	#[error("Request body has no image field")]
	MissingImage,

	#[error("Image field is not valid base64: {0}")]
	Base64(#[from] base64::DecodeError),
}

/// Turn a request body into a payload, degrading to empty bytes whenever it can't be understood.
pub fn decode_input(body: &[u8], content_type: Option<&str>) -> Payload {
	match ContentKind::from_content_type(content_type) {
		ContentKind::RawImage | ContentKind::Other => Payload::Bytes(body.to_vec()),
		ContentKind::Json => Payload::Bytes(decode_json(body).unwrap_or_else(|error| {
			tracing::debug!("Using an empty payload: {error}");
			Vec::new()
		})),
	}
}

/// Extract the base64 image from a JSON request body.
///
/// # Errors
///
/// Returns an error if the body isn't a JSON object, has no image field, or the image isn't valid base64.
pub fn decode_json(body: &[u8]) -> Result<Vec<u8>, DecodeError> {
	let value: Value = serde_json::from_str(&String::from_utf8_lossy(body))?;
	let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

	let encoded = IMAGE_FIELDS
		.iter()
		.find_map(|field| object.get(*field).and_then(Value::as_str).filter(|s| !s.is_empty()))
		.ok_or(DecodeError::MissingImage)?;

	Ok(base64_decode(encoded)?)
}
