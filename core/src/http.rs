use serde::{Deserialize, Serialize};

pub const JSON: &str = "application/json";
pub const X_IMAGE: &str = "application/x-image";

/// How a request body should be interpreted, based on its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
	/// Raw encoded image bytes (`application/x-image`)
	RawImage,
	/// A JSON object wrapping a base64 image (`application/json`)
	Json,
	/// Anything else, including a missing content type
	Other,
}

impl ContentKind {
	#[must_use]
	pub fn from_content_type(content_type: Option<&str>) -> Self {
		let Some(content_type) = content_type else {
			return Self::Other;
		};

		let content_type = content_type.to_ascii_lowercase();
		if content_type.contains(X_IMAGE) {
			Self::RawImage
		} else if content_type.contains(JSON) {
			Self::Json
		} else {
			Self::Other
		}
	}
}

/// A decoded request, ready for prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
	Bytes(Vec<u8>),
}

impl Payload {
	#[must_use]
	pub const fn empty() -> Self {
		Self::Bytes(Vec::new())
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Bytes(bytes) => bytes.is_empty(),
		}
	}
}

impl Default for Payload {
	fn default() -> Self {
		Self::empty()
	}
}

/// A single class of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
	/// Human-readable class name, or the class index when no name is known
	pub label: String,
	/// Softmax probability, in `[0, 1]`
	pub prob: f64,
}

impl Classification {
	pub fn new(label: impl Into<String>, prob: f64) -> Self {
		Self {
			label: label.into(),
			prob,
		}
	}
}

/// A serialized response body along with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
	pub body: Vec<u8>,
	pub content_type: &'static str,
}
