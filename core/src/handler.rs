use anyhow::Result;
use core::fmt::Debug;
use serde::Serialize;

use crate::http::{Encoded, JSON};

/// A model served behind the hosting contract.
///
/// The hosting runtime drives every handler through the same lifecycle: `load` once per process,
/// then `decode_input`, `predict` and `encode_output` for each request.
pub trait InferenceHandler: Sized + Send {
	type Input: Debug + Send + 'static;
	type Output: Serialize + Debug + Send + 'static;

	/// Load the model
	///
	/// # Errors
	///
	/// Returns an error if the model cannot be loaded. The process is not expected to recover from it.
	fn load() -> Result<Self>;

	/// Turn a raw request body into the model input. Never fails: malformed input degrades to an empty payload.
	fn decode_input(body: &[u8], content_type: Option<&str>) -> Self::Input;

	/// Run a prediction on the model
	///
	/// # Errors
	///
	/// Returns an error if the model itself fails. Unusable input is not an error.
	fn predict(&self, input: Self::Input) -> Result<Self::Output>;

	/// Serialize the prediction for the response
	///
	/// # Errors
	///
	/// Returns an error if the output cannot be serialized.
	fn encode_output(output: &Self::Output, _accept: Option<&str>) -> Result<Encoded> {
		Ok(Encoded {
			body: serde_json::to_vec(output)?,
			content_type: JSON,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::http::{Classification, Payload};

	struct Constant;

	impl InferenceHandler for Constant {
		type Input = Payload;
		type Output = Vec<Classification>;

		fn load() -> Result<Self> {
			Ok(Self)
		}

		fn decode_input(body: &[u8], _: Option<&str>) -> Self::Input {
			Payload::Bytes(body.to_vec())
		}

		fn predict(&self, input: Self::Input) -> Result<Self::Output> {
			if input.is_empty() {
				return Ok(vec![]);
			}

			Ok(vec![Classification::new("tabby", 0.75)])
		}
	}

	#[test]
	fn default_encoding_is_a_json_array() {
		let handler = Constant::load().unwrap();
		let output = handler.predict(Constant::decode_input(b"x", None)).unwrap();

		let encoded = Constant::encode_output(&output, None).unwrap();

		assert_eq!(encoded.content_type, "application/json");
		assert_eq!(
			String::from_utf8(encoded.body).unwrap(),
			r#"[{"label":"tabby","prob":0.75}]"#
		);
	}

	#[test]
	fn empty_prediction_encodes_to_empty_array() {
		let handler = Constant::load().unwrap();
		let output = handler.predict(Constant::decode_input(b"", None)).unwrap();

		let encoded = Constant::encode_output(&output, Some("application/json")).unwrap();

		assert_eq!(encoded.body, b"[]");
	}
}
