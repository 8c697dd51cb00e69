use base64::{engine::general_purpose::STANDARD as Base64, DecodeError, Engine};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Decode standard base64, ignoring any whitespace in the input (line-wrapped payloads are common).
pub fn base64_decode<T: AsRef<[u8]>>(bytes: T) -> Result<Vec<u8>, DecodeError> {
	let compact: Vec<u8> = bytes
		.as_ref()
		.iter()
		.copied()
		.filter(|b| !b.is_ascii_whitespace())
		.collect();

	Base64.decode(compact)
}

pub fn with_timing<T>(cb: impl FnOnce() -> T) -> (T, Duration) {
	let start = Instant::now();
	let result = cb();

	(result, start.elapsed())
}

/// Install the global log subscriber. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	// A subscriber may already be installed (e.g. by an embedding binary).
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.try_init()
		.ok();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base64_decode_skips_whitespace() {
		assert_eq!(base64_decode("aGVs\nbG8=\r\n").unwrap(), b"hello");
	}

	#[test]
	fn base64_decode_rejects_garbage() {
		assert!(base64_decode("not base64!").is_err());
	}

	#[test]
	fn with_timing_returns_the_result() {
		let (result, elapsed) = with_timing(|| 2 + 2);

		assert_eq!(result, 4);
		assert!(elapsed.as_secs() < 1);
	}
}
