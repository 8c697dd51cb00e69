use std::{
	env,
	net::SocketAddr,
	num::ParseIntError,
	path::{Path, PathBuf},
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MODEL_DIR: &str = "/opt/ml/model";
pub const DEFAULT_WEIGHTS: &str = "mobilenet_v2.safetensors";
pub const LABELS_FILE: &str = "labels.txt";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid port {0:?}: {1}")]
	InvalidPort(String, ParseIntError),
}

/// Settings for the inference container, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
	pub port: u16,
	pub model_dir: PathBuf,
	pub weights: PathBuf,
	/// Deployment marker, logged when the model loads
	pub app_version: Option<String>,
}

impl ServeConfig {
	/// Read the configuration from the process environment.
	///
	/// # Errors
	///
	/// Returns an error if the port is set but cannot be parsed.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Read the configuration through the given variable lookup.
	///
	/// # Errors
	///
	/// Returns an error if the port is set but cannot be parsed.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let port = match lookup("SAGEMAKER_BIND_TO_PORT").or_else(|| lookup("PORT")) {
			Some(port) => port
				.trim()
				.parse()
				.map_err(|e| ConfigError::InvalidPort(port, e))?,
			None => DEFAULT_PORT,
		};

		Ok(Self {
			port,
			model_dir: lookup("SM_MODEL_DIR")
				.map_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR), PathBuf::from),
			weights: lookup("MODEL_WEIGHTS")
				.map_or_else(|| PathBuf::from(DEFAULT_WEIGHTS), PathBuf::from),
			app_version: lookup("APP_VERSION").filter(|v| !v.is_empty()),
		})
	}

	#[must_use]
	pub fn with_model_dir(mut self, model_dir: impl Into<PathBuf>) -> Self {
		self.model_dir = model_dir.into();
		self
	}

	#[must_use]
	pub fn with_weights(mut self, weights: impl Into<PathBuf>) -> Self {
		self.weights = weights.into();
		self
	}

	#[must_use]
	pub fn addr(&self) -> SocketAddr {
		SocketAddr::from(([0, 0, 0, 0], self.port))
	}

	/// Weights file, relative to the model directory unless absolute.
	#[must_use]
	pub fn weights_path(&self) -> PathBuf {
		self.resolve(&self.weights)
	}

	#[must_use]
	pub fn labels_path(&self) -> PathBuf {
		self.model_dir.join(LABELS_FILE)
	}

	fn resolve(&self, path: &Path) -> PathBuf {
		if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.model_dir.join(path)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
			.collect();

		move |key| vars.get(key).cloned()
	}

	#[test]
	fn defaults_match_the_hosting_contract() {
		let config = ServeConfig::from_lookup(lookup(&[])).unwrap();

		assert_eq!(config.port, 8080);
		assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
		assert_eq!(
			config.weights_path(),
			PathBuf::from("/opt/ml/model/mobilenet_v2.safetensors")
		);
		assert_eq!(config.labels_path(), PathBuf::from("/opt/ml/model/labels.txt"));
		assert_eq!(config.app_version, None);
	}

	#[test]
	fn sagemaker_port_takes_precedence() {
		let config = ServeConfig::from_lookup(lookup(&[
			("SAGEMAKER_BIND_TO_PORT", "9090"),
			("PORT", "5000"),
		]))
		.unwrap();

		assert_eq!(config.port, 9090);
	}

	#[test]
	fn invalid_port_is_rejected() {
		let error = ServeConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();

		assert!(error.to_string().contains("\"http\""));
	}

	#[test]
	fn absolute_weights_are_not_joined() {
		let config = ServeConfig::from_lookup(lookup(&[
			("SM_MODEL_DIR", "/models"),
			("MODEL_WEIGHTS", "/weights/v2.ot"),
			("APP_VERSION", "2024-05-01"),
		]))
		.unwrap();

		assert_eq!(config.weights_path(), PathBuf::from("/weights/v2.ot"));
		assert_eq!(config.labels_path(), PathBuf::from("/models/labels.txt"));
		assert_eq!(config.app_version.as_deref(), Some("2024-05-01"));
	}
}
