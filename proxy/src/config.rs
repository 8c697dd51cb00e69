use std::env;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("ENDPOINT_NAME must be set to the inference endpoint to forward requests to")]
	MissingEndpoint,
}

/// Where to forward requests, read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
	pub endpoint_name: String,
	pub region: String,
}

impl ProxyConfig {
	/// Read the configuration from the process environment.
	///
	/// # Errors
	///
	/// Returns an error if `ENDPOINT_NAME` is missing or empty.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Read the configuration through the given variable lookup.
	///
	/// # Errors
	///
	/// Returns an error if `ENDPOINT_NAME` is missing or empty.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let endpoint_name = lookup("ENDPOINT_NAME")
			.filter(|name| !name.is_empty())
			.ok_or(ConfigError::MissingEndpoint)?;

		Ok(Self {
			endpoint_name,
			region: lookup("REGION")
				.filter(|region| !region.is_empty())
				.unwrap_or_else(|| DEFAULT_REGION.to_string()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_name_is_required() {
		assert_eq!(
			ProxyConfig::from_lookup(|_| None),
			Err(ConfigError::MissingEndpoint)
		);
		assert_eq!(
			ProxyConfig::from_lookup(|_| Some(String::new())),
			Err(ConfigError::MissingEndpoint)
		);
	}

	#[test]
	fn region_defaults_to_us_east_1() {
		let config = ProxyConfig::from_lookup(|key| {
			(key == "ENDPOINT_NAME").then(|| "mobilenet-v2".to_string())
		})
		.unwrap();

		assert_eq!(config.endpoint_name, "mobilenet-v2");
		assert_eq!(config.region, "us-east-1");
	}

	#[test]
	fn region_can_be_overridden() {
		let config = ProxyConfig::from_lookup(|key| match key {
			"ENDPOINT_NAME" => Some("mobilenet-v2".to_string()),
			"REGION" => Some("eu-west-1".to_string()),
			_ => None,
		})
		.unwrap();

		assert_eq!(config.region, "eu-west-1");
	}
}
