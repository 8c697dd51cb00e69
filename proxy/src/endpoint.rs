use async_trait::async_trait;
use aws_sdk_sagemakerruntime::{
	config::Region, error::DisplayErrorContext, primitives::Blob, Client,
};

use crate::config::ProxyConfig;

pub const JSON: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
	#[error("Failed to invoke endpoint {endpoint}: {message}")]
	Endpoint { endpoint: String, message: String },
}

/// A hosted model that takes a JSON payload and answers with a JSON payload.
#[async_trait]
pub trait Endpoint: Send + Sync {
	/// Send the payload as-is and return the raw response body.
	async fn invoke(&self, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError>;
}

/// A SageMaker real-time inference endpoint.
pub struct SageMakerEndpoint {
	client: Client,
	name: String,
}

impl SageMakerEndpoint {
	pub async fn new(config: &ProxyConfig) -> Self {
		let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
			.region(Region::new(config.region.clone()))
			.load()
			.await;

		Self {
			client: Client::new(&sdk_config),
			name: config.endpoint_name.clone(),
		}
	}
}

#[async_trait]
impl Endpoint for SageMakerEndpoint {
	async fn invoke(&self, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError> {
		tracing::debug!("Invoking endpoint {} with {} bytes", self.name, payload.len());

		let output = self
			.client
			.invoke_endpoint()
			.endpoint_name(&self.name)
			.content_type(JSON)
			.accept(JSON)
			.body(Blob::new(payload))
			.send()
			.await
			.map_err(|e| InvokeError::Endpoint {
				endpoint: self.name.clone(),
				message: DisplayErrorContext(&e).to_string(),
			})?;

		Ok(output
			.body()
			.map(|body| body.as_ref().to_vec())
			.unwrap_or_default())
	}
}
