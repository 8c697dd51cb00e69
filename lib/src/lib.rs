#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub use config::ServeConfig;
pub use mobilenet::{Backbone, MobileNet, TorchBackbone};
pub use mobilenet_core::{Classification, InferenceHandler, Payload};
pub use server::start;

pub mod config;
pub mod decode;
mod errors;
mod helpers;
pub mod mobilenet;
pub mod preprocess;
mod routes;
mod runner;
mod server;
mod shutdown;

pub use helpers::init_tracing;

#[macro_export]
macro_rules! start {
	($handler:ty) => {
		#[tokio::main]
		async fn main() -> anyhow::Result<()> {
			$crate::start::<$handler>().await
		}
	};
}
