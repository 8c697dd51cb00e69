#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod handler;

pub use config::ProxyConfig;
pub use endpoint::{Endpoint, SageMakerEndpoint};
pub use envelope::Envelope;
pub use handler::{handle, ProxyEvent};
