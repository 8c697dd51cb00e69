#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod http;
mod handler;

pub use http::{Classification, ContentKind, Encoded, Payload};
pub use handler::InferenceHandler;
