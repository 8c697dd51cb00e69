use axum::Router;
use mobilenet_core::InferenceHandler;

pub mod invocations;
pub mod system;

pub fn handler<H: InferenceHandler + 'static>() -> Router {
	Router::new()
		.merge(system::handler::<H>())
		.merge(invocations::handler::<H>())
}
