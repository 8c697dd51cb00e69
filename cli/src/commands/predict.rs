use anyhow::{Context, Result};
use mobilenet_core::http::X_IMAGE;
use mobilenet_serve::{InferenceHandler, MobileNet, ServeConfig};
use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::render::Outcome;

/// Run the whole handler lifecycle in-process, as the container would for a raw image upload.
pub fn handle(image: &Path, model_dir: PathBuf, weights: PathBuf) -> Result<Outcome> {
	let config = ServeConfig::from_env()?
		.with_model_dir(model_dir)
		.with_weights(weights);

	eprintln!("Loading model from {}...", config.weights_path().display());
	let model = MobileNet::from_config(&config)?;

	let bytes = fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;
	let input = <MobileNet as InferenceHandler>::decode_input(&bytes, Some(X_IMAGE));

	Ok(Outcome::Predictions(model.predict(input)?))
}
