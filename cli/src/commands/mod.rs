use anyhow::Result;
use clap::Subcommand;
use mobilenet_serve::config::{DEFAULT_MODEL_DIR, DEFAULT_WEIGHTS};
use std::path::PathBuf;

use crate::render::Outcome;

mod predict;
mod request;

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Classify an image locally with the pretrained model
	Predict {
		/// Image to classify
		image: PathBuf,
		/// Directory holding the weights and an optional labels.txt
		#[clap(long, env = "SM_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
		model_dir: PathBuf,
		/// Weights file, relative to the model directory unless absolute
		#[clap(long, env = "MODEL_WEIGHTS", default_value = DEFAULT_WEIGHTS)]
		weights: PathBuf,
	},

	/// Send an image through the deployed API
	Request {
		/// Image to classify
		image: PathBuf,
		/// URL of the API in front of the proxy function
		#[clap(long, env = "MOBILENET_API_URL")]
		url: String,
	},
}

pub async fn exec(command: Command) -> Result<Outcome> {
	match command {
		Command::Predict {
			image,
			model_dir,
			weights,
		} => tokio::task::spawn_blocking(move || predict::handle(&image, model_dir, weights))
			.await?,
		Command::Request { image, url } => request::handle(&image, &url).await,
	}
}
