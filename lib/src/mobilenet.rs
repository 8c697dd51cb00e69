use anyhow::{Context, Result};
use mobilenet_core::{Classification, InferenceHandler, Payload};
use std::{fs, path::Path};
use tch::{
	nn::{ModuleT, VarStore},
	vision::{imagenet, mobilenet},
	Device, Tensor,
};

use crate::{config::ServeConfig, decode, preprocess};

/// Number of classes reported per prediction.
pub const TOP_K: usize = 5;

/// The network part of the classifier: normalized pixels in, one logit per class out.
pub trait Backbone: Send {
	/// Run a forward pass on a single `[3, 224, 224]` image.
	///
	/// # Errors
	///
	/// Returns an error if the forward pass fails.
	fn forward(&self, pixels: &[f32]) -> Result<Vec<f32>>;
}

/// MobileNetV2 on libtorch, pinned to one CPU thread.
pub struct TorchBackbone {
	model: Box<dyn ModuleT + Send>,
}

impl TorchBackbone {
	/// Build the network and load its pretrained weights (`.ot`, `.safetensors` or `.npz`).
	///
	/// # Errors
	///
	/// Returns an error if the weights cannot be loaded into the network.
	pub fn load(weights: &Path) -> Result<Self> {
		tch::set_num_threads(1);

		let mut vs = VarStore::new(Device::Cpu);
		let model = Box::new(mobilenet::v2(&vs.root(), imagenet::CLASS_COUNT));
		vs.load(weights)
			.with_context(|| format!("Failed to load weights from {}", weights.display()))?;

		Ok(Self { model })
	}
}

impl Backbone for TorchBackbone {
	fn forward(&self, pixels: &[f32]) -> Result<Vec<f32>> {
		let side = i64::from(preprocess::CROP);
		let input = Tensor::from_slice(pixels).view([1, 3, side, side]);

		let logits = tch::no_grad(|| self.model.forward_t(&input, false));

		Ok(Vec::<f32>::try_from(&logits.view([-1]))?)
	}
}

/// Image classifier following the hosting lifecycle.
pub struct MobileNet<B: Backbone = TorchBackbone> {
	backbone: B,
	labels: Option<Vec<String>>,
}

impl<B: Backbone> MobileNet<B> {
	pub const fn new(backbone: B, labels: Option<Vec<String>>) -> Self {
		Self { backbone, labels }
	}

	/// Classify an encoded image. Bytes that aren't a decodable image give an empty result.
	///
	/// # Errors
	///
	/// Returns an error if the backbone fails.
	pub fn classify(&self, bytes: &[u8]) -> Result<Vec<Classification>> {
		let image = match preprocess::decode_image(bytes) {
			Ok(image) => image,
			Err(error) => {
				tracing::debug!("No usable image in payload: {error}");
				return Ok(vec![]);
			},
		};

		let logits = self.backbone.forward(&preprocess::preprocess(&image))?;

		Ok(top_k(&softmax(&logits), TOP_K)
			.into_iter()
			.map(|(index, prob)| Classification::new(self.label_for(index), f64::from(prob)))
			.collect())
	}

	fn label_for(&self, index: usize) -> String {
		self.labels
			.as_ref()
			.and_then(|labels| labels.get(index))
			.map_or_else(|| index.to_string(), Clone::clone)
	}
}

impl MobileNet<TorchBackbone> {
	/// Load the pretrained network and its labels from the configured model directory.
	///
	/// # Errors
	///
	/// Returns an error if the weights or an existing labels file cannot be read.
	pub fn from_config(config: &ServeConfig) -> Result<Self> {
		tracing::info!(
			"Loading MobileNetV2, APP_VERSION={}",
			config.app_version.as_deref().unwrap_or("unset")
		);

		let backbone = TorchBackbone::load(&config.weights_path())?;
		let labels = read_labels(&config.labels_path())?
			.unwrap_or_else(|| imagenet::CLASSES.iter().map(ToString::to_string).collect());

		Ok(Self::new(backbone, Some(labels)))
	}
}

impl InferenceHandler for MobileNet<TorchBackbone> {
	type Input = Payload;
	type Output = Vec<Classification>;

	fn load() -> Result<Self> {
		Self::from_config(&ServeConfig::from_env()?)
	}

	fn decode_input(body: &[u8], content_type: Option<&str>) -> Self::Input {
		decode::decode_input(body, content_type)
	}

	fn predict(&self, input: Self::Input) -> Result<Self::Output> {
		match input {
			Payload::Bytes(bytes) => self.classify(&bytes),
		}
	}
}

/// Read one label per line, so line `i` names class `i`. A missing file is not an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_labels(path: &Path) -> Result<Option<Vec<String>>> {
	if !path.exists() {
		return Ok(None);
	}

	let mut labels: Vec<String> = fs::read_to_string(path)
		.with_context(|| format!("Failed to read labels from {}", path.display()))?
		.lines()
		.map(|line| line.trim().to_string())
		.collect();

	while labels.last().is_some_and(String::is_empty) {
		labels.pop();
	}

	Ok(Some(labels))
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
	let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let exps: Vec<f32> = logits.iter().map(|logit| (logit - max).exp()).collect();
	let sum: f32 = exps.iter().sum();

	exps.into_iter().map(|e| e / sum).collect()
}

/// The `k` highest probabilities with their class index, highest first. Equal probabilities keep index order.
pub fn top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
	let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
	ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
	ranked.truncate(k);

	ranked
}
