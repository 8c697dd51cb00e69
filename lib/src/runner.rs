use atomic_enum::atomic_enum;
use axum::Extension;
use chrono::{DateTime, Utc};
use mobilenet_core::InferenceHandler;
use std::{
	sync::{atomic::Ordering, Arc},
	time::Duration,
};
use tokio::sync::{mpsc, oneshot};

use crate::{helpers::with_timing, shutdown::Shutdown};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to load model: {0}")]
	Setup(anyhow::Error),

	#[error("Inference worker is not running")]
	WorkerGone,

	#[error("Failed to run prediction: {0}")]
	Prediction(#[from] anyhow::Error),
}

#[atomic_enum]
#[derive(serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
	Unknown,
	Starting,
	Ready,
	Busy,
	SetupFailed,
}

#[derive(Debug, Clone, Copy)]
pub struct SetupTimes {
	pub started_at: DateTime<Utc>,
	pub completed_at: DateTime<Utc>,
}

type Reply<H> = oneshot::Sender<Result<(<H as InferenceHandler>::Output, Duration), Error>>;
type Job<H> = (Reply<H>, <H as InferenceHandler>::Input);

/// Owns the loaded model on a dedicated blocking thread and hands it one payload at a time.
pub struct Runner<H: InferenceHandler> {
	health: Arc<AtomicHealth>,
	setup: SetupTimes,
	sender: mpsc::Sender<Job<H>>,
}

impl<H: InferenceHandler> Clone for Runner<H> {
	fn clone(&self) -> Self {
		Self {
			setup: self.setup,
			health: self.health.clone(),
			sender: self.sender.clone(),
		}
	}
}

impl<H: InferenceHandler + 'static> Runner<H> {
	/// Load the model and start the inference worker. Resolves once the model is ready to serve.
	///
	/// # Errors
	///
	/// Returns an error if the model fails to load.
	pub async fn setup(shutdown: Shutdown) -> Result<Self, Error> {
		let health = Arc::new(AtomicHealth::new(Health::Starting));
		let started_at = Utc::now();

		let (sender, mut rx) = mpsc::channel::<Job<H>>(1);
		let (ready_tx, ready_rx) = oneshot::channel::<anyhow::Result<()>>();

		let worker_health = health.clone();
		let worker = tokio::task::spawn_blocking(move || {
			let handler = match H::load() {
				Ok(handler) => handler,
				Err(error) => {
					worker_health.store(Health::SetupFailed, Ordering::SeqCst);
					ready_tx.send(Err(error)).ok();
					return;
				},
			};

			worker_health.store(Health::Ready, Ordering::SeqCst);
			ready_tx.send(Ok(())).ok();

			while let Some((tx, input)) = rx.blocking_recv() {
				worker_health.store(Health::Busy, Ordering::SeqCst);

				let (result, predict_time) = with_timing(|| handler.predict(input));
				if tx
					.send(result.map(|output| (output, predict_time)).map_err(Error::Prediction))
					.is_err()
				{
					tracing::debug!("Prediction caller went away before the result was ready");
				}

				worker_health.store(Health::Ready, Ordering::SeqCst);
			}

			tracing::debug!("Runner channel closed, stopping inference worker");
		});

		let monitor_health = health.clone();
		tokio::spawn(async move {
			if let Err(e) = worker.await {
				tracing::error!("Inference worker crashed: {e}");
				monitor_health.store(Health::Unknown, Ordering::SeqCst);
				shutdown.start();
			}
		});

		match ready_rx.await {
			Ok(Ok(())) => {},
			Ok(Err(error)) => return Err(Error::Setup(error)),
			Err(_) => return Err(Error::WorkerGone),
		}

		let setup = SetupTimes {
			started_at,
			completed_at: Utc::now(),
		};
		tracing::info!(
			"Model loaded in {}ms",
			(setup.completed_at - setup.started_at).num_milliseconds()
		);

		Ok(Self {
			health,
			setup,
			sender,
		})
	}

	/// Run a prediction on the loaded model.
	///
	/// # Errors
	///
	/// Returns an error if the worker is gone or the prediction fails.
	pub async fn run(&self, input: H::Input) -> Result<(H::Output, Duration), Error> {
		let (tx, rx) = oneshot::channel();

		self.sender
			.send((tx, input))
			.await
			.map_err(|_| Error::WorkerGone)?;

		rx.await.map_err(|_| Error::WorkerGone)?
	}

	pub fn health(&self) -> Health {
		self.health.load(Ordering::SeqCst)
	}

	pub const fn setup_times(&self) -> SetupTimes {
		self.setup
	}

	pub fn extension(self) -> Extension<Self> {
		Extension(self)
	}
}
