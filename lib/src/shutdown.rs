use std::{future::Future, sync::Arc};
use tokio::{signal, sync::watch};

/// Graceful shutdown trigger, fired by SIGINT/SIGTERM or by `start`.
#[derive(Debug, Clone)]
pub struct Shutdown {
	sender: Arc<watch::Sender<bool>>,
	receiver: watch::Receiver<bool>,
}

impl Shutdown {
	#[must_use]
	pub fn new() -> Self {
		let (tx, rx) = watch::channel(false);
		let shutdown = Self {
			sender: Arc::new(tx),
			receiver: rx,
		};

		let on_signal = shutdown.clone();
		tokio::spawn(async move {
			register_handlers().await;
			on_signal.start();
		});

		shutdown
	}

	pub fn start(&self) {
		tracing::info!("Shutdown requested");
		self.sender.send_replace(true);
	}

	pub fn handle(&self) -> impl Future<Output = ()> + Send + 'static {
		let mut rx = self.receiver.clone();

		async move {
			while !*rx.borrow() {
				// Every sender is gone, which can only happen once we're shutting down anyway.
				if rx.changed().await.is_err() {
					break;
				}
			}
		}
	}
}

impl Default for Shutdown {
	fn default() -> Self {
		Self::new()
	}
}

async fn register_handlers() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!("Failed to install Ctrl+C handler: {e}");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::error!("Failed to install SIGTERM handler: {e}");
				std::future::pending::<()>().await;
			},
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("Received shutdown signal");
}
