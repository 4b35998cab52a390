pub use crate::ais::AisEvent;
pub use crate::batch::BatchEvent;
pub use crate::poller::RunEvent;

use crate::Result;
use derive_more::From;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Receiver, Sender};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, From)]
pub enum Event {
	Ais(AisEvent),
	Batch(BatchEvent),
	Run(RunEvent),
}

/// EventBus is the reporting handle passed to every component of this crate
/// (api client, batch processor, run poller), so that the CLI (or tests) can
/// subscribe and render progress without the components touching the terminal.
///
/// Notes:
/// - This is a clone-efficient structure, so it's okay to be cloned and owned.
/// - Currently, it uses a Tokio broadcast channel, but this implementation detail is hidden behind the API.
/// - `_rx` is kept in an Arc so sending never fails for lack of a subscriber.
#[derive(Debug, Clone)]
pub struct EventBus {
	tx: Sender<Event>,
	_rx: Arc<Receiver<Event>>,
}

impl EventBus {
	#[allow(clippy::new_without_default)]
	pub fn new() -> EventBus {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	pub fn with_capacity(capacity: usize) -> EventBus {
		let (tx, rx) = broadcast::channel::<Event>(capacity);
		EventBus {
			tx,
			_rx: Arc::new(rx),
		}
	}

	pub(crate) fn send(&self, evt: impl Into<Event>) -> Result<()> {
		let evt = evt.into();
		self.tx.send(evt)?;
		Ok(())
	}

	pub fn subscribe(&self) -> Result<Receiver<Event>> {
		Ok(self.tx.subscribe())
	}
}
