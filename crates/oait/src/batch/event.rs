//! Batch Event

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
	Filter,
	Fetch,
	Delete,
}

/// Kind of remote object a batch works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
	Thread,
	Asst,
	File,
}

impl ItemKind {
	pub fn label(&self) -> &'static str {
		match self {
			ItemKind::Thread => "Thread",
			ItemKind::Asst => "Assistant",
			ItemKind::File => "File",
		}
	}
}

#[derive(Debug, Clone)]
pub enum BatchEvent {
	Started {
		stage: BatchStage,
		total: usize,
	},
	/// Emitted once after each item, success or not.
	Progress {
		stage: BatchStage,
		kind: ItemKind,
		done: usize,
		total: usize,
	},
	ItemFailed {
		stage: BatchStage,
		kind: ItemKind,
		id: String,
		cause: String,
	},
	Finished {
		stage: BatchStage,
	},
}
