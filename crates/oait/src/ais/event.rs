//! Ais Event

use crate::ais::{AsstRef, RunId, ThreadId};

#[derive(Debug, Clone)]
pub enum AisEvent {
	// -- Asst Events
	AsstCreated(AsstRef),
	AsstModified(AsstRef),

	// -- Thread Events
	ThreadCreated(ThreadId),
	MsgAdded {
		thread_id: ThreadId,
		msg_id: String,
	},

	// -- Run Events
	RunStarted {
		thread_id: ThreadId,
		run_id: RunId,
	},
}
