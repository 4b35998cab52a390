//! Waits for an assistant run to reach a terminal state.
//!
//! One status query right away, then per cycle three ticks of `interval / 3`
//! followed by one status query. `completed` ends with success, `failed`,
//! `cancelled`, `expired` and `requires_action` end with the status carried in
//! the outcome. The optional `max_attempts` bounds the number of status queries.

use crate::ais::{RunId, ThreadId};
use crate::event::EventBus;
use crate::Result;
use async_openai::types::RunStatus;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

// region:    --- Constants

const TICKS_PER_CYCLE: u8 = 3;
const DEFAULT_INTERVAL_MS: u64 = 1000;

// endregion: --- Constants

// region:    --- Types

#[allow(async_fn_in_trait)]
pub trait RunStatusSource {
	async fn run_status(&self, thread_id: &ThreadId, run_id: &RunId) -> Result<RunStatus>;
}

#[derive(Debug, Clone)]
pub struct PollConfig {
	pub interval: Duration,
	pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
			max_attempts: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
	Completed { attempts: u32 },
	/// Terminal but not successful (failed, cancelled, expired, requires_action).
	Ended { status: RunStatus, attempts: u32 },
	/// `max_attempts` status queries without a terminal state.
	GaveUp { attempts: u32 },
}

impl RunOutcome {
	pub fn is_completed(&self) -> bool {
		matches!(self, RunOutcome::Completed { .. })
	}
}

#[derive(Debug, Clone)]
pub enum RunEvent {
	/// Terminal feedback tick, `dots` in 1..=3.
	Waiting { run_id: RunId, dots: u8 },
	StatusChecked { run_id: RunId, status: RunStatus },
}

enum RunPhase {
	Running,
	Completed,
	Ended,
}

fn phase_of(status: &RunStatus) -> RunPhase {
	match status {
		RunStatus::Completed => RunPhase::Completed,
		RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling => RunPhase::Running,
		RunStatus::Failed
		| RunStatus::Cancelled
		| RunStatus::Expired
		| RunStatus::RequiresAction => RunPhase::Ended,
	}
}

// endregion: --- Types

pub async fn wait_for_run(
	source: &impl RunStatusSource,
	thread_id: &ThreadId,
	run_id: &RunId,
	config: &PollConfig,
	event_bus: &EventBus,
) -> Result<RunOutcome> {
	info!(run_id = %run_id, "waiting for assistant run");

	let tick = config.interval / TICKS_PER_CYCLE as u32;
	let mut attempts: u32 = 0;

	loop {
		let status = source.run_status(thread_id, run_id).await?;
		attempts += 1;
		debug!(run_id = %run_id, ?status, attempts, "run status");
		event_bus.send(RunEvent::StatusChecked {
			run_id: run_id.clone(),
			status: status.clone(),
		})?;

		match phase_of(&status) {
			RunPhase::Completed => {
				info!(run_id = %run_id, "run complete");
				return Ok(RunOutcome::Completed { attempts });
			}
			RunPhase::Ended => {
				return Ok(RunOutcome::Ended { status, attempts });
			}
			RunPhase::Running => (),
		}

		if config.max_attempts.is_some_and(|max| attempts >= max) {
			return Ok(RunOutcome::GaveUp { attempts });
		}

		for dots in 1..=TICKS_PER_CYCLE {
			event_bus.send(RunEvent::Waiting {
				run_id: run_id.clone(),
				dots,
			})?;
			sleep(tick).await;
		}
	}
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use crate::event::Event;
	use std::collections::VecDeque;
	use std::sync::Mutex;

	/// Replays a status script, repeating the last one when exhausted.
	struct ScriptedRun {
		script: Mutex<VecDeque<RunStatus>>,
		last: RunStatus,
		queries: Mutex<u32>,
	}

	impl ScriptedRun {
		fn new(script: Vec<RunStatus>) -> Self {
			let last = script.last().cloned().unwrap_or(RunStatus::InProgress);
			Self {
				script: Mutex::new(script.into()),
				last,
				queries: Mutex::new(0),
			}
		}

		fn queries(&self) -> u32 {
			*self.queries.lock().unwrap()
		}
	}

	impl RunStatusSource for ScriptedRun {
		async fn run_status(
			&self,
			_thread_id: &ThreadId,
			_run_id: &RunId,
		) -> crate::Result<RunStatus> {
			*self.queries.lock().unwrap() += 1;
			let next = self.script.lock().unwrap().pop_front();
			Ok(next.unwrap_or_else(|| self.last.clone()))
		}
	}

	fn fast_config(max_attempts: Option<u32>) -> PollConfig {
		PollConfig {
			interval: Duration::ZERO,
			max_attempts,
		}
	}

	#[tokio::test]
	async fn test_wait_for_run_completed_after_three_queries() -> Result<()> {
		// -- Setup & Fixtures
		let source = ScriptedRun::new(vec![
			RunStatus::InProgress,
			RunStatus::InProgress,
			RunStatus::Completed,
		]);
		let bus = EventBus::new();
		let mut rx = bus.subscribe()?;

		// -- Exec
		let outcome = wait_for_run(
			&source,
			&"thread_1".into(),
			&"run_1".into(),
			&fast_config(None),
			&bus,
		)
		.await?;

		// -- Check
		assert_eq!(outcome, RunOutcome::Completed { attempts: 3 });
		assert_eq!(source.queries(), 3);

		let mut dots = Vec::new();
		while let Ok(evt) = rx.try_recv() {
			if let Event::Run(RunEvent::Waiting { dots: d, .. }) = evt {
				dots.push(d);
			}
		}
		assert_eq!(dots, vec![1, 2, 3, 1, 2, 3]);

		Ok(())
	}

	#[tokio::test]
	async fn test_wait_for_run_never_completes_gives_up() -> Result<()> {
		// -- Setup & Fixtures
		let source = ScriptedRun::new(vec![RunStatus::Queued, RunStatus::InProgress]);
		let bus = EventBus::new();

		// -- Exec
		let outcome = wait_for_run(
			&source,
			&"thread_1".into(),
			&"run_1".into(),
			&fast_config(Some(5)),
			&bus,
		)
		.await?;

		// -- Check
		assert_eq!(outcome, RunOutcome::GaveUp { attempts: 5 });
		assert_eq!(source.queries(), 5);

		Ok(())
	}

	#[tokio::test]
	async fn test_wait_for_run_failed_is_terminal() -> Result<()> {
		// -- Setup & Fixtures
		let source = ScriptedRun::new(vec![RunStatus::Queued, RunStatus::Failed]);
		let bus = EventBus::new();

		// -- Exec
		let outcome = wait_for_run(
			&source,
			&"thread_1".into(),
			&"run_1".into(),
			&fast_config(Some(100)),
			&bus,
		)
		.await?;

		// -- Check
		assert_eq!(
			outcome,
			RunOutcome::Ended {
				status: RunStatus::Failed,
				attempts: 2
			}
		);
		assert!(!outcome.is_completed());

		Ok(())
	}

	#[tokio::test]
	async fn test_wait_for_run_cancelling_keeps_polling() -> Result<()> {
		// -- Setup & Fixtures
		let source = ScriptedRun::new(vec![
			RunStatus::Cancelling,
			RunStatus::Cancelling,
			RunStatus::Cancelled,
		]);
		let bus = EventBus::new();

		// -- Exec
		let outcome = wait_for_run(
			&source,
			&"thread_1".into(),
			&"run_1".into(),
			&fast_config(None),
			&bus,
		)
		.await?;

		// -- Check
		assert!(matches!(
			outcome,
			RunOutcome::Ended {
				status: RunStatus::Cancelled,
				attempts: 3
			}
		));

		Ok(())
	}
}

// endregion: --- Tests
