use crate::ais::msg::get_text_content;
use crate::ais::thread::get_messages;
use crate::ais::{remote_error, AisClient, AisEvent, AsstId, RunId, ThreadId};
use crate::poller::RunStatusSource;
use crate::{Error, Result};
use async_openai::types::{CreateRunRequest, RunStatus};

// region:    --- Run

/// Starts a run of the assistant on the thread, returns the run id.
pub async fn start_run(
	ais: &AisClient,
	asst_id: &AsstId,
	thread_id: &ThreadId,
) -> Result<RunId> {
	let oac = ais.oa_client();

	let run_request = CreateRunRequest {
		assistant_id: asst_id.to_string(),
		..Default::default()
	};
	let run = oac
		.threads()
		.runs(thread_id)
		.create(run_request)
		.await
		.map_err(remote_error)?;

	let run_id: RunId = run.id.into();
	ais.event_bus().send(AisEvent::RunStarted {
		thread_id: thread_id.clone(),
		run_id: run_id.clone(),
	})?;

	Ok(run_id)
}

pub async fn get_run_status(
	ais: &AisClient,
	thread_id: &ThreadId,
	run_id: &RunId,
) -> Result<RunStatus> {
	let oac = ais.oa_client();

	let run = oac
		.threads()
		.runs(thread_id)
		.retrieve(run_id)
		.await
		.map_err(remote_error)?;

	Ok(run.status)
}

impl RunStatusSource for AisClient {
	async fn run_status(&self, thread_id: &ThreadId, run_id: &RunId) -> Result<RunStatus> {
		get_run_status(self, thread_id, run_id).await
	}
}

// endregion: --- Run

// region:    --- Thread Reply

/// Text of the most recent message of the thread (typically the assistant reply after a run).
pub async fn get_latest_msg_text(ais: &AisClient, thread_id: &ThreadId) -> Result<String> {
	let msg = get_messages(ais, thread_id, 1)
		.await?
		.into_iter()
		.next()
		.ok_or_else(|| Error::NoMessageFoundInThread(thread_id.to_string()))?;

	get_text_content(&msg)
}

// endregion: --- Thread Reply
