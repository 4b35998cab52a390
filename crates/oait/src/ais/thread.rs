use crate::ais::msg::{user_msg, Msg};
use crate::ais::{raw, remote_error, AisClient, AisEvent, SessionToken, ThreadId};
use crate::{Error, Result};
use async_openai::types::CreateThreadRequest;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

// region:    --- Constants

/// Upper bound of messages fetched per thread (the api maximum page size).
pub const MESSAGES_LIMIT: u32 = 100;

// endregion: --- Constants

// region:    --- Types

/// A thread with its messages as returned by the api (newest first).
#[derive(Debug, Clone)]
pub struct Thread {
	pub thread_id: ThreadId,
	pub messages: Vec<Msg>,
}

#[derive(Debug, Deserialize)]
struct SessionThreads {
	data: Vec<SessionThread>,
}

#[derive(Debug, Deserialize)]
struct SessionThread {
	id: String,
}

// endregion: --- Types

// region:    --- Thread CRUD

pub async fn create_thread(ais: &AisClient, initial_msgs: &[String]) -> Result<ThreadId> {
	let oac = ais.oa_client();

	let messages = if initial_msgs.is_empty() {
		None
	} else {
		Some(initial_msgs.iter().map(|m| user_msg(m.as_str())).collect())
	};

	let res = oac
		.threads()
		.create(CreateThreadRequest {
			messages,
			..Default::default()
		})
		.await
		.map_err(remote_error)?;

	let thread_id: ThreadId = res.id.into();
	ais.event_bus()
		.send(AisEvent::ThreadCreated(thread_id.clone()))?;

	Ok(thread_id)
}

/// Attaches a user message to the thread, returns the message id.
pub async fn add_message(
	ais: &AisClient,
	thread_id: &ThreadId,
	content: &str,
) -> Result<String> {
	let oac = ais.oa_client();

	let msg_obj = oac
		.threads()
		.messages(thread_id)
		.create(user_msg(content))
		.await
		.map_err(remote_error)?;

	ais.event_bus().send(AisEvent::MsgAdded {
		thread_id: thread_id.clone(),
		msg_id: msg_obj.id.clone(),
	})?;

	Ok(msg_obj.id)
}

/// Returns up to `limit` messages, newest first.
pub async fn get_messages(
	ais: &AisClient,
	thread_id: &ThreadId,
	limit: u32,
) -> Result<Vec<Msg>> {
	let oac = ais.oa_client();

	let query = [("limit", limit.to_string())];
	let messages = oac
		.threads()
		.messages(thread_id)
		.list(&query)
		.await
		.map_err(remote_error)?;

	debug!(thread_id = %thread_id, count = messages.data.len(), "thread messages");

	Ok(messages.data.into_iter().map(Msg::from).collect())
}

pub async fn delete_thread(ais: &AisClient, thread_id: &ThreadId) -> Result<()> {
	let oac = ais.oa_client();

	let res = oac
		.threads()
		.delete(thread_id)
		.await
		.map_err(remote_error)?;

	if !res.deleted {
		return Err(Error::Remote {
			message: format!("Thread '{thread_id}' was not deleted"),
		});
	}

	Ok(())
}

// endregion: --- Thread CRUD

// region:    --- Session

/// Lists the thread ids visible to a browser session, in response order.
pub async fn list_session_threads(
	ais: &AisClient,
	session: &SessionToken,
	limit: u32,
) -> Result<Vec<ThreadId>> {
	let req = raw::request_with_bearer(ais, Method::GET, "threads", session, true)
		.query(&[("limit", limit)]);

	let threads: SessionThreads = raw::send_json(req).await?;

	let thread_ids: Vec<ThreadId> = threads
		.data
		.into_iter()
		.map(|thread| ThreadId::from(thread.id))
		.collect();

	debug!(count = thread_ids.len(), "session threads");

	Ok(thread_ids)
}

// endregion: --- Session

// region:    --- Tests


// endregion: --- Tests
