//! The `batch` module runs thread operations over a resolved list of thread ids,
//! and (in `items`) the same retrieve / delete pipeline over assistants and files.
//!
//! Items are processed strictly in sequence, a `BatchEvent::Progress` is sent after each one,
//! and a failing item is reported and skipped without aborting the batch.

// region:    --- Modules

mod event;
mod items;
pub mod source;

pub use event::{BatchEvent, BatchStage, ItemKind};
pub use items::{delete_items, fetch_items, ItemFilter, ItemOps, ItemSource, Listed};
pub use source::{IdSource, SessionLister};

use crate::ais::asst::{self, AsstObj};
use crate::ais::file::{self, FileObj};
use crate::ais::msg::Msg;
use crate::ais::thread::{self, Thread, MESSAGES_LIMIT};
use crate::ais::{AisClient, AsstId, FileId, SessionToken, ThreadId};
use crate::event::EventBus;
use crate::{Error, Result};
use tracing::{debug, info, warn};

// endregion: --- Modules

// region:    --- Constants

/// Max message count of the threads deleted from a file or a session when none is given.
pub const DEL_DEFAULT_MAX_LEN: usize = 1;

const DAY_SECS: f64 = 86_400.;

// endregion: --- Constants

// region:    --- Types

#[allow(async_fn_in_trait)]
pub trait ThreadOps {
	/// Up to `limit` messages, newest first.
	async fn thread_messages(&self, thread_id: &ThreadId, limit: u32) -> Result<Vec<Msg>>;

	async fn delete_thread(&self, thread_id: &ThreadId) -> Result<()>;
}

/// Message count threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenFilter {
	/// Keep threads with at least this many messages.
	Min(usize),
	/// Keep threads with at most this many messages.
	Max(usize),
}

impl LenFilter {
	pub fn accepts(&self, count: usize) -> bool {
		match self {
			LenFilter::Min(min) => count >= *min,
			LenFilter::Max(max) => count <= *max,
		}
	}
}

/// Creation time threshold, as a unix time cutoff computed from a number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedFilter {
	/// Keep objects created at or after the cutoff.
	Since(i64),
	/// Keep objects created strictly before the cutoff.
	Before(i64),
}

impl CreatedFilter {
	/// Created within the last `days` days.
	pub fn within_days(days: f64, now: i64) -> Result<Self> {
		Ok(CreatedFilter::Since(days_cutoff(days, now)?))
	}

	/// Created more than `days` days ago.
	pub fn older_than_days(days: f64, now: i64) -> Result<Self> {
		Ok(CreatedFilter::Before(days_cutoff(days, now)?))
	}

	/// Both bounds may be given, the object must then pass both.
	pub fn from_days(
		within: Option<f64>,
		older_than: Option<f64>,
		now: i64,
	) -> Result<Vec<CreatedFilter>> {
		let mut filters = Vec::new();
		if let Some(days) = within {
			filters.push(Self::within_days(days, now)?);
		}
		if let Some(days) = older_than {
			filters.push(Self::older_than_days(days, now)?);
		}
		Ok(filters)
	}

	pub fn accepts(&self, created_at: i64) -> bool {
		match self {
			CreatedFilter::Since(cutoff) => created_at >= *cutoff,
			CreatedFilter::Before(cutoff) => created_at < *cutoff,
		}
	}
}

fn days_cutoff(days: f64, now: i64) -> Result<i64> {
	if days.is_nan() || days < 0. {
		return Err(Error::InvalidDays(days));
	}
	Ok(now - (days * DAY_SECS) as i64)
}

/// Name substrings: all of `contains` and none of `not_contains` must be in the name.
/// A missing name is matched as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
	pub contains: Vec<String>,
	pub not_contains: Vec<String>,
}

impl NameFilter {
	pub fn is_empty(&self) -> bool {
		self.contains.is_empty() && self.not_contains.is_empty()
	}

	pub fn accepts(&self, name: Option<&str>) -> bool {
		let name = name.unwrap_or_default();
		self.contains.iter().all(|part| name.contains(part.as_str()))
			&& !self.not_contains.iter().any(|part| name.contains(part.as_str()))
	}
}

/// Filter applied on the fetched messages of a thread.
/// The creation time of a thread is the one of its newest message, so an empty
/// thread never passes a creation time filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadFilter {
	pub len: Option<LenFilter>,
	pub created: Vec<CreatedFilter>,
}

impl ThreadFilter {
	pub fn is_empty(&self) -> bool {
		self.len.is_none() && self.created.is_empty()
	}

	/// `messages` newest first.
	pub fn accepts(&self, messages: &[Msg]) -> bool {
		if let Some(len) = self.len {
			if !len.accepts(messages.len()) {
				return false;
			}
		}
		if self.created.is_empty() {
			return true;
		}
		match messages.first() {
			Some(newest) => self.created.iter().all(|f| f.accepts(newest.created_at)),
			None => false,
		}
	}
}

/// Length filter of a thread deletion.
/// A given `max_len` always applies. Without one, threads from a file or a session
/// get `DEL_DEFAULT_MAX_LEN`, explicit ids are not filtered.
pub fn delete_len_filter(source: &IdSource, max_len: Option<usize>) -> Option<LenFilter> {
	match (max_len, source.is_explicit()) {
		(Some(max_len), _) => Some(LenFilter::Max(max_len)),
		(None, true) => None,
		(None, false) => Some(LenFilter::Max(DEL_DEFAULT_MAX_LEN)),
	}
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
	/// Ids given to the batch.
	pub requested: usize,
	/// Ids left after filtering.
	pub targeted: usize,
	pub deleted: usize,
	pub failed: usize,
	/// Confirmation declined, nothing was deleted.
	pub aborted: bool,
}

// endregion: --- Types

// region:    --- Filter

/// Keeps the ids whose messages pass the filter.
/// An id whose messages cannot be fetched is left out.
pub async fn filter_threads(
	ops: &impl ThreadOps,
	thread_ids: Vec<ThreadId>,
	filter: &ThreadFilter,
	event_bus: &EventBus,
) -> Result<Vec<ThreadId>> {
	let stage = BatchStage::Filter;
	let total = thread_ids.len();
	event_bus.send(BatchEvent::Started { stage, total })?;

	let mut kept = Vec::new();
	for (idx, thread_id) in thread_ids.into_iter().enumerate() {
		match ops.thread_messages(&thread_id, MESSAGES_LIMIT).await {
			Ok(msgs) if filter.accepts(&msgs) => kept.push(thread_id),
			Ok(msgs) => {
				debug!(thread_id = %thread_id, count = msgs.len(), ?filter, "filtered out")
			}
			Err(err) => debug!(thread_id = %thread_id, %err, "filter fetch failed, excluded"),
		}
		event_bus.send(BatchEvent::Progress {
			stage,
			kind: ItemKind::Thread,
			done: idx + 1,
			total,
		})?;
	}

	event_bus.send(BatchEvent::Finished { stage })?;
	info!(total, kept = kept.len(), "threads filtered");

	Ok(kept)
}

// endregion: --- Filter

// region:    --- Fetch

/// Fetches the messages of each thread and keeps the threads passing `filter`
/// (same request, no extra fetch).
pub async fn fetch_threads(
	ops: &impl ThreadOps,
	thread_ids: Vec<ThreadId>,
	filter: &ThreadFilter,
	event_bus: &EventBus,
) -> Result<Vec<Thread>> {
	let stage = BatchStage::Fetch;
	let total = thread_ids.len();
	event_bus.send(BatchEvent::Started { stage, total })?;

	let mut threads = Vec::new();
	for (idx, thread_id) in thread_ids.into_iter().enumerate() {
		match ops.thread_messages(&thread_id, MESSAGES_LIMIT).await {
			Ok(messages) => {
				if filter.accepts(&messages) {
					threads.push(Thread {
						thread_id,
						messages,
					});
				}
			}
			Err(err) => {
				warn!(thread_id = %thread_id, %err, "cannot fetch thread, skipped");
				event_bus.send(BatchEvent::ItemFailed {
					stage,
					kind: ItemKind::Thread,
					id: thread_id.to_string(),
					cause: err.to_string(),
				})?;
			}
		}
		event_bus.send(BatchEvent::Progress {
			stage,
			kind: ItemKind::Thread,
			done: idx + 1,
			total,
		})?;
	}

	event_bus.send(BatchEvent::Finished { stage })?;
	info!(total, fetched = threads.len(), "threads fetched");

	Ok(threads)
}

// endregion: --- Fetch

// region:    --- Delete

/// Deletes the threads, filtered first unless `filter` is empty.
/// `confirm` receives the number of threads about to be deleted, a `false` aborts
/// before any delete call.
pub async fn delete_threads(
	ops: &impl ThreadOps,
	thread_ids: Vec<ThreadId>,
	filter: &ThreadFilter,
	confirm: impl FnOnce(usize) -> bool,
	event_bus: &EventBus,
) -> Result<DeleteReport> {
	let mut report = DeleteReport {
		requested: thread_ids.len(),
		..Default::default()
	};

	let thread_ids = if filter.is_empty() {
		thread_ids
	} else {
		filter_threads(ops, thread_ids, filter, event_bus).await?
	};
	report.targeted = thread_ids.len();

	if thread_ids.is_empty() {
		info!("No threads to delete");
		return Ok(report);
	}

	if !confirm(thread_ids.len()) {
		info!(count = thread_ids.len(), "thread deletion not confirmed");
		report.aborted = true;
		return Ok(report);
	}

	let stage = BatchStage::Delete;
	let total = thread_ids.len();
	event_bus.send(BatchEvent::Started { stage, total })?;

	for (idx, thread_id) in thread_ids.into_iter().enumerate() {
		match ops.delete_thread(&thread_id).await {
			Ok(()) => report.deleted += 1,
			Err(err) => {
				warn!(thread_id = %thread_id, %err, "cannot delete thread, skipped");
				report.failed += 1;
				event_bus.send(BatchEvent::ItemFailed {
					stage,
					kind: ItemKind::Thread,
					id: thread_id.to_string(),
					cause: err.to_string(),
				})?;
			}
		}
		event_bus.send(BatchEvent::Progress {
			stage,
			kind: ItemKind::Thread,
			done: idx + 1,
			total,
		})?;
	}

	event_bus.send(BatchEvent::Finished { stage })?;
	info!(deleted = report.deleted, failed = report.failed, "threads deleted");

	Ok(report)
}

// endregion: --- Delete

// region:    --- AisClient Ops

impl ThreadOps for AisClient {
	async fn thread_messages(&self, thread_id: &ThreadId, limit: u32) -> Result<Vec<Msg>> {
		thread::get_messages(self, thread_id, limit).await
	}

	async fn delete_thread(&self, thread_id: &ThreadId) -> Result<()> {
		thread::delete_thread(self, thread_id).await
	}
}

impl ItemOps<AsstObj> for AisClient {
	async fn list_items(&self) -> Result<Vec<AsstObj>> {
		asst::list(self).await
	}

	async fn get_item(&self, id: &str) -> Result<AsstObj> {
		asst::get(self, &AsstId::from(id)).await
	}

	async fn delete_item(&self, id: &str) -> Result<()> {
		asst::delete(self, &AsstId::from(id)).await
	}
}

impl ItemOps<FileObj> for AisClient {
	async fn list_items(&self) -> Result<Vec<FileObj>> {
		file::list(self).await
	}

	async fn get_item(&self, id: &str) -> Result<FileObj> {
		file::get(self, &FileId::from(id)).await
	}

	async fn delete_item(&self, id: &str) -> Result<()> {
		file::delete(self, &FileId::from(id)).await
	}
}

impl SessionLister for AisClient {
	async fn session_thread_ids(
		&self,
		session: &SessionToken,
		limit: u32,
	) -> Result<Vec<ThreadId>> {
		thread::list_session_threads(self, session, limit).await
	}
}

// endregion: --- AisClient Ops

// region:    --- Tests


// endregion: --- Tests
