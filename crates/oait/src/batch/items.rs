//! Batch retrieval and deletion of the listed api objects (assistants, files).
//!
//! Same rules as the thread batches: sequential, one progress event per item,
//! a failing item is reported and skipped.

use super::source::raw_ids_from_file;
use super::{BatchEvent, BatchStage, CreatedFilter, DeleteReport, ItemKind, NameFilter};
use crate::event::EventBus;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

// region:    --- Types

/// An api object with an id, an optional name and a creation time.
pub trait Listed {
	const KIND: ItemKind;

	fn id(&self) -> &str;

	fn name(&self) -> Option<&str>;

	/// Unix seconds.
	fn created_at(&self) -> i64;
}

#[allow(async_fn_in_trait)]
pub trait ItemOps<T: Listed> {
	async fn list_items(&self) -> Result<Vec<T>>;

	async fn get_item(&self, id: &str) -> Result<T>;

	async fn delete_item(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
	Ids(Vec<String>),
	/// `.txt` (one id per line) or `.json` (ids or objects with an `id`).
	File(PathBuf),
	All,
}

impl ItemSource {
	/// Exactly one source must be given.
	pub fn from_inputs(ids: Vec<String>, file: Option<PathBuf>, all: bool) -> Result<ItemSource> {
		let mut given = Vec::new();
		if !ids.is_empty() {
			given.push("ids");
		}
		if file.is_some() {
			given.push("file");
		}
		if all {
			given.push("all");
		}
		if given.len() > 1 {
			return Err(Error::ConflictingIdSources(given));
		}

		if all {
			Ok(ItemSource::All)
		} else if let Some(file) = file {
			Ok(ItemSource::File(file))
		} else if !ids.is_empty() {
			Ok(ItemSource::Ids(ids))
		} else {
			Err(Error::NoIdSource)
		}
	}

	/// The ids to retrieve one by one, `None` for the full listing.
	fn into_ids(self) -> Result<Option<Vec<String>>> {
		match self {
			ItemSource::Ids(ids) => Ok(Some(ids)),
			ItemSource::File(file) => Ok(Some(raw_ids_from_file(&file)?)),
			ItemSource::All => Ok(None),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
	pub created: Vec<CreatedFilter>,
	pub name: NameFilter,
}

impl ItemFilter {
	pub fn is_empty(&self) -> bool {
		self.created.is_empty() && self.name.is_empty()
	}

	pub fn accepts(&self, item: &impl Listed) -> bool {
		self.created.iter().all(|f| f.accepts(item.created_at())) && self.name.accepts(item.name())
	}
}

// endregion: --- Types

// region:    --- Fetch

/// Lists all the objects (`ItemSource::All`) or retrieves each given id,
/// then keeps the objects passing `filter`, in source order.
pub async fn fetch_items<T: Listed, O: ItemOps<T>>(
	ops: &O,
	source: ItemSource,
	filter: &ItemFilter,
	event_bus: &EventBus,
) -> Result<Vec<T>> {
	let items = match source.into_ids()? {
		Some(ids) => retrieve_each(ops, ids, event_bus).await?,
		None => list_all(ops).await?,
	};

	let total = items.len();
	let items: Vec<T> = items.into_iter().filter(|item| filter.accepts(item)).collect();
	debug!(kind = T::KIND.label(), total, kept = items.len(), "items filtered");

	Ok(items)
}

async fn list_all<T: Listed, O: ItemOps<T>>(ops: &O) -> Result<Vec<T>> {
	let items = ops.list_items().await?;
	info!(kind = T::KIND.label(), count = items.len(), "items listed");
	Ok(items)
}

async fn retrieve_each<T: Listed, O: ItemOps<T>>(
	ops: &O,
	ids: Vec<String>,
	event_bus: &EventBus,
) -> Result<Vec<T>> {
	let stage = BatchStage::Fetch;
	let total = ids.len();
	event_bus.send(BatchEvent::Started { stage, total })?;

	let mut items = Vec::new();
	for (idx, id) in ids.into_iter().enumerate() {
		match ops.get_item(&id).await {
			Ok(item) => items.push(item),
			Err(err) => {
				warn!(kind = T::KIND.label(), %id, %err, "cannot retrieve, skipped");
				event_bus.send(BatchEvent::ItemFailed {
					stage,
					kind: T::KIND,
					id,
					cause: err.to_string(),
				})?;
			}
		}
		event_bus.send(BatchEvent::Progress {
			stage,
			kind: T::KIND,
			done: idx + 1,
			total,
		})?;
	}

	event_bus.send(BatchEvent::Finished { stage })?;

	Ok(items)
}

// endregion: --- Fetch

// region:    --- Delete

/// Deletes the objects of the source passing `filter`.
/// Given ids are deleted without a retrieve when `filter` is empty.
/// `confirm` receives the number of objects about to be deleted, a `false` aborts
/// before any delete call.
pub async fn delete_items<T: Listed, O: ItemOps<T>>(
	ops: &O,
	source: ItemSource,
	filter: &ItemFilter,
	confirm: impl FnOnce(usize) -> bool,
	event_bus: &EventBus,
) -> Result<DeleteReport> {
	let (requested, ids) = match source.into_ids()? {
		Some(ids) if filter.is_empty() => (ids.len(), ids),
		Some(ids) => {
			let requested = ids.len();
			let items = retrieve_each(ops, ids, event_bus).await?;
			(requested, kept_ids(items, filter))
		}
		None => {
			let items = list_all(ops).await?;
			(items.len(), kept_ids(items, filter))
		}
	};

	let mut report = DeleteReport {
		requested,
		targeted: ids.len(),
		..Default::default()
	};

	if ids.is_empty() {
		info!(kind = T::KIND.label(), "Nothing to delete");
		return Ok(report);
	}

	if !confirm(ids.len()) {
		info!(kind = T::KIND.label(), count = ids.len(), "deletion not confirmed");
		report.aborted = true;
		return Ok(report);
	}

	let stage = BatchStage::Delete;
	let total = ids.len();
	event_bus.send(BatchEvent::Started { stage, total })?;

	for (idx, id) in ids.into_iter().enumerate() {
		match ops.delete_item(&id).await {
			Ok(()) => report.deleted += 1,
			Err(err) => {
				warn!(kind = T::KIND.label(), %id, %err, "cannot delete, skipped");
				report.failed += 1;
				event_bus.send(BatchEvent::ItemFailed {
					stage,
					kind: T::KIND,
					id,
					cause: err.to_string(),
				})?;
			}
		}
		event_bus.send(BatchEvent::Progress {
			stage,
			kind: T::KIND,
			done: idx + 1,
			total,
		})?;
	}

	event_bus.send(BatchEvent::Finished { stage })?;
	info!(
		kind = T::KIND.label(),
		deleted = report.deleted,
		failed = report.failed,
		"items deleted"
	);

	Ok(report)
}

fn kept_ids<T: Listed>(items: Vec<T>, filter: &ItemFilter) -> Vec<String> {
	items
		.into_iter()
		.filter(|item| filter.accepts(item))
		.map(|item| item.id().to_string())
		.collect()
}

// endregion: --- Delete

// region:    --- Tests


// endregion: --- Tests
