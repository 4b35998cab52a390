//! Resolves where the thread ids of a batch come from: an explicit list,
//! an input file (`.json` or `.txt`), or a session listing.

use crate::ais::{SessionToken, ThreadId};
use crate::utils::files::{read_lines, XFile};
use crate::{Error, Result};
use serde::Deserialize;
use simple_fs::load_json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// region:    --- Types

#[allow(async_fn_in_trait)]
pub trait SessionLister {
	async fn session_thread_ids(
		&self,
		session: &SessionToken,
		limit: u32,
	) -> Result<Vec<ThreadId>>;
}

#[derive(Debug, Clone)]
pub enum IdSource {
	List(Vec<ThreadId>),
	File(PathBuf),
	Session { token: SessionToken, limit: u32 },
}

/// A `.json` input entry: a bare id, or a record carrying `thread_id`
/// (the shape written by the thread output) or `id` (api objects).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonIdEntry {
	Id(String),
	Record {
		#[serde(alias = "thread_id")]
		id: String,
	},
}

// endregion: --- Types

impl IdSource {
	/// An explicit id list, as opposed to a file or a session listing.
	pub fn is_explicit(&self) -> bool {
		matches!(self, IdSource::List(_))
	}

	/// Exactly one source must be given. `session_limit` falls back to `default_limit`.
	pub fn from_inputs(
		ids: Vec<String>,
		file: Option<PathBuf>,
		session: Option<String>,
		session_limit: Option<u32>,
		default_limit: u32,
	) -> Result<IdSource> {
		let mut given = Vec::new();
		if !ids.is_empty() {
			given.push("ids");
		}
		if file.is_some() {
			given.push("file");
		}
		if session.is_some() {
			given.push("session");
		}
		if given.len() > 1 {
			return Err(Error::ConflictingIdSources(given));
		}

		if let Some(file) = file {
			Ok(IdSource::File(file))
		} else if let Some(token) = session {
			Ok(IdSource::Session {
				token: token.into(),
				limit: session_limit.unwrap_or(default_limit),
			})
		} else if !ids.is_empty() {
			Ok(IdSource::List(ids.into_iter().map(ThreadId::from).collect()))
		} else {
			Err(Error::NoIdSource)
		}
	}

	pub async fn resolve(self, lister: &impl SessionLister) -> Result<Vec<ThreadId>> {
		match self {
			IdSource::List(ids) => Ok(ids),
			IdSource::File(file) => ids_from_file(&file),
			IdSource::Session { token, limit } => {
				info!("Getting threads from session");
				let ids = lister.session_thread_ids(&token, limit).await?;
				if ids.is_empty() {
					return Err(Error::NoThreadsForSession);
				}
				Ok(ids)
			}
		}
	}
}

pub fn ids_from_file(file: &Path) -> Result<Vec<ThreadId>> {
	Ok(raw_ids_from_file(file)?
		.into_iter()
		.map(ThreadId::from)
		.collect())
}

pub(crate) fn raw_ids_from_file(file: &Path) -> Result<Vec<String>> {
	if !file.is_file() {
		return Err(Error::InputFileNotFound(file.display().to_string()));
	}

	let ids: Vec<String> = match file.x_extension() {
		"json" => {
			let entries: Vec<JsonIdEntry> = load_json(file)?;
			entries
				.into_iter()
				.map(|entry| match entry {
					JsonIdEntry::Id(id) | JsonIdEntry::Record { id } => id,
				})
				.collect()
		}
		"txt" => read_lines(file)?,
		ext => {
			return Err(Error::InputFileNotSupported {
				file: file.display().to_string(),
				ext: ext.to_string(),
			})
		}
	};

	debug!(file = %file.display(), count = ids.len(), "ids from file");

	Ok(ids)
}

// region:    --- Tests


// endregion: --- Tests
