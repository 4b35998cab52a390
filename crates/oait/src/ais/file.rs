use crate::ais::raw::{self, DeleteStatus, ListPage};
use crate::ais::{AisClient, FileId};
use crate::batch::{ItemKind, Listed};
use crate::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

// region:    --- Types

/// An uploaded file as returned by the api.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObj {
	pub id: String,
	#[serde(default)]
	pub filename: String,
	#[serde(default)]
	pub bytes: u64,
	#[serde(default)]
	pub purpose: String,
	pub created_at: i64,
	#[serde(flatten)]
	pub other: Map<String, Value>,
}

impl Listed for FileObj {
	const KIND: ItemKind = ItemKind::File;

	fn id(&self) -> &str {
		&self.id
	}
	fn name(&self) -> Option<&str> {
		Some(&self.filename)
	}
	fn created_at(&self) -> i64 {
		self.created_at
	}
}

// endregion: --- Types

// region:    --- File CRUD

pub async fn list(ais: &AisClient) -> Result<Vec<FileObj>> {
	let req = raw::api_request(ais, Method::GET, "files", false);
	let page: ListPage<FileObj> = raw::send_json(req).await?;

	debug!(count = page.data.len(), "files listed");

	Ok(page.data)
}

pub async fn get(ais: &AisClient, file_id: &FileId) -> Result<FileObj> {
	let req = raw::api_request(ais, Method::GET, &format!("files/{file_id}"), false);
	raw::send_json(req).await
}

pub async fn delete(ais: &AisClient, file_id: &FileId) -> Result<()> {
	let req = raw::api_request(ais, Method::DELETE, &format!("files/{file_id}"), false);
	let res: DeleteStatus = raw::send_json(req).await?;

	if !res.deleted {
		return Err(Error::Remote {
			message: format!("File '{file_id}' was not deleted"),
		});
	}

	Ok(())
}

// endregion: --- File CRUD

// region:    --- Tests


// endregion: --- Tests
