use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

// region:    --- Asst

#[derive(Debug, Clone, From, Deref, Display, PartialEq, Eq)]
pub struct AsstId(String);

impl From<&str> for AsstId {
	fn from(val: &str) -> Self {
		Self(val.to_string())
	}
}

#[derive(Debug, Clone)]
pub struct AsstRef {
	pub name: String,
	pub id: AsstId,
}

impl AsstRef {
	pub fn new(name: impl Into<String>, id: AsstId) -> Self {
		Self {
			name: name.into(),
			id,
		}
	}
}

// endregion: --- Asst

// region:    --- Thread

#[derive(
	Debug, Clone, From, Deref, Display, Serialize, Deserialize, PartialEq, Eq, Hash,
)]
pub struct ThreadId(String);

impl From<&str> for ThreadId {
	fn from(val: &str) -> Self {
		Self(val.to_string())
	}
}

/// Bearer token of a browser session (`sess-...`), used only to list the
/// threads visible to that session.
#[derive(Debug, Clone, From, Deref)]
pub struct SessionToken(String);

impl From<&str> for SessionToken {
	fn from(val: &str) -> Self {
		Self(val.to_string())
	}
}

// endregion: --- Thread

// region:    --- Run

#[derive(Debug, Clone, From, Deref, Display, PartialEq, Eq)]
pub struct RunId(String);

impl From<&str> for RunId {
	fn from(val: &str) -> Self {
		Self(val.to_string())
	}
}

// endregion: --- Run

// region:    --- File

#[derive(Debug, Clone, From, Deref, Display, PartialEq, Eq)]
pub struct FileId(String);

impl From<&str> for FileId {
	fn from(val: &str) -> Self {
		Self(val.to_string())
	}
}

// endregion: --- File
