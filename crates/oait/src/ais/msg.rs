use crate::ais::FileId;
use crate::{Error, Result};
use async_openai::types::{
	CreateMessageRequest, MessageContent, MessageObject, MessageRole,
};
use serde::{Deserialize, Serialize};

// region:    --- Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
	System,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Assistant => "assistant",
			Role::System => "system",
		}
	}
}

impl From<MessageRole> for Role {
	fn from(role: MessageRole) -> Self {
		match role {
			MessageRole::User => Role::User,
			MessageRole::Assistant => Role::Assistant,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
	Text(String),
	ImageFile(FileId),
}

impl Content {
	/// One display line per content part.
	pub fn to_line(&self) -> String {
		match self {
			Content::Text(text) => text.clone(),
			Content::ImageFile(file_id) => format!("(Image file) file_id: {file_id}"),
		}
	}
}

#[derive(Debug, Clone)]
pub struct Msg {
	pub role: Role,
	pub content: Vec<Content>,
	/// Unix seconds, 0 when unknown.
	pub created_at: i64,
}

impl Msg {
	pub fn new(role: Role, content: Vec<Content>) -> Self {
		Self {
			role,
			content,
			created_at: 0,
		}
	}

	pub fn with_created_at(mut self, created_at: i64) -> Self {
		self.created_at = created_at;
		self
	}
}

impl From<MessageObject> for Msg {
	fn from(msg: MessageObject) -> Self {
		let content = msg
			.content
			.into_iter()
			.map(|content| match content {
				MessageContent::Text(text) => Content::Text(text.text.value),
				MessageContent::ImageFile(image) => {
					Content::ImageFile(image.image_file.file_id.into())
				}
			})
			.collect();

		Msg {
			role: msg.role.into(),
			content,
			created_at: i64::from(msg.created_at),
		}
	}
}

// endregion: --- Types

// region:    --- Message Constructors

pub fn user_msg(content: impl Into<String>) -> CreateMessageRequest {
	CreateMessageRequest {
		role: "user".to_string(),
		content: content.into(),
		..Default::default()
	}
}

// endregion: --- Message Constructors

// region:    --- Content Extractor

pub fn get_text_content(msg: &Msg) -> Result<String> {
	// -- Get the first text content item
	msg.content
		.iter()
		.find_map(|content| match content {
			Content::Text(text) => Some(text.clone()),
			Content::ImageFile(_) => None,
		})
		.ok_or(Error::NoTextInMessage)
}

// endregion: --- Content Extractor

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;

	#[test]
	fn test_content_to_line() -> Result<()> {
		// -- Setup & Fixtures
		let text = Content::Text("hello".to_string());
		let image = Content::ImageFile("file-abc".into());

		// -- Check
		assert_eq!(text.to_line(), "hello");
		assert_eq!(image.to_line(), "(Image file) file_id: file-abc");

		Ok(())
	}

	#[test]
	fn test_get_text_content_skips_images() -> Result<()> {
		// -- Setup & Fixtures
		let msg = Msg::new(
			Role::Assistant,
			vec![
				Content::ImageFile("file-1".into()),
				Content::Text("caption".to_string()),
			],
		);

		// -- Exec
		let text = get_text_content(&msg)?;

		// -- Check
		assert_eq!(text, "caption");

		Ok(())
	}

	#[test]
	fn test_get_text_content_none() -> Result<()> {
		let msg = Msg::new(Role::User, vec![Content::ImageFile("file-1".into())]);

		assert!(matches!(
			get_text_content(&msg),
			Err(crate::Error::NoTextInMessage)
		));

		Ok(())
	}
}

// endregion: --- Tests
