//! Raw http calls for the endpoints not covered by async-openai.

use crate::ais::{AisClient, INVALID_REQUEST_ERROR};
use crate::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const HEADER_BETA: &str = "OpenAI-Beta";
const BETA_ASSISTANTS: &str = "assistants=v1";
const HEADER_ORG: &str = "OpenAI-Organization";

// region:    --- Types

/// Page of a list endpoint. `has_more` and `last_id` are only set by the cursor paginated ones.
#[derive(Debug, Deserialize)]
pub(super) struct ListPage<T> {
	pub data: Vec<T>,
	#[serde(default)]
	pub has_more: bool,
	#[serde(default)]
	pub last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteStatus {
	pub deleted: bool,
}

// endregion: --- Types

// region:    --- Request Builders

/// Request against the api base, authenticated with the client key.
pub(super) fn api_request(
	ais: &AisClient,
	method: Method,
	path: &str,
	beta: bool,
) -> RequestBuilder {
	request_with_bearer(ais, method, path, ais.api_key(), beta)
}

/// Request against the api base with an explicit bearer (e.g., a session token).
pub(super) fn request_with_bearer(
	ais: &AisClient,
	method: Method,
	path: &str,
	bearer: &str,
	beta: bool,
) -> RequestBuilder {
	let url = format!("{}/{}", ais.api_base(), path.trim_start_matches('/'));

	let mut req = ais
		.http()
		.request(method, url)
		.bearer_auth(bearer)
		.header(CONTENT_TYPE, "application/json");

	if beta {
		req = req.header(HEADER_BETA, BETA_ASSISTANTS);
	}
	if let Some(org_id) = ais.org_id() {
		req = req.header(HEADER_ORG, org_id);
	}

	req
}

// endregion: --- Request Builders

// region:    --- Senders

pub(super) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
	let res = check_status(req.send().await?).await?;
	Ok(res.json::<T>().await?)
}

pub(super) async fn send_bytes(req: RequestBuilder) -> Result<Vec<u8>> {
	let res = check_status(req.send().await?).await?;
	Ok(res.bytes().await?.to_vec())
}

async fn check_status(res: Response) -> Result<Response> {
	let status = res.status();
	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await?;
	let message = if body.trim().is_empty() {
		status.to_string()
	} else {
		error_message(&body)
	};
	debug!(%status, %message, "remote api error");

	Err(Error::Remote { message })
}

/// `{"error": {"type": "invalid_request_error", "message": m}}` gives `m`,
/// anything else gives the whole body.
pub(super) fn error_message(body: &str) -> String {
	let Ok(value) = serde_json::from_str::<Value>(body) else {
		return body.to_string();
	};

	let error = &value["error"];
	match (error["type"].as_str(), error["message"].as_str()) {
		(Some(INVALID_REQUEST_ERROR), Some(message)) => message.to_string(),
		_ => value.to_string(),
	}
}

// endregion: --- Senders

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;

	#[test]
	fn test_error_message_invalid_request() -> Result<()> {
		// -- Setup & Fixtures
		let body = r#"{"error": {"type": "invalid_request_error", "message": "No thread found with id 'thread_x'."}}"#;

		// -- Exec
		let message = error_message(body);

		// -- Check
		assert_eq!(message, "No thread found with id 'thread_x'.");

		Ok(())
	}

	#[test]
	fn test_error_message_other_type_keeps_payload() -> Result<()> {
		// -- Setup & Fixtures
		let body = r#"{"error": {"type": "server_error", "message": "boom"}}"#;

		// -- Exec
		let message = error_message(body);

		// -- Check
		let value: Value = serde_json::from_str(&message)?;
		assert_eq!(value["error"]["type"], "server_error");
		assert_eq!(value["error"]["message"], "boom");

		Ok(())
	}

	#[test]
	fn test_error_message_not_json() -> Result<()> {
		let message = error_message("Bad Gateway");

		assert_eq!(message, "Bad Gateway");

		Ok(())
	}
}

// endregion: --- Tests
