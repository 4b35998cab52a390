//! The `ais` module is the interface with the OpenAI API.
//!
//! Typed resources (assistants, threads, messages, runs) go through the async-openai client.
//! The endpoints it does not cover (session thread listing, assistant and file listings,
//! raw file content, image generation) go through the `raw` reqwest helpers, with the same headers and error normalization.

// region:    --- Modules

pub mod asst;
mod event;
pub mod file;
pub mod image;
pub mod msg;
mod raw;
pub mod run;
pub mod thread;
mod types;

pub use event::AisEvent;
pub use types::*;

use crate::config::Config;
use crate::event::EventBus;
use crate::{Error, Result};
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::Client;
use backoff::ExponentialBackoffBuilder;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

// endregion: --- Modules

// region:    --- Client

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const INVALID_REQUEST_ERROR: &str = "invalid_request_error";

pub type OaClient = Client<OpenAIConfig>;

/// Wraps the async-openai client with a raw http client (same credentials)
/// and the event bus.
#[derive(Debug)]
pub struct AisClient {
	oa_client: OaClient,
	http: reqwest::Client,
	api_base: String,
	api_key: String,
	org_id: Option<String>,
	event_bus: EventBus,
}

impl AisClient {
	pub fn oa_client(&self) -> &OaClient {
		&self.oa_client
	}
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}
	pub(crate) fn http(&self) -> &reqwest::Client {
		&self.http
	}
	pub(crate) fn api_base(&self) -> &str {
		&self.api_base
	}
	pub(crate) fn api_key(&self) -> &str {
		&self.api_key
	}
	pub(crate) fn org_id(&self) -> Option<&str> {
		self.org_id.as_deref()
	}
}

/// Builds the client. The key is the explicit one if given, otherwise `OPENAI_API_KEY`.
pub fn new_ais_client(
	config: &Config,
	api_key: Option<String>,
	event_bus: EventBus,
) -> Result<AisClient> {
	let api_key = match api_key.filter(|k| !k.is_empty()) {
		Some(api_key) => api_key,
		None => std::env::var(ENV_OPENAI_API_KEY)
			.ok()
			.filter(|k| !k.is_empty())
			.ok_or(Error::NoOpenAIApiKey)?,
	};

	let mut oa_config = OpenAIConfig::new()
		.with_api_key(api_key.clone())
		.with_api_base(config.api_base.clone());
	if let Some(org_id) = config.org_id.as_ref() {
		oa_config = oa_config.with_org_id(org_id.clone());
	}

	// No automatic retry: a zero elapsed time budget gives up after the first attempt.
	let no_retry = ExponentialBackoffBuilder::new()
		.with_max_elapsed_time(Some(Duration::ZERO))
		.build();
	let oa_client = Client::with_config(oa_config).with_backoff(no_retry);

	Ok(AisClient {
		oa_client,
		http: reqwest::Client::new(),
		api_base: config.api_base.trim_end_matches('/').to_string(),
		api_key,
		org_id: config.org_id.clone(),
		event_bus,
	})
}

// endregion: --- Client

// region:    --- Remote Error

/// Normalizes an async-openai error.
/// An `invalid_request_error` keeps only the provider message, any other api error
/// keeps the whole payload. Transport or decoding errors stay `Error::OpenAI`.
pub(crate) fn remote_error(err: OpenAIError) -> Error {
	match err {
		OpenAIError::ApiError(api_err) => {
			let message = if api_err.r#type.as_deref() == Some(INVALID_REQUEST_ERROR) {
				api_err.message
			} else {
				json!({
					"error": {
						"type": api_err.r#type,
						"message": api_err.message,
						"param": api_err.param,
						"code": api_err.code,
					}
				})
				.to_string()
			};
			debug!(%message, "remote api error");
			Error::Remote { message }
		}
		other => Error::OpenAI(other),
	}
}

// endregion: --- Remote Error
