use crate::ais::{raw, AisClient, FileId};
use crate::output::OutputValue;
use crate::{Error, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

// region:    --- Constants

const IMAGE_MODELS: &[&str] = &["dall-e-2", "dall-e-3"];
const IMAGE_SIZES: &[&str] = &["256x256", "512x512", "1024x1024", "1792x1024", "1024x1792"];

// endregion: --- Constants

// region:    --- Types

#[derive(Debug, Serialize)]
struct ImageGenRequest<'a> {
	model: &'a str,
	prompt: &'a str,
	n: u8,
	size: &'a str,
}

// endregion: --- Types

// region:    --- Generation

/// Generates one image from the prompt, returns the raw api response.
pub async fn generate_image(
	ais: &AisClient,
	prompt: &str,
	model: &str,
	size: &str,
) -> Result<Value> {
	if !IMAGE_MODELS.contains(&model) {
		return Err(Error::ImageModelNotSupported(model.to_string()));
	}
	if !IMAGE_SIZES.contains(&size) {
		return Err(Error::ImageSizeNotSupported(size.to_string()));
	}

	let payload = ImageGenRequest {
		model,
		prompt,
		n: 1,
		size,
	};
	debug!(?payload, "image generation payload");

	let req = raw::api_request(ais, Method::POST, "images/generations", false).json(&payload);

	raw::send_json(req).await
}

/// The `data` items of an image generation response, one record each.
pub fn image_records(res: Value) -> Result<OutputValue> {
	match res {
		Value::Object(mut obj) => match obj.remove("data") {
			Some(Value::Array(items)) if !items.is_empty() => Ok(OutputValue::List(
				items.into_iter().map(OutputValue::Record).collect(),
			)),
			_ => Err(Error::NoImageData),
		},
		_ => Err(Error::NoImageData),
	}
}

// endregion: --- Generation

// region:    --- Retrieval

/// Content of an uploaded file (e.g., an image produced by a code interpreter run).
pub async fn fetch_image_by_file_id(ais: &AisClient, file_id: &FileId) -> Result<Vec<u8>> {
	let req = raw::api_request(ais, Method::GET, &format!("files/{file_id}/content"), false);

	raw::send_bytes(req).await
}

pub async fn fetch_image_by_url(ais: &AisClient, url: &str) -> Result<Vec<u8>> {
	let req = ais.http().get(url);

	raw::send_bytes(req).await
}

// endregion: --- Retrieval

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use crate::ais::new_ais_client;
	use crate::config::Config;
	use crate::event::EventBus;
	use serde_json::json;
	use wiremock::matchers::{body_partial_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	async fn client_for(server: &MockServer) -> Result<AisClient> {
		let config = Config {
			api_base: server.uri(),
			..Default::default()
		};
		Ok(new_ais_client(
			&config,
			Some("sk-test".to_string()),
			EventBus::new(),
		)?)
	}

	#[tokio::test]
	async fn test_generate_image_ok() -> Result<()> {
		// -- Setup & Fixtures
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/images/generations"))
			.and(header("authorization", "Bearer sk-test"))
			.and(body_partial_json(json!({
				"model": "dall-e-3",
				"prompt": "a red fox",
				"n": 1,
				"size": "1024x1024"
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"created": 1700000000,
				"data": [{"url": "https://img/1.png", "revised_prompt": "a red fox in snow"}]
			})))
			.expect(1)
			.mount(&server)
			.await;
		let ais = client_for(&server).await?;

		// -- Exec
		let res = generate_image(&ais, "a red fox", "dall-e-3", "1024x1024").await?;
		let records = image_records(res)?;

		// -- Check
		let OutputValue::List(items) = records else {
			return Err("should be a list".into());
		};
		assert_eq!(items.len(), 1);
		assert!(matches!(&items[0], OutputValue::Record(v) if v["url"] == "https://img/1.png"));

		Ok(())
	}

	#[tokio::test]
	async fn test_generate_image_bad_size() -> Result<()> {
		// -- Setup & Fixtures
		let server = MockServer::start().await;
		let ais = client_for(&server).await?;

		// -- Exec
		let res = generate_image(&ais, "a red fox", "dall-e-3", "10x10").await;

		// -- Check
		assert!(matches!(res, Err(crate::Error::ImageSizeNotSupported(_))));

		Ok(())
	}

	#[tokio::test]
	async fn test_fetch_image_by_file_id_ok() -> Result<()> {
		// -- Setup & Fixtures
		let server = MockServer::start().await;
		let png_bytes: Vec<u8> = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
		Mock::given(method("GET"))
			.and(path("/files/file-img/content"))
			.respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes.clone()))
			.mount(&server)
			.await;
		let ais = client_for(&server).await?;

		// -- Exec
		let bytes = fetch_image_by_file_id(&ais, &"file-img".into()).await?;

		// -- Check
		assert_eq!(bytes, png_bytes);

		Ok(())
	}

	#[tokio::test]
	async fn test_fetch_image_by_file_id_not_found() -> Result<()> {
		// -- Setup & Fixtures
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/files/file-missing/content"))
			.respond_with(ResponseTemplate::new(404).set_body_json(json!({
				"error": {
					"type": "invalid_request_error",
					"message": "No such File object: file-missing"
				}
			})))
			.mount(&server)
			.await;
		let ais = client_for(&server).await?;

		// -- Exec
		let res = fetch_image_by_file_id(&ais, &"file-missing".into()).await;

		// -- Check
		assert!(matches!(
			res,
			Err(crate::Error::Remote { message }) if message == "No such File object: file-missing"
		));

		Ok(())
	}
}

// endregion: --- Tests
