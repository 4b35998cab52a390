use crate::ais::raw::{self, DeleteStatus, ListPage};
use crate::ais::{remote_error, AisClient, AisEvent, AsstId, AsstRef};
use crate::batch::{ItemKind, Listed};
use crate::{Error, Result};
use async_openai::types::{
	AssistantTools, AssistantToolsCode, AssistantToolsRetrieval,
	CreateAssistantRequest, ModifyAssistantRequest,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

const LIST_PAGE_LIMIT: u32 = 100;

// region:    --- Types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsstTool {
	Code,
	Retrieval,
}

impl FromStr for AsstTool {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_lowercase().as_str() {
			"code" | "code_interpreter" => Ok(AsstTool::Code),
			"retrieval" => Ok(AsstTool::Retrieval),
			other => Err(Error::AsstToolNotSupported(other.to_string())),
		}
	}
}

impl From<AsstTool> for AssistantTools {
	fn from(tool: AsstTool) -> Self {
		match tool {
			AsstTool::Code => AssistantToolsCode::default().into(),
			AsstTool::Retrieval => AssistantToolsRetrieval::default().into(),
		}
	}
}

/// Parses a comma separated tool list (e.g., `"code, retrieval"`).
pub fn parse_tools(tools: &str) -> Result<Vec<AsstTool>> {
	tools
		.split(',')
		.filter(|t| !t.trim().is_empty())
		.map(AsstTool::from_str)
		.collect()
}

/// Fields to create or modify an assistant.
/// `None` fields are left out of the request.
#[derive(Debug, Clone, Default)]
pub struct AsstConfig {
	pub name: Option<String>,
	pub instructions: Option<String>,
	pub description: Option<String>,
	pub model: Option<String>,
	pub tools: Option<Vec<AsstTool>>,
}

impl AsstConfig {
	pub fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.instructions.is_none()
			&& self.description.is_none()
			&& self.model.is_none()
			&& self.tools.is_none()
	}

	fn oa_tools(&self) -> Option<Vec<AssistantTools>> {
		self.tools
			.as_ref()
			.map(|tools| tools.iter().copied().map(AssistantTools::from).collect())
	}
}

/// An assistant as returned by the api. The fields not used for filtering are kept as is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsstObj {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	pub created_at: i64,
	#[serde(flatten)]
	pub other: Map<String, Value>,
}

impl Listed for AsstObj {
	const KIND: ItemKind = ItemKind::Asst;

	fn id(&self) -> &str {
		&self.id
	}
	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
	fn created_at(&self) -> i64 {
		self.created_at
	}
}

// endregion: --- Types

// region:    --- Asst CRUD

/// Creates the assistant, `default_model` is used when the config has none.
pub async fn create(
	ais: &AisClient,
	config: &AsstConfig,
	default_model: &str,
) -> Result<AsstId> {
	let oac = ais.oa_client();

	let oa_assts = oac.assistants();

	let asst_obj = oa_assts
		.create(CreateAssistantRequest {
			model: config
				.model
				.clone()
				.unwrap_or_else(|| default_model.to_string()),
			name: config.name.clone(),
			description: config.description.clone(),
			instructions: config.instructions.clone(),
			tools: config.oa_tools(),
			..Default::default()
		})
		.await
		.map_err(remote_error)?;

	let asst_id: AsstId = asst_obj.id.into();

	ais.event_bus().send(AisEvent::AsstCreated(AsstRef::new(
		asst_obj.name.unwrap_or_default(),
		asst_id.clone(),
	)))?;

	Ok(asst_id)
}

pub async fn modify(
	ais: &AisClient,
	asst_id: &AsstId,
	config: &AsstConfig,
) -> Result<AsstId> {
	if config.is_empty() {
		return Err(Error::NoAsstFieldToModify);
	}

	let oac = ais.oa_client();

	let oa_assts = oac.assistants();
	let modif = ModifyAssistantRequest {
		model: config.model.clone(),
		name: config.name.clone(),
		description: config.description.clone(),
		instructions: config.instructions.clone(),
		tools: config.oa_tools(),
		..Default::default()
	};
	let asst_obj = oa_assts
		.update(asst_id, modif)
		.await
		.map_err(remote_error)?;

	let asst_id: AsstId = asst_obj.id.into();

	ais.event_bus().send(AisEvent::AsstModified(AsstRef::new(
		asst_obj.name.unwrap_or_default(),
		asst_id.clone(),
	)))?;

	Ok(asst_id)
}

/// Lists all the assistants of the organization, following the pages.
pub async fn list(ais: &AisClient) -> Result<Vec<AsstObj>> {
	let mut assts = Vec::new();
	let mut after: Option<String> = None;

	loop {
		let mut req = raw::api_request(ais, Method::GET, "assistants", true)
			.query(&[("limit", LIST_PAGE_LIMIT)]);
		if let Some(after) = after.as_deref() {
			req = req.query(&[("after", after)]);
		}

		let page: ListPage<AsstObj> = raw::send_json(req).await?;
		assts.extend(page.data);

		match page.last_id {
			Some(last_id) if page.has_more => after = Some(last_id),
			_ => break,
		}
	}

	debug!(count = assts.len(), "assistants listed");

	Ok(assts)
}

pub async fn get(ais: &AisClient, asst_id: &AsstId) -> Result<AsstObj> {
	let req = raw::api_request(ais, Method::GET, &format!("assistants/{asst_id}"), true);
	raw::send_json(req).await
}

pub async fn delete(ais: &AisClient, asst_id: &AsstId) -> Result<()> {
	let req = raw::api_request(ais, Method::DELETE, &format!("assistants/{asst_id}"), true);
	let res: DeleteStatus = raw::send_json(req).await?;

	if !res.deleted {
		return Err(Error::Remote {
			message: format!("Assistant '{asst_id}' was not deleted"),
		});
	}

	Ok(())
}

// endregion: --- Asst CRUD

// region:    --- Tests


// endregion: --- Tests
