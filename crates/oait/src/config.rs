use crate::poller::PollConfig;
use crate::{Error, Result};
use serde::Deserialize;
use simple_fs::load_toml;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const OAIT_TOML: &str = "oait.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	pub api_base: String,
	pub org_id: Option<String>,
	/// Model of the created assistants when none is given.
	pub assistant_model: String,
	pub image_model: String,
	pub image_size: String,
	pub poll_interval_ms: u64,
	pub poll_max_attempts: Option<u32>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base: "https://api.openai.com/v1".to_string(),
			org_id: None,
			assistant_model: "gpt-3.5-turbo-0125".to_string(),
			image_model: "dall-e-3".to_string(),
			image_size: "1024x1024".to_string(),
			poll_interval_ms: 1000,
			poll_max_attempts: Some(600),
		}
	}
}

impl Config {
	/// `file` must exist when given. Otherwise `oait.toml` of the working
	/// directory is used if present, else the defaults.
	pub fn load(file: Option<&Path>) -> Result<Config> {
		match file {
			Some(file) if !file.is_file() => {
				Err(Error::ConfigFileNotFound(file.display().to_string()))
			}
			Some(file) => Self::load_file(file),
			None if Path::new(OAIT_TOML).is_file() => Self::load_file(Path::new(OAIT_TOML)),
			None => Ok(Config::default()),
		}
	}

	fn load_file(file: &Path) -> Result<Config> {
		let config: Config = load_toml(file)?;
		debug!(file = %file.display(), ?config, "config loaded");
		Ok(config)
	}

	pub fn poll_config(&self) -> PollConfig {
		PollConfig {
			interval: Duration::from_millis(self.poll_interval_ms),
			max_attempts: self.poll_max_attempts,
		}
	}
}

// region:    --- Tests


// endregion: --- Tests
