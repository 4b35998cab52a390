use crate::event;
use async_openai::error::OpenAIError;
use derive_more::From;
use std::io;
use tokio::sync::broadcast;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
	// -- Usage
	NoOpenAIApiKey,
	NoIdSource,
	ConflictingIdSources(Vec<&'static str>),
	InputFileNotSupported {
		file: String,
		ext: String,
	},
	InputFileNotFound(String),
	ConfigFileNotFound(String),
	NoAsstFieldToModify,
	AsstToolNotSupported(String),
	ImageModelNotSupported(String),
	ImageSizeNotSupported(String),
	InvalidDays(f64),

	// -- Remote
	Remote {
		message: String,
	},

	// -- Remote content
	NoTextInMessage,
	NoMessageFoundInThread(String),
	NoImageData,

	// -- Empty result
	NoThreadsForSession,

	// -- Output
	OutputFormat {
		kind: &'static str,
		ext: String,
		accepted: &'static str,
	},
	FileCannotCreate {
		file: String,
		cause: io::Error,
	},

	// -- Event
	#[from]
	BroadcastSend(broadcast::error::SendError<event::Event>),

	// -- Std
	#[from]
	IO(io::Error),

	// -- Externals
	#[from]
	SimpleFs(simple_fs::Error),
	#[from]
	OpenAI(OpenAIError),
	#[from]
	Reqwest(reqwest::Error),
	#[from]
	SerdeJson(serde_json::Error),
}

impl Error {
	/// A valid but empty result set. Not a failure for the process exit code.
	pub fn is_empty_result(&self) -> bool {
		matches!(self, Error::NoThreadsForSession)
	}
}

// region:    --- Error Boilerplate
impl core::fmt::Display for Error {
	fn fmt(
		&self,
		fmt: &mut core::fmt::Formatter,
	) -> core::result::Result<(), core::fmt::Error> {
		write!(fmt, "{self:?}")
	}
}

impl std::error::Error for Error {}
// endregion: --- Error Boilerplate
