use derive_more::From;
use oait::poller::RunOutcome;
use std::io;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
	Custom(String),

	RunNotCompleted {
		run_id: String,
		outcome: RunOutcome,
	},

	// -- App Libs
	#[from]
	Oait(oait::Error),

	// -- Externals
	#[from]
	IO(io::Error),
	#[from]
	Dialoguer(dialoguer::Error),
	#[from]
	TracingInit(tracing_subscriber::util::TryInitError),
}

impl From<&str> for Error {
	fn from(val: &str) -> Self {
		Error::Custom(val.to_string())
	}
}

impl Error {
	/// Ends the process with a zero exit code (e.g., nothing matched the request).
	pub fn is_empty_result(&self) -> bool {
		matches!(self, Error::Oait(err) if err.is_empty_result())
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
