use crate::args::LogArgs;
use crate::Result;
use chrono::Local;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

const LOG_TARGET: &str = "oait";

/// Console layer on stderr at the level of the flags, plus a DEBUG file layer with `-l`.
/// Returns the log file path when one is created.
pub fn init_tracing(args: &LogArgs) -> Result<Option<PathBuf>> {
	let console_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_filter(Targets::new().with_target(LOG_TARGET, args.console_level()));

	let (file_layer, log_file) = if args.log_file {
		let log_file = PathBuf::from(format!(
			"logs_oait_{}.txt",
			Local::now().format("%d-%m-%Y_%H-%M-%S")
		));
		let file = File::create(&log_file)?;
		let layer = fmt::layer()
			.with_writer(Mutex::new(file))
			.with_ansi(false)
			.with_filter(Targets::new().with_target(LOG_TARGET, LevelFilter::DEBUG));
		(Some(layer), Some(log_file))
	} else {
		(None, None)
	};

	tracing_subscriber::registry()
		.with(console_layer)
		.with(file_layer)
		.try_init()?;

	Ok(log_file)
}
