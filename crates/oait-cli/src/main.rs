// region:    --- Modules

mod args;
mod cmd;
mod error;
mod printer;
mod utils;

pub use self::error::{Error, Result};
use crate::args::Cli;
use crate::printer::Printer;
use crate::utils::log::init_tracing;
use clap::Parser;
use oait::ais::new_ais_client;
use oait::config::Config;
use oait::event::EventBus;
use std::process::ExitCode;
use tracing::{debug, error, warn};

// endregion: --- Modules

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	match init_tracing(&cli.log) {
		Ok(Some(log_file)) => debug!(file = %log_file.display(), "logging to file"),
		Ok(None) => (),
		Err(err) => eprintln!("Cannot initialize logging: {err}"),
	}

	match start(cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) if err.is_empty_result() => {
			warn!("{err}");
			ExitCode::SUCCESS
		}
		Err(err) => {
			error!("{err}");
			ExitCode::FAILURE
		}
	}
}

async fn start(cli: Cli) -> Result<()> {
	let mut config = Config::load(cli.config.as_deref())?;
	if cli.org_id.is_some() {
		config.org_id = cli.org_id;
	}

	let event_bus = EventBus::new();
	let printer = Printer::start(&event_bus)?;

	let ais = new_ais_client(&config, cli.api_key, event_bus)?;
	let res = cmd::exec(cli.command, &ais, &config, &printer).await;

	// Dropping the last bus handle closes the channel, the printer drains and ends.
	drop(ais);
	printer.join().await;

	res
}
